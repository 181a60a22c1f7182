//! ETR document type catalogue and extraction.
//!
//! A focused view over the ETR half of [`Documents`]. Extraction persists
//! nothing; save results with [`HavonaClient::write`] (for example as an
//! `ETRDocument`) or through [`Trades::create`](crate::rest::trades::Trades::create).

use std::path::Path;

use crate::error::HavonaError;
use crate::rest::HavonaClient;
use crate::rest::documents::{Documents, EtrType, ExtractionResult};
use crate::types::{DocumentType, ExtractionMode};

/// ETR operations, borrowed from a [`HavonaClient`].
#[derive(Debug, Clone, Copy)]
pub struct Etrs<'a> {
    documents: Documents<'a>,
}

impl HavonaClient {
    /// ETR document type catalogue and extraction.
    pub fn etrs(&self) -> Etrs<'_> {
        Etrs {
            documents: self.documents(),
        }
    }
}

impl Etrs<'_> {
    /// List the ETR document types the platform supports.
    pub async fn types(&self) -> Result<Vec<EtrType>, HavonaError> {
        self.documents.supported_types().await
    }

    /// Extract structured fields from an ETR document PDF.
    ///
    /// Same as [`Documents::extract`].
    pub async fn extract(
        &self,
        path: impl AsRef<Path>,
        document_type: DocumentType,
        mode: ExtractionMode,
    ) -> Result<ExtractionResult, HavonaError> {
        self.documents.extract(path, document_type, mode).await
    }
}
