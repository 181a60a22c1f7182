//! Document extraction endpoints.
//!
//! Two pathways, neither of which persists anything:
//!
//! - ETR extraction (`POST /api/etr/extract`) reads structured fields from
//!   Electronic Trade Record PDFs.
//! - Trade blotting (`POST /api/blotting/extract-pdf`) pulls TradeContract
//!   fields out of unstructured documents such as email confirmations and
//!   spreadsheets.
//!
//! Pass [`ExtractionResult::to_trade_fields`] to
//! [`Trades::create`](crate::rest::trades::Trades::create) to save the result.

mod types;

pub use types::*;

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::error::HavonaError;
use crate::rest::HavonaClient;
use crate::rest::endpoints::documents;
use crate::types::{DocumentType, ExtractionMode};

const PDF: &str = "application/pdf";
const OCTET_STREAM: &str = "application/octet-stream";

/// Document extraction operations, borrowed from a [`HavonaClient`].
#[derive(Debug, Clone, Copy)]
pub struct Documents<'a> {
    client: &'a HavonaClient,
}

impl HavonaClient {
    /// Document extraction operations.
    pub fn documents(&self) -> Documents<'_> {
        Documents { client: self }
    }
}

impl Documents<'_> {
    /// Extract structured fields from an ETR document PDF on disk.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use havona_client::HavonaClient;
    /// use havona_client::types::{DocumentType, ExtractionMode};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = HavonaClient::from_env()?;
    ///     let result = client
    ///         .documents()
    ///         .extract("invoice.pdf", DocumentType::CommercialInvoice, ExtractionMode::Native)
    ///         .await?;
    ///     println!("{:?} {:?}", result.fields.get("invoiceNumber"), result.confidence);
    ///
    ///     let trade = client
    ///         .trades()
    ///         .create(result.to_trade_fields().status("DRAFT"))
    ///         .await?;
    ///     println!("Saved as {}", trade.id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn extract(
        &self,
        path: impl AsRef<Path>,
        document_type: DocumentType,
        mode: ExtractionMode,
    ) -> Result<ExtractionResult, HavonaError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        self.extract_bytes(file_name(path), bytes, document_type, mode)
            .await
    }

    /// Extract structured fields from an in-memory ETR document PDF.
    pub async fn extract_bytes(
        &self,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        document_type: DocumentType,
        mode: ExtractionMode,
    ) -> Result<ExtractionResult, HavonaError> {
        let file = Part::bytes(bytes.into())
            .file_name(file_name.into())
            .mime_str(PDF)?;
        let form = Form::new()
            .part("file", file)
            .text("document_type", document_type.as_str().to_string())
            .text("mode", mode.as_str());

        tracing::debug!(%document_type, %mode, "uploading document for extraction");
        self.client.post_multipart(documents::ETR_EXTRACT, form).await
    }

    /// Extract TradeContract fields from an unstructured trade document
    /// (PDF, Excel or CSV).
    pub async fn extract_trade(&self, path: impl AsRef<Path>) -> Result<ExtractionResult, HavonaError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file = Part::bytes(bytes)
            .file_name(file_name(path))
            .mime_str(guess_content_type(path))?;
        let form = Form::new().part("file", file);

        self.client
            .post_multipart(documents::BLOTTING_EXTRACT, form)
            .await
    }

    /// List the ETR document types the extraction service supports.
    pub async fn supported_types(&self) -> Result<Vec<EtrType>, HavonaError> {
        let listing: EtrTypeListing = self.client.get(documents::ETR_TYPES).await?;
        Ok(listing.into_types())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// Content type for a trade document, from its extension.
fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => PDF,
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        Some("csv") => "text/csv",
        _ => OCTET_STREAM,
    }
}
