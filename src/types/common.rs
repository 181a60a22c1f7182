//! Common domain types for the Havona API.

use serde::{Deserialize, Serialize};

/// Electronic Trade Record document type accepted by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// Commercial invoice
    CommercialInvoice,
    /// Bill of lading
    BillOfLading,
    /// Certificate of origin
    CertificateOfOrigin,
    /// Any other type id reported by `/api/etr/types`
    Other(String),
}

impl DocumentType {
    /// The wire name sent as the `document_type` form field.
    pub fn as_str(&self) -> &str {
        match self {
            DocumentType::CommercialInvoice => "COMMERCIAL_INVOICE",
            DocumentType::BillOfLading => "BILL_OF_LADING",
            DocumentType::CertificateOfOrigin => "CERTIFICATE_OF_ORIGIN",
            DocumentType::Other(id) => id,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DocumentType {
    fn from(id: &str) -> Self {
        match id {
            "COMMERCIAL_INVOICE" => DocumentType::CommercialInvoice,
            "BILL_OF_LADING" => DocumentType::BillOfLading,
            "CERTIFICATE_OF_ORIGIN" => DocumentType::CertificateOfOrigin,
            other => DocumentType::Other(other.to_string()),
        }
    }
}

impl From<String> for DocumentType {
    fn from(id: String) -> Self {
        DocumentType::from(id.as_str())
    }
}

/// How the extraction service reads a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// AI vision over the rendered document
    #[default]
    Native,
    /// Plain text extraction fallback
    Text,
}

impl ExtractionMode {
    /// The wire name sent as the `mode` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Native => "native",
            ExtractionMode::Text => "text",
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a record's write to the blockchain layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PersistenceStatus {
    /// Submitted, awaiting confirmation
    Pending,
    /// Confirmed on chain
    Confirmed,
    /// Write failed
    Failed,
    /// Any status this client does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for PersistenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PersistenceStatus::Pending => "PENDING",
            PersistenceStatus::Confirmed => "CONFIRMED",
            PersistenceStatus::Failed => "FAILED",
            PersistenceStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}
