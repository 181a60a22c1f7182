//! Types for document extraction endpoints.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::rest::trades::TradeFields;
use crate::types::fields::EXTRACTED_TRADE_FIELDS;
use crate::types::serde_helpers::null_as_default;

/// Keys describing the extraction itself rather than the document's content.
const METADATA_KEYS: &[&str] = &[
    "documentType",
    "document_type",
    "confidence",
    "source",
    "uploadedFilename",
    "pdfMetadata",
];

/// Keys the server may nest the extracted fields under, in lookup order.
const FIELD_CONTAINERS: &[&str] = &["extractedData", "fields", "result"];

/// Result of a document extraction. Nothing is persisted by extraction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ExtractionResult {
    /// Document type reported by the service, `"unknown"` when absent.
    pub document_type: String,
    /// Extracted key/value pairs.
    pub fields: Map<String, Value>,
    /// Extraction confidence between 0.0 and 1.0.
    pub confidence: Option<f64>,
    /// Where the fields came from (`pdf`, `excel`, `ai`).
    pub source: Option<String>,
    /// File name as stored by the service.
    pub uploaded_filename: Option<String>,
    /// The full response body.
    pub raw: Map<String, Value>,
}

impl ExtractionResult {
    /// Convert the extracted fields into a payload for
    /// [`Trades::create`](crate::rest::trades::Trades::create).
    ///
    /// Copies the known trade fields, preferring the server's camelCase key
    /// and falling back to its snake_case alias. Callers can add or override
    /// fields on the returned value.
    pub fn to_trade_fields(&self) -> TradeFields {
        let mut payload = TradeFields::new();
        for (server_key, snake_key) in EXTRACTED_TRADE_FIELDS {
            let value = self
                .fields
                .get(*server_key)
                .or_else(|| self.fields.get(*snake_key));
            if let Some(value) = value {
                payload.insert(server_key, value.clone());
            }
        }
        payload
    }
}

impl From<Map<String, Value>> for ExtractionResult {
    fn from(raw: Map<String, Value>) -> Self {
        let fields = match FIELD_CONTAINERS
            .iter()
            .filter_map(|key| raw.get(*key))
            .find(|value| is_truthy(value))
        {
            Some(Value::Object(fields)) => fields.clone(),
            Some(_) => Map::new(),
            None => raw
                .iter()
                .filter(|(key, _)| !METADATA_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        };

        let document_type = ["documentType", "document_type"]
            .iter()
            .filter_map(|key| raw.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .unwrap_or("unknown")
            .to_string();

        Self {
            document_type,
            fields,
            confidence: raw.get("confidence").and_then(Value::as_f64),
            source: string_field(&raw, "source"),
            uploaded_filename: string_field(&raw, "uploadedFilename"),
            raw,
        }
    }
}

fn string_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

// Empty containers, empty strings, zero and false count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// An ETR document type supported by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EtrType {
    /// Type id, e.g. `COMMERCIAL_INVOICE`.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `/api/etr/types` answers with either a bare array or a wrapper object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum EtrTypeListing {
    Bare(Vec<EtrType>),
    Wrapped {
        #[serde(default, deserialize_with = "null_as_default::deserialize")]
        types: Vec<EtrType>,
        #[serde(
            rename = "documentTypes",
            default,
            deserialize_with = "null_as_default::deserialize"
        )]
        document_types: Vec<EtrType>,
    },
}

impl EtrTypeListing {
    pub(crate) fn into_types(self) -> Vec<EtrType> {
        match self {
            EtrTypeListing::Bare(types) => types,
            EtrTypeListing::Wrapped {
                types,
                document_types,
            } => {
                if types.is_empty() {
                    document_types
                } else {
                    types
                }
            }
        }
    }
}
