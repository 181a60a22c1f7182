//! Types for TradeContract endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, serde_as};

use crate::types::PersistenceStatus;
use crate::types::fields::trade_field_name;
use crate::types::serde_helpers::{default_on_error, empty_string_as_none, null_as_default};

/// A TradeContract record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TradeRecord")]
pub struct Trade {
    /// Server-assigned record id.
    pub id: String,
    /// Contract number.
    pub contract_no: String,
    /// Trade status (e.g. `DRAFT`, `ACTIVE`).
    pub status: String,
    /// Contract type (e.g. `SPOT`).
    pub contract_type: Option<String>,
    /// Blockchain persistence status.
    pub blockchain_status: Option<PersistenceStatus>,
    /// Transaction hash of the blockchain write.
    pub tx_hash: Option<String>,
    /// Block the write landed in.
    pub block_number: Option<u64>,
    /// Every other field returned by the server.
    pub extra: Map<String, Value>,
}

impl Trade {
    /// Look up a string field the model does not name (e.g. `sellerId`).
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// Wire shape of a TradeContract.
///
/// Flat persistence keys (`blockchain_status`, `tx_hash`, `block_number`)
/// stay in `extra` and are only read as a fallback for the nested
/// `blockchainPersistence` object.
#[derive(Deserialize)]
struct TradeRecord {
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    id: String,
    #[serde(
        rename = "contractNo",
        default,
        deserialize_with = "null_as_default::deserialize"
    )]
    contract_no: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    status: String,
    #[serde(
        rename = "contractType",
        default,
        deserialize_with = "empty_string_as_none::deserialize"
    )]
    contract_type: Option<String>,
    #[serde(
        rename = "blockchainPersistence",
        default,
        deserialize_with = "default_on_error::deserialize"
    )]
    blockchain_persistence: Option<PersistenceSummary>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[serde_as]
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistenceSummary {
    #[serde(default, deserialize_with = "default_on_error::deserialize")]
    status: Option<PersistenceStatus>,
    #[serde(default, deserialize_with = "default_on_error::deserialize")]
    tx_hash: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    block_number: Option<u64>,
}

impl From<TradeRecord> for Trade {
    fn from(record: TradeRecord) -> Self {
        let nested = record.blockchain_persistence.unwrap_or_default();
        let extra = record.extra;
        Self {
            id: record.id,
            contract_no: record.contract_no,
            status: record.status,
            contract_type: record.contract_type,
            blockchain_status: nested.status.or_else(|| {
                extra
                    .get("blockchain_status")
                    .and_then(|v| PersistenceStatus::deserialize(v).ok())
            }),
            tx_hash: non_empty(nested.tx_hash).or_else(|| {
                extra
                    .get("tx_hash")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            }),
            block_number: nested
                .block_number
                .or_else(|| extra.get("block_number").and_then(block_number)),
            extra,
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Block numbers arrive as integers or decimal strings; anything else is ignored.
fn block_number(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// Fields for creating or updating a TradeContract.
///
/// Keys are normalised on insertion: known snake_case names such as
/// `contract_no` are stored as the server's `contractNo`; other keys pass
/// through untouched.
///
/// # Example
///
/// ```rust
/// use havona_client::rest::trades::TradeFields;
///
/// let fields = TradeFields::new()
///     .contract_no("TC-2026-001")
///     .status("DRAFT")
///     .set("unit_price", "82.50")
///     .set("commodity", "Crude Oil");
///
/// assert_eq!(fields.get("contractNo").unwrap(), "TC-2026-001");
/// assert_eq!(fields.get("unitPrice").unwrap(), "82.50");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TradeFields(Map<String, Value>);

impl TradeFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style.
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field, returning the previous value under the normalised key.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0
            .insert(trade_field_name(key).to_string(), value.into())
    }

    /// Set the contract number.
    pub fn contract_no(self, contract_no: impl Into<String>) -> Self {
        self.set("contractNo", contract_no.into())
    }

    /// Set the contract type.
    pub fn contract_type(self, contract_type: impl Into<String>) -> Self {
        self.set("contractType", contract_type.into())
    }

    /// Set the trade status.
    pub fn status(self, status: impl Into<String>) -> Self {
        self.set("status", status.into())
    }

    /// Set the seller member id.
    pub fn seller_id(self, seller_id: impl Into<String>) -> Self {
        self.set("sellerId", seller_id.into())
    }

    /// Set the buyer member id.
    pub fn buyer_id(self, buyer_id: impl Into<String>) -> Self {
        self.set("buyerId", buyer_id.into())
    }

    /// Get a field by either spelling.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(trade_field_name(key))
    }

    /// Check whether a field is set, by either spelling.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(trade_field_name(key))
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the normalised JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the normalised JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl<K, V> FromIterator<(K, V)> for TradeFields
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        fields.extend(iter);
        fields
    }
}

impl<K, V> Extend<(K, V)> for TradeFields
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl From<TradeFields> for Map<String, Value> {
    fn from(fields: TradeFields) -> Self {
        fields.0
    }
}
