//! Types for blockchain inspection endpoints.

use serde::Deserialize;
use serde_json::{Map, Value};
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, serde_as};

use crate::types::PersistenceStatus;
use crate::types::serde_helpers::{empty_string_as_none, null_as_default};

/// Blockchain connection status of the platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "StatusRecord")]
pub struct BlockchainStatus {
    pub connected: bool,
    pub chain_id: Option<u64>,
    /// Network name, e.g. `sapphire-testnet`.
    pub network: Option<String>,
    pub contract_address: Option<String>,
    /// Every other field returned by the server.
    pub extra: Map<String, Value>,
}

#[serde_as]
#[derive(Deserialize)]
struct StatusRecord {
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    connected: bool,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    chain_id: Option<u64>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(rename = "chainId", default)]
    chain_id_camel: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    network: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    contract_address: Option<String>,
    #[serde(
        rename = "contractAddress",
        default,
        deserialize_with = "empty_string_as_none::deserialize"
    )]
    contract_address_camel: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StatusRecord> for BlockchainStatus {
    fn from(record: StatusRecord) -> Self {
        Self {
            connected: record.connected,
            chain_id: record.chain_id.or(record.chain_id_camel),
            network: record.network,
            contract_address: record.contract_address.or(record.contract_address_camel),
            extra: record.extra,
        }
    }
}

/// Blockchain persistence record for a trade or document.
///
/// Every platform write lands in the query layer immediately and is then
/// written to chain; this record tracks the chain half.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainPersistence {
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub record_id: String,
    /// `Unknown` when the server omits the status or sends something unreadable.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub status: PersistenceStatus,
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub tx_hash: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub block_number: Option<u64>,
    /// Write attempts so far.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub attempt_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}
