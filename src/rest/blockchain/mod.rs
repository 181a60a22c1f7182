//! Blockchain inspection endpoints.

mod types;

pub use types::*;

use serde_json::Value;

use crate::error::HavonaError;
use crate::rest::HavonaClient;
use crate::rest::endpoints::blockchain;

/// Blockchain inspection operations, borrowed from a [`HavonaClient`].
#[derive(Debug, Clone, Copy)]
pub struct Blockchain<'a> {
    client: &'a HavonaClient,
}

impl HavonaClient {
    /// Blockchain connection status and persistence records.
    pub fn blockchain(&self) -> Blockchain<'_> {
        Blockchain { client: self }
    }
}

impl Blockchain<'_> {
    /// Get the platform's blockchain connection status.
    pub async fn status(&self) -> Result<BlockchainStatus, HavonaError> {
        self.client.get(blockchain::STATUS).await
    }

    /// Get the persistence record for a trade or document.
    pub async fn persistence(&self, record_id: &str) -> Result<BlockchainPersistence, HavonaError> {
        self.client.get(&blockchain::persistence(record_id)).await
    }

    /// Get the blockchain status body without model parsing.
    pub async fn raw_status(&self) -> Result<Value, HavonaError> {
        self.client.get(blockchain::STATUS).await
    }
}
