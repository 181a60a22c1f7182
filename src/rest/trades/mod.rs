//! TradeContract endpoints.
//!
//! Reads go through GraphQL; writes go through `/dynamic`, which persists to
//! both the query layer and the blockchain.

mod types;

pub use types::*;

use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ApiError, HavonaError};
use crate::rest::HavonaClient;
use crate::rest::endpoints;
use crate::types::serde_helpers::null_as_default;

/// Entity name TradeContract records are written under.
pub const TRADE_CONTRACT: &str = "TradeContract";

/// Default GraphQL selection set for trade reads.
pub const DEFAULT_TRADE_FIELDS: &str = "
    id
    contractNo
    status
    contractType
    sellerId
    buyerId
    blockchainPersistence {
        status
        txHash
        blockNumber
        attemptCount
    }
";

#[derive(Deserialize)]
struct TradeList {
    #[serde(
        rename = "queryTradeContract",
        default,
        deserialize_with = "null_as_default::deserialize"
    )]
    trades: Vec<Trade>,
}

#[derive(Deserialize)]
struct TradeLookup {
    #[serde(rename = "getTradeContract", default)]
    trade: Option<Trade>,
}

/// TradeContract operations, borrowed from a [`HavonaClient`].
#[derive(Debug, Clone, Copy)]
pub struct Trades<'a> {
    client: &'a HavonaClient,
}

impl HavonaClient {
    /// TradeContract create/read/update operations.
    pub fn trades(&self) -> Trades<'_> {
        Trades { client: self }
    }
}

impl Trades<'_> {
    /// List trades.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of trades to return.
    /// * `fields` - GraphQL selection set; defaults to [`DEFAULT_TRADE_FIELDS`].
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use havona_client::HavonaClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = HavonaClient::from_env()?;
    ///     for trade in client.trades().list(10, None).await? {
    ///         println!("{} {}", trade.contract_no, trade.status);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn list(&self, limit: u32, fields: Option<&str>) -> Result<Vec<Trade>, HavonaError> {
        let selection = fields.unwrap_or(DEFAULT_TRADE_FIELDS);
        let query = format!(
            "query ListTrades($first: Int) {{ queryTradeContract(first: $first) {{ {selection} }} }}"
        );
        let list: TradeList = self
            .client
            .graphql_as(&query, Some(json!({ "first": limit })))
            .await?;
        Ok(list.trades)
    }

    /// Fetch a single trade by id.
    ///
    /// Fails with [`HavonaError::NotFound`] when the query resolves to no record.
    pub async fn get(&self, trade_id: &str, fields: Option<&str>) -> Result<Trade, HavonaError> {
        let selection = fields.unwrap_or(DEFAULT_TRADE_FIELDS);
        let query = format!(
            "query GetTrade($id: ID!) {{ getTradeContract(id: $id) {{ {selection} }} }}"
        );
        let lookup: TradeLookup = self
            .client
            .graphql_as(&query, Some(json!({ "id": trade_id })))
            .await?;

        lookup.trade.ok_or_else(|| {
            HavonaError::NotFound(ApiError::new(format!(
                "{TRADE_CONTRACT} '{trade_id}' not found"
            )))
        })
    }

    /// Create a trade.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use havona_client::HavonaClient;
    /// use havona_client::rest::trades::TradeFields;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = HavonaClient::from_env()?;
    ///     let trade = client
    ///         .trades()
    ///         .create(TradeFields::new().contract_no("TC-2026-001").status("DRAFT"))
    ///         .await?;
    ///     println!("Created {}", trade.id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn create(&self, fields: TradeFields) -> Result<Trade, HavonaError> {
        let record = self.client.write(TRADE_CONTRACT, fields.into_map()).await?;
        serde_json::from_value(record)
            .map_err(|e| HavonaError::InvalidResponse(format!("Unexpected trade record: {e}")))
    }

    /// Update fields on an existing trade. Returns the record echoed by the server.
    pub async fn update(&self, trade_id: &str, mut fields: TradeFields) -> Result<Value, HavonaError> {
        fields.insert("id", trade_id);
        self.client.write(TRADE_CONTRACT, fields.into_map()).await
    }

    /// Assign a trade to a book.
    ///
    /// Books are party-specific: each counterparty classifies the trade
    /// independently.
    pub async fn assign_book(&self, trade_id: &str, book: &str) -> Result<Value, HavonaError> {
        self.client
            .send_json(
                Method::PATCH,
                &endpoints::trades::book(trade_id),
                &json!({ "book": book }),
            )
            .await
    }
}
