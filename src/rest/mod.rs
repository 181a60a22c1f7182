//! Havona platform REST and GraphQL client.
//!
//! [`HavonaClient`] owns the HTTP transport and the token cache. Resource
//! operations hang off short-lived handles borrowed from it:
//!
//! ```rust,no_run
//! use havona_client::HavonaClient;
//!
//! async fn summary(client: &HavonaClient) -> Result<(), havona_client::HavonaError> {
//!     let trades = client.trades().list(5, None).await?;
//!     let agents = client.agents().list().await?;
//!     let chain = client.blockchain().status().await?;
//!     println!("{} trades, {} agents, chain connected: {}", trades.len(), agents.len(), chain.connected);
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod blockchain;
mod client;
pub mod documents;
pub mod endpoints;
pub mod etrs;
mod passthrough;
pub mod trades;

pub use client::{HavonaClient, HavonaClientBuilder};
