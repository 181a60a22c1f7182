//! # Havona Client
//!
//! An async Rust client library for the Havona trade-finance platform.
//!
//! ## Features
//!
//! - Bearer authentication with a cached, auto-refreshing token
//! - Password, client credentials and static token strategies
//! - GraphQL reads and `/dynamic` writes
//! - Trades, document extraction, ETR types, agent registry and blockchain status
//! - Status-classified errors (`Auth`, `NotFound`, `Validation`, `GraphQl`, `Api`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use havona_client::HavonaClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // HAVONA_API_URL plus HAVONA_TOKEN, or Auth0 credentials
//!     let client = HavonaClient::from_env()?;
//!     let status = client.blockchain().status().await?;
//!     println!("Blockchain connected: {}", status.connected);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ApiError, GraphQlError, HavonaError};
pub use rest::HavonaClient;
pub use types::common::{DocumentType, ExtractionMode, PersistenceStatus};

/// Result type alias using HavonaError
pub type Result<T> = std::result::Result<T, HavonaError>;
