//! Havona REST API endpoint constants.

use std::time::Duration;

/// Default per-request timeout for platform calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// GraphQL read endpoint.
pub const GRAPHQL: &str = "/graphql";

/// Dynamic create/update endpoint.
pub const DYNAMIC: &str = "/dynamic";

/// Trade endpoints.
pub mod trades {
    /// Assign a trade to a book.
    pub fn book(trade_id: &str) -> String {
        format!("/api/trades/{trade_id}/book")
    }
}

/// Document extraction endpoints.
pub mod documents {
    /// Extract fields from an ETR document.
    pub const ETR_EXTRACT: &str = "/api/etr/extract";
    /// List supported ETR document types.
    pub const ETR_TYPES: &str = "/api/etr/types";
    /// Extract trade fields from an unstructured document.
    pub const BLOTTING_EXTRACT: &str = "/api/blotting/extract-pdf";
}

/// Agent registry endpoints.
pub mod agents {
    /// List registered agents.
    pub const LIST: &str = "/api/agents";
    /// Agent registry service status.
    pub const STATUS: &str = "/api/agents/status";

    /// Single agent detail.
    pub fn detail(agent_id: u64) -> String {
        format!("/api/agents/{agent_id}")
    }

    /// Agent reputation summary.
    pub fn reputation(agent_id: u64) -> String {
        format!("/api/agents/{agent_id}/reputation")
    }
}

/// Blockchain inspection endpoints.
pub mod blockchain {
    /// Blockchain connection status.
    pub const STATUS: &str = "/api/blockchain/status";

    /// Persistence record for a trade or document.
    pub fn persistence(record_id: &str) -> String {
        format!("/api/blockchain/persistence/{record_id}")
    }
}
