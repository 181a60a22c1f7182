//! Types for agent registry endpoints.

use serde::Deserialize;
use serde_json::{Map, Value};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::types::serde_helpers::{default_on_error, empty_string_as_none, null_as_default};

/// An ERC-8004 agent registered on chain.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "AgentRecord")]
pub struct Agent {
    /// On-chain agent id assigned at registration.
    pub id: u64,
    pub name: String,
    /// Agent type, e.g. `blotting` or `compliance`.
    pub agent_type: String,
    /// Agent wallet address.
    pub wallet: Option<String>,
    pub status: Option<String>,
    /// Registration metadata URI.
    pub metadata_uri: Option<String>,
    /// Every other field returned by the server.
    pub extra: Map<String, Value>,
}

#[serde_as]
#[derive(Deserialize)]
struct AgentRecord {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    id: u64,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    name: String,
    #[serde(rename = "agentType", default, deserialize_with = "empty_string_as_none::deserialize")]
    agent_type: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none::deserialize")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    wallet: Option<String>,
    #[serde(rename = "agentWallet", default, deserialize_with = "empty_string_as_none::deserialize")]
    agent_wallet: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "metadataUri", default, deserialize_with = "empty_string_as_none::deserialize")]
    metadata_uri: Option<String>,
    #[serde(rename = "tokenURI", default, deserialize_with = "empty_string_as_none::deserialize")]
    token_uri: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<AgentRecord> for Agent {
    fn from(record: AgentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            agent_type: record.agent_type.or(record.kind).unwrap_or_default(),
            wallet: record.wallet.or(record.agent_wallet),
            status: record.status,
            metadata_uri: record.metadata_uri.or(record.token_uri),
            extra: record.extra,
        }
    }
}

/// Aggregated reputation for an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReputation {
    pub agent_id: u64,
    /// Number of feedback entries received.
    pub total_feedback: u64,
    /// Mean feedback score, when any feedback exists.
    pub average_score: Option<f64>,
    /// Per-tag or per-client score breakdown.
    pub breakdown: Vec<Value>,
}

/// Wire shape of `/api/agents/{id}/reputation`; the agent id comes from the request.
#[derive(Deserialize)]
pub(crate) struct ReputationSummary {
    #[serde(rename = "totalFeedback", default, deserialize_with = "default_on_error::deserialize")]
    total_feedback: Option<u64>,
    #[serde(rename = "total_feedback", default, deserialize_with = "default_on_error::deserialize")]
    total_feedback_snake: Option<u64>,
    #[serde(rename = "averageScore", default, deserialize_with = "default_on_error::deserialize")]
    average_score: Option<f64>,
    #[serde(rename = "average_score", default, deserialize_with = "default_on_error::deserialize")]
    average_score_snake: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    breakdown: Vec<Value>,
}

impl ReputationSummary {
    pub(crate) fn into_reputation(self, agent_id: u64) -> AgentReputation {
        AgentReputation {
            agent_id,
            total_feedback: self
                .total_feedback
                .or(self.total_feedback_snake)
                .unwrap_or_default(),
            average_score: self.average_score.or(self.average_score_snake),
            breakdown: self.breakdown,
        }
    }
}

/// Health of the agent registry service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RegistryStatusRecord")]
pub struct AgentRegistryStatus {
    /// Whether the registry contract is reachable.
    pub connected: bool,
    pub contract_address: Option<String>,
    pub total_agents: u64,
    /// Every other field returned by the server.
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RegistryStatusRecord {
    #[serde(default)]
    connected: Option<bool>,
    #[serde(default)]
    blockchain_connected: Option<bool>,
    #[serde(rename = "contractAddress", default, deserialize_with = "empty_string_as_none::deserialize")]
    contract_address: Option<String>,
    #[serde(rename = "contract_address", default, deserialize_with = "empty_string_as_none::deserialize")]
    contract_address_snake: Option<String>,
    #[serde(rename = "totalAgents", default, deserialize_with = "default_on_error::deserialize")]
    total_agents: Option<u64>,
    #[serde(rename = "total_agents", default, deserialize_with = "default_on_error::deserialize")]
    total_agents_snake: Option<u64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RegistryStatusRecord> for AgentRegistryStatus {
    fn from(record: RegistryStatusRecord) -> Self {
        Self {
            connected: record
                .connected
                .or(record.blockchain_connected)
                .unwrap_or(false),
            contract_address: record.contract_address.or(record.contract_address_snake),
            total_agents: record
                .total_agents
                .or(record.total_agents_snake)
                .unwrap_or_default(),
            extra: record.extra,
        }
    }
}

/// Wire shape of `/api/agents`.
#[derive(Deserialize)]
pub(crate) struct AgentList {
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub(crate) agents: Vec<Agent>,
}
