//! ERC-8004 agent registry endpoints.
//!
//! Agents are autonomous services registered on chain with a verifiable
//! identity and a community reputation score.

mod types;

pub use types::*;

use crate::error::HavonaError;
use crate::rest::HavonaClient;
use crate::rest::endpoints::agents;

/// Agent registry operations, borrowed from a [`HavonaClient`].
#[derive(Debug, Clone, Copy)]
pub struct Agents<'a> {
    client: &'a HavonaClient,
}

impl HavonaClient {
    /// On-chain agent registry and reputation.
    pub fn agents(&self) -> Agents<'_> {
        Agents { client: self }
    }
}

impl Agents<'_> {
    /// List all registered agents.
    ///
    /// Returns an empty list when the registry reports no agents, which is
    /// also what the server answers while its chain connection is down.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use havona_client::HavonaClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = HavonaClient::from_env()?;
    ///     for agent in client.agents().list().await? {
    ///         let reputation = client.agents().reputation(agent.id).await?;
    ///         println!("{} {} {:?}", agent.id, agent.name, reputation.average_score);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn list(&self) -> Result<Vec<Agent>, HavonaError> {
        let list: AgentList = self.client.get(agents::LIST).await?;
        Ok(list.agents)
    }

    /// Fetch a single agent by its on-chain id.
    pub async fn get(&self, agent_id: u64) -> Result<Agent, HavonaError> {
        self.client.get(&agents::detail(agent_id)).await
    }

    /// Fetch aggregated reputation for an agent.
    pub async fn reputation(&self, agent_id: u64) -> Result<AgentReputation, HavonaError> {
        let summary: ReputationSummary = self.client.get(&agents::reputation(agent_id)).await?;
        Ok(summary.into_reputation(agent_id))
    }

    /// Health of the agent registry service.
    pub async fn status(&self) -> Result<AgentRegistryStatus, HavonaError> {
        self.client.get(agents::STATUS).await
    }
}
