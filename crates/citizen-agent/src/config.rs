//! Agent configuration.

use serde::{Deserialize, Serialize};

use citizen_agent_core::DEFAULT_PAGE_SIZE;

use crate::error::{AgentError, Result};

/// Custodian identifier used when none is configured.
pub const DEFAULT_CUSTODIAN_ID: &str = "did:mock:local-agent-123";

/// Configuration for the Agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Identifier of this agent, written into every consent grant.
    pub custodian_id: String,
    /// Version reported by [`crate::Agent::status`].
    pub version: String,
    /// Page size used when a request supplies none.
    pub default_page_size: u32,
    /// Largest page size a request may ask for. Unbounded unless a
    /// deployment sets a cap.
    pub max_page_size: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            custodian_id: DEFAULT_CUSTODIAN_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: u32::MAX,
        }
    }
}

impl AgentConfig {
    /// Parse from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AgentError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the page-size settings and custodian id.
    pub fn validate(&self) -> Result<()> {
        if self.custodian_id.trim().is_empty() {
            return Err(AgentError::Config("custodianId must not be empty".into()));
        }
        if self.max_page_size == 0 {
            return Err(AgentError::Config("maxPageSize must be at least 1".into()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(AgentError::Config(format!(
                "defaultPageSize must be between 1 and {}",
                self.max_page_size
            )));
        }
        Ok(())
    }
}
