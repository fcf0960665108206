//! Access-log entries: one immutable record per attempted data access.

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::error::ValidationError;
use crate::types::{ConsentId, LogId};
use crate::validation::require_text;

/// Kind of access attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    Read,
    Write,
    Update,
    Delete,
}

/// One attempted data access by a service provider.
///
/// `consent_id` is a best-effort link: the consent may never have existed
/// or may have been deleted since.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    pub log_id: LogId,
    pub timestamp: Timestamp,
    pub service_provider_id: String,
    pub service_provider_name: String,
    /// Single data category, e.g. `"profile.email"`.
    pub data_type: String,
    pub action: AccessAction,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_id: Option<ConsentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Input for appending an access-log entry.
///
/// `timestamp` defaults to the store's current time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccessLogEntry {
    pub service_provider_id: String,
    pub service_provider_name: String,
    pub data_type: String,
    pub action: AccessAction,
    pub success: bool,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub consent_id: Option<ConsentId>,
    #[serde(default)]
    pub details: Option<String>,
}

impl NewAccessLogEntry {
    /// Create input with the required fields.
    pub fn new(
        service_provider_id: impl Into<String>,
        service_provider_name: impl Into<String>,
        data_type: impl Into<String>,
        action: AccessAction,
        success: bool,
    ) -> Self {
        Self {
            service_provider_id: service_provider_id.into(),
            service_provider_name: service_provider_name.into(),
            data_type: data_type.into(),
            action,
            success,
            timestamp: None,
            consent_id: None,
            details: None,
        }
    }

    /// Link to a consent grant.
    pub fn with_consent(mut self, consent_id: ConsentId) -> Self {
        self.consent_id = Some(consent_id);
        self
    }

    /// Attach free-text details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Record the access at a specific time instead of "now".
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Check that all required fields are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("serviceProviderId", &self.service_provider_id)?;
        require_text("serviceProviderName", &self.service_provider_name)?;
        require_text("dataType", &self.data_type)?;
        Ok(())
    }

    /// Build the stored entry.
    pub fn into_entry(self, log_id: LogId, now: Timestamp) -> AccessLogEntry {
        AccessLogEntry {
            log_id,
            timestamp: self.timestamp.unwrap_or(now),
            service_provider_id: self.service_provider_id,
            service_provider_name: self.service_provider_name,
            data_type: self.data_type,
            action: self.action,
            success: self.success,
            consent_id: self.consent_id,
            details: self.details,
        }
    }
}
