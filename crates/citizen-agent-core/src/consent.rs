//! Consent grants: who may access which categories of data, and why.
//!
//! A grant is created by [`NewConsent`] and changed by [`ConsentUpdate`] or
//! by revocation. Status changes are deliberately unguarded: any status can
//! be written over any other, and nothing moves a grant to `expired` or
//! `active` based on time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::error::ValidationError;
use crate::types::ConsentId;
use crate::validation::{require_non_empty, require_text};

/// Lifecycle status of a consent grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentStatus {
    Pending,
    #[default]
    Active,
    Revoked,
    Expired,
}

impl ConsentStatus {
    /// All statuses, in declaration order.
    pub const ALL: [ConsentStatus; 4] = [
        ConsentStatus::Pending,
        ConsentStatus::Active,
        ConsentStatus::Revoked,
        ConsentStatus::Expired,
    ];

    /// The wire name of this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConsentStatus::Pending => "pending",
            ConsentStatus::Active => "active",
            ConsentStatus::Revoked => "revoked",
            ConsentStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConsentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// A record authorizing a service provider to access data categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentGrant {
    /// Unique, immutable identifier.
    pub consent_id: ConsentId,

    /// DID or other identifier of the requesting party.
    pub service_provider_id: String,

    /// Human-readable name of the requesting party.
    pub service_provider_name: String,

    /// Data categories requested, e.g. `"health.heartrate"`.
    pub data_types: Vec<String>,

    /// Free-text justification.
    pub purpose: String,

    pub status: ConsentStatus,

    pub created_at: Timestamp,

    /// Advances on every mutation; never earlier than `created_at`.
    pub updated_at: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,

    /// The agent holding the underlying data.
    pub data_custodian_id: String,

    /// Categories actually authorized. Intended to be a subset of
    /// `data_types`, but not enforced.
    #[serde(default)]
    pub granted_data_types: Vec<String>,
}

/// Input for creating a consent grant.
///
/// Defaults for absent optional fields:
/// - `status`: [`ConsentStatus::Active`]
/// - `expires_at`: none
/// - `granted_data_types`: empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewConsent {
    pub service_provider_id: String,
    pub service_provider_name: String,
    pub data_types: Vec<String>,
    pub purpose: String,
    pub status: Option<ConsentStatus>,
    pub expires_at: Option<Timestamp>,
    pub granted_data_types: Option<Vec<String>>,
}

impl NewConsent {
    /// Create input with the required fields; optional fields default.
    pub fn new(
        service_provider_id: impl Into<String>,
        service_provider_name: impl Into<String>,
        data_types: Vec<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            service_provider_id: service_provider_id.into(),
            service_provider_name: service_provider_name.into(),
            data_types,
            purpose: purpose.into(),
            ..Self::default()
        }
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: ConsentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set an expiry time.
    pub fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set the granted subset of data types.
    pub fn with_granted(mut self, granted: Vec<String>) -> Self {
        self.granted_data_types = Some(granted);
        self
    }

    /// Check that all required fields are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("serviceProviderId", &self.service_provider_id)?;
        require_text("serviceProviderName", &self.service_provider_name)?;
        require_non_empty("dataTypes", &self.data_types)?;
        require_text("purpose", &self.purpose)?;
        Ok(())
    }

    /// Build the stored record, applying defaults.
    ///
    /// Does not validate; call [`NewConsent::validate`] first.
    pub fn into_grant(
        self,
        consent_id: ConsentId,
        custodian_id: impl Into<String>,
        now: Timestamp,
    ) -> ConsentGrant {
        ConsentGrant {
            consent_id,
            service_provider_id: self.service_provider_id,
            service_provider_name: self.service_provider_name,
            data_types: self.data_types,
            purpose: self.purpose,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            expires_at: self.expires_at,
            data_custodian_id: custodian_id.into(),
            granted_data_types: self.granted_data_types.unwrap_or_default(),
        }
    }
}

/// Partial update of a consent grant. Every supplied field overwrites,
/// except a blank `purpose`, which counts as not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentUpdate {
    pub purpose: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub data_types: Option<Vec<String>>,
    pub status: Option<ConsentStatus>,
    pub granted_data_types: Option<Vec<String>>,
}

impl ConsentUpdate {
    /// An update that only changes status.
    pub fn status(status: ConsentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl ConsentGrant {
    /// Apply a partial update. The caller stamps `updated_at`.
    pub fn apply(&mut self, update: ConsentUpdate) {
        if let Some(purpose) = update.purpose.filter(|p| !p.trim().is_empty()) {
            self.purpose = purpose;
        }
        if let Some(expires_at) = update.expires_at {
            self.expires_at = Some(expires_at);
        }
        if let Some(data_types) = update.data_types {
            self.data_types = data_types;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(granted) = update.granted_data_types {
            self.granted_data_types = granted;
        }
    }

    /// True if `granted_data_types` only names requested categories.
    ///
    /// Informational; stores never reject grants that fail this.
    pub fn granted_within_requested(&self) -> bool {
        self.granted_data_types
            .iter()
            .all(|granted| self.data_types.contains(granted))
    }
}
