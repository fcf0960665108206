//! The Agent: unified API over the consent, access-log, and notification
//! stores.
//!
//! A transport layer calls exactly one Agent method per request and hands
//! the result to [`crate::response`] for rendering. Identifiers and query
//! parameters arrive here as raw strings and are parsed before reaching the
//! stores.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use citizen_agent_core::{
    AccessLogEntry, Clock, ConsentGrant, ConsentId, ConsentStatus, ConsentUpdate,
    NewAccessLogEntry, NewConsent, NewNotification, Notification, NotificationId, Page,
    PageRequest, SystemClock, Timestamp,
};
use citizen_agent_store::{AccessLogStore, ConsentStore, NotificationStore};

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};

/// Run state reported by [`Agent::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Active,
    Inactive,
    Error,
}

/// Snapshot of the agent for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    pub status: AgentState,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_did: Option<String>,
    /// Time of the last successful mutation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<Timestamp>,
}

/// The main Agent struct.
///
/// Provides a unified API for:
/// - Creating, querying, updating, revoking, and deleting consent grants
/// - Recording and exporting data-access events
/// - Creating, listing, and acknowledging notifications
pub struct Agent {
    config: AgentConfig,
    consents: ConsentStore,
    access_logs: AccessLogStore,
    notifications: NotificationStore,
    clock: Arc<dyn Clock>,
    last_activity: RwLock<Option<Timestamp>>,
}

impl Agent {
    /// Create an agent with empty stores.
    pub fn new(config: AgentConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an agent whose stores read time from `clock`.
    pub fn with_clock(config: AgentConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        info!(custodian_id = %config.custodian_id, "agent started");

        Ok(Self {
            consents: ConsentStore::with_clock(config.custodian_id.clone(), Arc::clone(&clock)),
            access_logs: AccessLogStore::with_clock(Arc::clone(&clock)),
            notifications: NotificationStore::with_clock(Arc::clone(&clock)),
            config,
            clock,
            last_activity: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn consents(&self) -> &ConsentStore {
        &self.consents
    }

    pub fn access_logs(&self) -> &AccessLogStore {
        &self.access_logs
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    /// The time source shared by all three stores.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Report run state, version, and last activity.
    pub fn status(&self) -> AgentStatus {
        let last_activity = self.last_activity.read().ok().and_then(|guard| *guard);
        AgentStatus {
            status: AgentState::Active,
            version: self.config.version.clone(),
            agent_did: Some(self.config.custodian_id.clone()),
            last_activity,
        }
    }

    /// Parse raw `page` / `pageSize` parameters using configured defaults.
    pub fn page_request(&self, page: Option<&str>, page_size: Option<&str>) -> Result<PageRequest> {
        PageRequest::parse(
            page,
            page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        )
        .map_err(|e| {
            warn!(error = %e, "rejected page parameters");
            AgentError::from(e)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Consent Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List consents, optionally filtered by a status name.
    ///
    /// An empty filter means no filter. A name that is not a known status
    /// matches no grant, giving an empty page.
    pub fn list_consents(
        &self,
        status: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<ConsentGrant>> {
        let status = match status.filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<ConsentStatus>() {
                Ok(status) => Some(status),
                Err(e) => {
                    debug!(error = %e, "status filter matches nothing");
                    return Ok(Page::empty(page));
                }
            },
        };

        let result = self.consents.list(status, page)?;
        debug!(
            status = ?status,
            page = page.page(),
            returned = result.items.len(),
            total = result.total_items,
            "listed consents"
        );
        Ok(result)
    }

    pub fn get_consent(&self, consent_id: &str) -> Result<ConsentGrant> {
        let id = parse_consent_id(consent_id)?;
        let grant = checked("get consent", self.consents.get(&id))?;
        debug!(consent_id = %id, "fetched consent");
        Ok(grant)
    }

    pub fn create_consent(&self, input: NewConsent) -> Result<ConsentGrant> {
        let grant = checked("create consent", self.consents.create(input))?;
        info!(
            consent_id = %grant.consent_id,
            provider = %grant.service_provider_id,
            status = %grant.status,
            "consent created"
        );
        self.touch(grant.updated_at);
        Ok(grant)
    }

    /// Overwrite the supplied fields of a consent.
    pub fn update_consent(&self, consent_id: &str, update: ConsentUpdate) -> Result<ConsentGrant> {
        let id = parse_consent_id(consent_id)?;
        let grant = checked("update consent", self.consents.update(&id, update))?;
        info!(consent_id = %id, status = %grant.status, "consent updated");
        self.touch(grant.updated_at);
        Ok(grant)
    }

    pub fn revoke_consent(&self, consent_id: &str) -> Result<ConsentGrant> {
        let id = parse_consent_id(consent_id)?;
        let grant = checked("revoke consent", self.consents.revoke(&id))?;
        info!(consent_id = %id, "consent revoked");
        self.touch(grant.updated_at);
        Ok(grant)
    }

    /// Delete a consent. Logs and notifications that mention it are kept.
    pub fn delete_consent(&self, consent_id: &str) -> Result<()> {
        let id = parse_consent_id(consent_id)?;
        checked("delete consent", self.consents.delete(&id))?;
        info!(consent_id = %id, "consent deleted");
        self.touch(self.clock.now());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access Log Operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_access_logs(&self, page: PageRequest) -> Result<Page<AccessLogEntry>> {
        let result = self.access_logs.list(page)?;
        debug!(page = page.page(), total = result.total_items, "listed access logs");
        Ok(result)
    }

    /// Record one access attempt.
    pub fn record_access(&self, input: NewAccessLogEntry) -> Result<AccessLogEntry> {
        let entry = checked("record access", self.access_logs.append(input))?;
        info!(
            log_id = %entry.log_id,
            provider = %entry.service_provider_id,
            data_type = %entry.data_type,
            success = entry.success,
            "access recorded"
        );
        self.touch(self.clock.now());
        Ok(entry)
    }

    /// Every access-log entry, unpaginated.
    pub fn export_access_logs(&self) -> Result<Vec<AccessLogEntry>> {
        let entries = self.access_logs.export_all()?;
        info!(count = entries.len(), "access logs exported");
        Ok(entries)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notification Operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_notifications(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>> {
        let result = self.notifications.list(unread_only, page)?;
        debug!(
            unread_only,
            page = page.page(),
            total = result.total_items,
            "listed notifications"
        );
        Ok(result)
    }

    pub fn create_notification(&self, input: NewNotification) -> Result<Notification> {
        let notification = checked("create notification", self.notifications.create(input))?;
        info!(
            notification_id = %notification.notification_id,
            kind = ?notification.kind,
            "notification created"
        );
        self.touch(self.clock.now());
        Ok(notification)
    }

    pub fn mark_notification_read(&self, notification_id: &str) -> Result<Notification> {
        let id = notification_id.parse::<NotificationId>().map_err(|_| {
            warn!(notification_id, "unparseable notification id");
            AgentError::NotificationNotFound(notification_id.to_string())
        })?;
        let notification = checked("mark notification read", self.notifications.mark_read(&id))?;
        info!(notification_id = %id, "notification marked read");
        self.touch(self.clock.now());
        Ok(notification)
    }

    fn touch(&self, at: Timestamp) {
        if let Ok(mut last) = self.last_activity.write() {
            let next = match *last {
                Some(prev) => prev.max(at),
                None => at,
            };
            *last = Some(next);
        }
    }
}

/// An identifier that is not a UUID can't match any consent.
fn parse_consent_id(raw: &str) -> Result<ConsentId> {
    raw.parse::<ConsentId>().map_err(|_| {
        warn!(consent_id = raw, "unparseable consent id");
        AgentError::ConsentNotFound(raw.to_string())
    })
}

/// Convert a store result, logging the failure.
fn checked<T>(operation: &str, result: citizen_agent_store::Result<T>) -> Result<T> {
    result.map_err(|error| {
        warn!(operation, %error, "store operation failed");
        AgentError::from(error)
    })
}
