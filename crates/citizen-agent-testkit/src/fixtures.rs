//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};

use citizen_agent::{Agent, AgentConfig, Result};
use citizen_agent_core::{
    AccessAction, ActionKind, Clock, ConsentId, ConsentStatus, ConsentUpdate, LogId,
    NewAccessLogEntry, NewConsent, NewNotification, NotificationAction, NotificationId,
    NotificationKind, Timestamp,
};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Jump to `at`, forwards or backwards.
    pub fn set(&self, at: Timestamp) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// An agent whose stores all read from one [`ManualClock`].
pub struct TestFixture {
    pub agent: Agent,
    pub clock: Arc<ManualClock>,
}

impl TestFixture {
    /// Create a fixture with the default config, clock starting now.
    pub fn new() -> Self {
        Self::with_config(AgentConfig::default())
    }

    pub fn with_config(config: AgentConfig) -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let agent = Agent::with_clock(config, clock.clone()).expect("fixture config is valid");
        Self { agent, clock }
    }

    /// A fixture already holding the demo dataset, with the revoked grant
    /// created 60 days and last updated 30 days before the clock's now.
    pub fn seeded() -> (Self, SampleIds) {
        let fixture = Self::new();
        let ids = seed(&fixture.agent, Some(fixture.clock.as_ref())).expect("sample data is valid");
        (fixture, ids)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifiers of the records created by [`seed_sample_data`], in creation
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIds {
    pub consents: [ConsentId; 3],
    pub logs: [LogId; 3],
    pub notifications: [NotificationId; 3],
}

/// Load the demo dataset: three consents (active, pending, revoked), three
/// access logs, and three notifications.
///
/// Every grant is stamped with the agent's current time. Use
/// [`TestFixture::seeded`] for the backdated revoked grant.
pub fn seed_sample_data(agent: &Agent) -> Result<SampleIds> {
    seed(agent, None)
}

fn seed(agent: &Agent, clock: Option<&ManualClock>) -> Result<SampleIds> {
    let now = agent.clock().now();

    let health_portal = agent.create_consent(
        NewConsent::new(
            "did:example:sp1",
            "Health Portal X",
            strings(&["profile.name", "health.heartrate"]),
            "Display health dashboard",
        )
        .with_status(ConsentStatus::Active)
        .with_granted(strings(&["profile.name", "health.heartrate"])),
    )?;
    let gov_service = agent.create_consent(
        NewConsent::new(
            "did:example:sp2",
            "GovService Y",
            strings(&["profile.address"]),
            "Verify address for benefits",
        )
        .with_status(ConsentStatus::Pending)
        .with_expiry(now + Duration::days(30))
        .with_granted(strings(&["profile.address"])),
    )?;
    let old_service = NewConsent::new(
        "did:example:sp3",
        "Old Service Z",
        strings(&["profile.email"]),
        "Newsletter subscription",
    )
    .with_status(ConsentStatus::Revoked);
    let old_service = at_time(clock, now - Duration::days(60), now, || {
        agent.create_consent(old_service)
    })?;
    let old_service = at_time(clock, now - Duration::days(30), now, || {
        agent.update_consent(
            &old_service.consent_id.to_string(),
            ConsentUpdate::status(ConsentStatus::Revoked),
        )
    })?;

    let heart_rate = agent.record_access(
        NewAccessLogEntry::new(
            "did:example:sp1",
            "Health Portal X",
            "health.heartrate",
            AccessAction::Read,
            true,
        )
        .with_consent(health_portal.consent_id)
        .at(now),
    )?;
    let name = agent.record_access(
        NewAccessLogEntry::new(
            "did:example:sp1",
            "Health Portal X",
            "profile.name",
            AccessAction::Read,
            true,
        )
        .with_consent(health_portal.consent_id)
        .at(now - Duration::hours(1)),
    )?;
    let failed = agent.record_access(
        NewAccessLogEntry::new(
            "did:example:sp2",
            "GovService Y",
            "profile.address",
            AccessAction::Read,
            false,
        )
        .with_details("User not found in external system")
        .at(now - Duration::hours(2)),
    )?;

    let request = agent.create_notification(
        NewNotification::new(
            NotificationKind::ConsentRequest,
            "New Consent Request",
            "GovService Y is requesting access to your address.",
        )
        .related_to(gov_service.consent_id)
        .with_action(NotificationAction::new("View Consent", ActionKind::ViewConsent))
        .at(now),
    )?;
    let access = agent.create_notification(
        NewNotification::new(
            NotificationKind::DataAccess,
            "Data Accessed",
            "Health Portal X accessed your heart rate data.",
        )
        .related_to(heart_rate.log_id)
        .at(now),
    )?;
    let alert = agent.create_notification(
        NewNotification::new(
            NotificationKind::SecurityAlert,
            "Failed Login Attempt",
            "An unsuccessful login attempt was made to your account.",
        )
        .at(now - Duration::minutes(5))
        .read(),
    )?;

    Ok(SampleIds {
        consents: [health_portal.consent_id, gov_service.consent_id, old_service.consent_id],
        logs: [heart_rate.log_id, name.log_id, failed.log_id],
        notifications: [request.notification_id, access.notification_id, alert.notification_id],
    })
}

/// Run `f` with `clock` set to `at`, then put it back to `now`. Without a
/// manual clock, `f` runs at whatever time the agent reads.
fn at_time<T>(
    clock: Option<&ManualClock>,
    at: Timestamp,
    now: Timestamp,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let Some(clock) = clock else {
        return f();
    };
    clock.set(at);
    let result = f();
    clock.set(now);
    result
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
