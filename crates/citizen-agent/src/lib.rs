//! # Citizen Agent
//!
//! The unified API for a personal-data agent's consent and audit records.
//!
//! ## Overview
//!
//! The agent keeps three in-memory collections:
//!
//! - **Consents**: which service provider may access which data categories, and why
//! - **Access logs**: an append-only trail of every access attempt
//! - **Notifications**: messages to the citizen about requests, accesses, and alerts
//!
//! ## Key Concepts
//!
//! - **Status**: a consent is `pending`, `active`, `revoked`, or `expired`. Any
//!   status can be set by update; revoke always succeeds.
//! - **Links**: logs and notifications point at consents by id only. Deleting a
//!   consent does not touch them.
//! - **Envelopes**: every result is rendered as `{success, data?, error?, timestamp}`.
//!
//! ## Usage
//!
//! ```rust
//! use citizen_agent::{Agent, AgentConfig, NewConsent, response};
//!
//! let agent = Agent::new(AgentConfig::default()).unwrap();
//!
//! let grant = agent
//!     .create_consent(NewConsent::new(
//!         "did:example:sp1",
//!         "Health Portal X",
//!         vec!["health.heartrate".into()],
//!         "Display health dashboard",
//!     ))
//!     .unwrap();
//!
//! let page = agent.page_request(None, None).unwrap();
//! let rendered = response::render_page(agent.list_consents(Some("active"), page));
//! assert_eq!(rendered.status, 200);
//!
//! let rendered = response::render_empty(agent.delete_consent(&grant.consent_id.to_string()));
//! assert_eq!(rendered.status, 204);
//! ```
//!
//! ## Re-exports
//!
//! - `citizen_agent::core` - Records, pagination, envelopes
//! - `citizen_agent::store` - The in-memory stores

pub mod agent;
pub mod config;
pub mod error;
pub mod response;

pub use citizen_agent_core as core;
pub use citizen_agent_store as store;

pub use agent::{Agent, AgentState, AgentStatus};
pub use config::{AgentConfig, DEFAULT_CUSTODIAN_ID};
pub use error::{AgentError, Result};

pub use citizen_agent_core::{
    AccessAction, AccessLogEntry, ActionKind, ApiResponse, Clock, ConsentGrant, ConsentId,
    ConsentStatus, ConsentUpdate, ErrorCode, LogId, NewAccessLogEntry, NewConsent,
    NewNotification, Notification, NotificationAction, NotificationId, NotificationKind, Page,
    PageRequest, PaginatedResponse, SystemClock, Timestamp,
};
