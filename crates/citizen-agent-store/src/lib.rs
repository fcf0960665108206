//! # Citizen Agent Store
//!
//! In-memory stores for the three collections the agent owns.
//!
//! ## Overview
//!
//! Each store exclusively owns one ordered collection and exposes only the
//! operations below. Stores never call each other; links between records
//! are plain identifiers.
//!
//! - [`ConsentStore`] - create, get, list by status, update, revoke, delete
//! - [`AccessLogStore`] - append, list, export (append-only)
//! - [`NotificationStore`] - create, list unread, mark read
//!
//! ## Usage
//!
//! ```rust
//! use citizen_agent_core::{NewConsent, PageRequest};
//! use citizen_agent_store::ConsentStore;
//!
//! let store = ConsentStore::new("did:mock:local-agent-123");
//! let grant = store
//!     .create(NewConsent::new(
//!         "did:example:sp1",
//!         "Health Portal X",
//!         vec!["health.heartrate".into()],
//!         "Display health dashboard",
//!     ))
//!     .unwrap();
//!
//! let page = store.list(None, PageRequest::default()).unwrap();
//! assert_eq!(page.items[0].consent_id, grant.consent_id);
//! ```
//!
//! ## Design Notes
//!
//! - **No persistence**: state lives only as long as the store.
//! - **Serialized mutation**: one `RwLock` per collection.
//! - **Silent**: stores report errors but never log or retry.
//! - **No cascades**: deleting a consent leaves references to it dangling.

pub mod access_log;
pub mod consent;
pub mod error;
pub mod notification;

pub use access_log::AccessLogStore;
pub use consent::ConsentStore;
pub use error::{Result, StoreError};
pub use notification::NotificationStore;
