//! # Citizen Agent Core
//!
//! Pure records for the Citizen Agent: consent grants, access-log entries,
//! notifications, and the pagination and envelope helpers shared by every
//! store.
//!
//! This crate contains no I/O and no shared state. Stores live in
//! `citizen-agent-store`.
//!
//! ## Key Types
//!
//! - [`ConsentGrant`] - Authorization for a provider to access data categories
//! - [`AccessLogEntry`] - Immutable record of one access attempt
//! - [`Notification`] - User-facing message, read at most once
//! - [`PageRequest`] / [`Page`] - 1-indexed pagination
//! - [`ApiResponse`] / [`PaginatedResponse`] - Response envelopes
//!
//! ## Cross-references
//!
//! Log entries and notifications refer to consents by identifier only.
//! Nothing checks that the target exists, and deleting a consent leaves
//! such references dangling.

pub mod access_log;
pub mod clock;
pub mod consent;
pub mod envelope;
pub mod error;
pub mod notification;
pub mod pagination;
pub mod types;
pub mod validation;

pub use access_log::{AccessAction, AccessLogEntry, NewAccessLogEntry};
pub use clock::{Clock, SystemClock, Timestamp};
pub use consent::{ConsentGrant, ConsentStatus, ConsentUpdate, NewConsent};
pub use envelope::{
    wrap_error, wrap_page, wrap_page_error, wrap_result, ApiError, ApiResponse, ErrorCode,
    PaginatedResponse, Pagination,
};
pub use error::ValidationError;
pub use notification::{
    ActionKind, NewNotification, Notification, NotificationAction, NotificationKind,
};
pub use pagination::{select_all, select_page, Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use types::{ConsentId, LogId, NotificationId};
