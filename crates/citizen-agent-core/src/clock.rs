//! Time source for record timestamps.

use chrono::{DateTime, Utc};

/// A UTC instant, serialized as RFC 3339.
pub type Timestamp = DateTime<Utc>;

/// Source of "now" for stores.
///
/// Stores never read the system clock directly so tests can pin time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Advance `previous` to `now`, never moving backwards.
///
/// Guards `updated_at` against wall-clock steps backwards.
pub fn advance(previous: Timestamp, now: Timestamp) -> Timestamp {
    previous.max(now)
}
