//! Append-only access log.
//!
//! There is no update or delete: once appended, an entry is never changed.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use citizen_agent_core::{
    select_all, AccessLogEntry, Clock, LogId, NewAccessLogEntry, Page, PageRequest, SystemClock,
};

use crate::error::{Result, StoreError};

/// Owns the access-log entries of one agent, in append order.
pub struct AccessLogStore {
    entries: RwLock<Vec<AccessLogEntry>>,
    clock: Arc<dyn Clock>,
}

impl AccessLogStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Append an entry, stamping `timestamp` with now unless supplied.
    ///
    /// The linked consent, if any, is not checked.
    pub fn append(&self, input: NewAccessLogEntry) -> Result<AccessLogEntry> {
        input.validate()?;

        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned("access log"))?;
        let log_id = loop {
            let id = LogId::generate();
            if !entries.iter().any(|e| e.log_id == id) {
                break id;
            }
        };
        let entry = input.into_entry(log_id, self.clock.now());
        entries.push(entry.clone());
        Ok(entry)
    }

    /// One page of entries in append order.
    pub fn list(&self, request: PageRequest) -> Result<Page<AccessLogEntry>> {
        let entries = self.read()?;
        Ok(select_all(entries.as_slice(), request))
    }

    /// Every entry, in append order, unpaginated.
    pub fn export_all(&self) -> Result<Vec<AccessLogEntry>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<AccessLogEntry>>> {
        self.entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("access log"))
    }
}

impl Default for AccessLogStore {
    fn default() -> Self {
        Self::new()
    }
}
