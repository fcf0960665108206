//! In-memory notification store.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use citizen_agent_core::{
    select_page, Clock, NewNotification, Notification, NotificationId, Page, PageRequest,
    SystemClock,
};

use crate::error::{Result, StoreError};

/// Owns the notifications of one agent, in creation order.
///
/// `is_read` is only ever set, never cleared.
pub struct NotificationStore {
    notifications: RwLock<Vec<Notification>>,
    clock: Arc<dyn Clock>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Validate and append a notification.
    pub fn create(&self, input: NewNotification) -> Result<Notification> {
        input.validate()?;

        let mut notifications = self.write()?;
        let notification_id = loop {
            let id = NotificationId::generate();
            if !notifications.iter().any(|n| n.notification_id == id) {
                break id;
            }
        };
        let notification = input.into_notification(notification_id, self.clock.now());
        notifications.push(notification.clone());
        Ok(notification)
    }

    /// One page of notifications, optionally only unread ones.
    pub fn list(&self, unread_only: bool, request: PageRequest) -> Result<Page<Notification>> {
        let notifications = self.read()?;
        Ok(select_page(notifications.as_slice(), request, |n| !unread_only || !n.is_read))
    }

    /// Mark a notification read. Marking a read notification succeeds.
    pub fn mark_read(&self, notification_id: &NotificationId) -> Result<Notification> {
        let mut notifications = self.write()?;
        let notification = notifications
            .iter_mut()
            .find(|n| &n.notification_id == notification_id)
            .ok_or(StoreError::NotificationNotFound(*notification_id))?;

        notification.is_read = true;
        Ok(notification.clone())
    }

    /// Count of unread notifications.
    pub fn unread_count(&self) -> Result<usize> {
        Ok(self.read()?.iter().filter(|n| !n.is_read).count())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Notification>>> {
        self.notifications
            .read()
            .map_err(|_| StoreError::LockPoisoned("notification"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Notification>>> {
        self.notifications
            .write()
            .map_err(|_| StoreError::LockPoisoned("notification"))
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
