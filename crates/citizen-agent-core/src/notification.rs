//! User-facing notifications.

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::error::ValidationError;
use crate::types::NotificationId;
use crate::validation::require_text;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ConsentRequest,
    DataAccess,
    SecurityAlert,
    SystemUpdate,
}

/// What a suggested action does when chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ViewConsent,
    MarkRead,
}

/// A suggested follow-up shown with a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    pub label: String,
    pub action_type: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NotificationAction {
    pub fn new(label: impl Into<String>, action_type: ActionKind) -> Self {
        Self {
            label: label.into(),
            action_type,
            url: None,
        }
    }
}

/// A message for the citizen about a consent, an access, or the system.
///
/// `is_read` only ever goes from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: Timestamp,
    pub is_read: bool,
    /// Opaque link to a consent or log entry. May not resolve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<NotificationAction>>,
}

/// Input for creating a notification.
///
/// `timestamp` defaults to now and `is_read` to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub is_read: Option<bool>,
    #[serde(default)]
    pub related_entity_id: Option<String>,
    #[serde(default)]
    pub actions: Option<Vec<NotificationAction>>,
}

impl NewNotification {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: None,
            is_read: None,
            related_entity_id: None,
            actions: None,
        }
    }

    /// Link to a related consent or log entry by its string id.
    pub fn related_to(mut self, entity_id: impl ToString) -> Self {
        self.related_entity_id = Some(entity_id.to_string());
        self
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(action);
        self
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Create the notification already read.
    pub fn read(mut self) -> Self {
        self.is_read = Some(true);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("message", &self.message)?;
        Ok(())
    }

    pub fn into_notification(
        self,
        notification_id: NotificationId,
        now: Timestamp,
    ) -> Notification {
        Notification {
            notification_id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            timestamp: self.timestamp.unwrap_or(now),
            is_read: self.is_read.unwrap_or(false),
            related_entity_id: self.related_entity_id,
            actions: self.actions,
        }
    }
}
