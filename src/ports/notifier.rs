//! Notifier Port - user-facing toast notifications.

use serde::{Deserialize, Serialize};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A message shown to the user, never containing secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            text: text.into(),
        }
    }
}

/// Port for surfacing notifications. Fire-and-forget; never fails.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, text: &str) {
        self.notify(Notification::success(text));
    }

    fn info(&self, text: &str) {
        self.notify(Notification::info(text));
    }

    fn error(&self, text: &str) {
        self.notify(Notification::error(text));
    }
}
