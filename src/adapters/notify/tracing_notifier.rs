//! Tracing Notifier - renders toasts as log events.

use crate::ports::{Notification, NotificationLevel, Notifier};

/// Notifier for headless use: every toast becomes a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(toast = "success", "{}", notification.text)
            }
            NotificationLevel::Info => tracing::info!(toast = "info", "{}", notification.text),
            NotificationLevel::Error => tracing::warn!(toast = "error", "{}", notification.text),
        }
    }
}
