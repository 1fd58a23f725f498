//! Recording Notifier - keeps toasts for a UI layer or a test to read back.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{Notification, NotificationLevel, Notifier};

/// Notifier that records every notification in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.notifications.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All notifications so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.entries().clone()
    }

    /// Notifications of one level.
    pub fn of_level(&self, level: NotificationLevel) -> Vec<Notification> {
        self.entries()
            .iter()
            .filter(|n| n.level == level)
            .cloned()
            .collect()
    }

    /// Returns true if any notification has exactly this text.
    pub fn contains(&self, text: &str) -> bool {
        self.entries().iter().any(|n| n.text == text)
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.entries().push(notification);
    }
}
