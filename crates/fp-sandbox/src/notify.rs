//! Captured toast notifications.

use std::sync::Arc;

use fp_api::{Notifier, UserId};

use crate::events::{EventLog, NotifyLevel, SandboxEvent};

/// Notifier view for one user; toasts land in the event log.
pub struct SandboxNotifier {
    user: UserId,
    events: Arc<EventLog>,
}

impl SandboxNotifier {
    pub(crate) fn new(user: UserId, events: Arc<EventLog>) -> Self {
        Self { user, events }
    }

    fn push(&self, level: NotifyLevel, text: &str) {
        self.events.push(SandboxEvent::NotificationSent {
            user: self.user,
            level,
            text: text.to_string(),
        });
    }
}

impl Notifier for SandboxNotifier {
    fn info(&self, text: &str) {
        tracing::info!(user = %self.user, text, "notification");
        self.push(NotifyLevel::Info, text);
    }

    fn warn(&self, text: &str) {
        tracing::warn!(user = %self.user, text, "notification");
        self.push(NotifyLevel::Warn, text);
    }

    fn error(&self, text: &str) {
        tracing::error!(user = %self.user, text, "notification");
        self.push(NotifyLevel::Error, text);
    }
}
