//! Observable record of everything the sandbox host did.
//!
//! Every mutation and user-facing side effect is appended to a shared
//! [`EventLog`]. Tests assert on the log's contents and ordering (for
//! example, that a replacement message is created before the original
//! is deleted); the demo binary prints it.

use std::sync::Mutex;

use fp_api::{ActorId, MessageId, UserId};
use serde::Serialize;
use serde_json::Value;

use crate::relock;

/// Severity of a captured toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    /// Informational toast.
    Info,
    /// Warning toast.
    Warn,
    /// Error toast.
    Error,
}

/// One observable thing the sandbox host did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SandboxEvent {
    /// A namespaced flag was persisted on an actor.
    FlagWritten {
        /// The actor written to.
        actor: ActorId,
        /// The module namespace.
        namespace: String,
        /// The flag key.
        key: String,
        /// The stored value.
        value: Value,
    },
    /// A chat message was created.
    MessageCreated {
        /// The new message.
        message: MessageId,
        /// The posting user.
        author: UserId,
    },
    /// A chat message was deleted.
    MessageDeleted {
        /// The removed message.
        message: MessageId,
    },
    /// A toast notification reached a user.
    NotificationSent {
        /// The notified user.
        user: UserId,
        /// Toast severity.
        level: NotifyLevel,
        /// Toast text.
        text: String,
    },
    /// A remote method call left one session for another.
    RemoteInvoked {
        /// The calling user.
        from: UserId,
        /// The target user.
        to: UserId,
        /// The invoked method name.
        method: String,
    },
    /// A dialog was answered (or dismissed) by a scripted responder.
    DialogAnswered {
        /// The user the dialog was shown to.
        user: UserId,
        /// The dialog title.
        title: String,
        /// The scripted answer, e.g. `"accepted"` or `"dismissed"`.
        answer: String,
    },
    /// A module setting changed value.
    SettingChanged {
        /// The module namespace.
        namespace: String,
        /// The setting key.
        key: String,
        /// The new value.
        value: Value,
    },
}

impl SandboxEvent {
    /// Check whether this event touches the given message.
    pub fn involves_message(&self, id: MessageId) -> bool {
        match self {
            Self::MessageCreated { message, .. } | Self::MessageDeleted { message } => {
                *message == id
            }
            _ => false,
        }
    }

    /// Check whether this event touches the given actor.
    pub fn involves_actor(&self, id: ActorId) -> bool {
        matches!(self, Self::FlagWritten { actor, .. } if *actor == id)
    }
}

/// Accumulates sandbox events; shared by every service handle.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<SandboxEvent>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&self, event: SandboxEvent) {
        relock(self.events.lock()).push(event);
    }

    /// Snapshot of all recorded events, oldest first.
    pub fn snapshot(&self) -> Vec<SandboxEvent> {
        relock(self.events.lock()).clone()
    }

    /// Position of the first event matching a predicate.
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: Fn(&SandboxEvent) -> bool,
    {
        relock(self.events.lock()).iter().position(pred)
    }

    /// Captured notifications for one user, oldest first.
    pub fn notifications_for(&self, user: UserId) -> Vec<(NotifyLevel, String)> {
        relock(self.events.lock())
            .iter()
            .filter_map(|e| match e {
                SandboxEvent::NotificationSent {
                    user: notified,
                    level,
                    text,
                } if *notified == user => Some((*level, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        relock(self.events.lock()).len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        relock(self.events.lock()).is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&self) {
        relock(self.events.lock()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_snapshot_preserve_order() {
        let log = EventLog::new();
        let msg = MessageId::new();
        let author = UserId::new();
        log.push(SandboxEvent::MessageCreated {
            message: msg,
            author,
        });
        log.push(SandboxEvent::MessageDeleted { message: msg });

        let events = log.snapshot();
        assert_eq!(events.len(), 2);
        let created = log
            .position(|e| matches!(e, SandboxEvent::MessageCreated { .. }))
            .unwrap();
        let deleted = log
            .position(|e| matches!(e, SandboxEvent::MessageDeleted { .. }))
            .unwrap();
        assert!(created < deleted);
    }

    #[test]
    fn involves_message_matches_both_directions() {
        let msg = MessageId::new();
        let other = MessageId::new();
        let event = SandboxEvent::MessageDeleted { message: msg };
        assert!(event.involves_message(msg));
        assert!(!event.involves_message(other));
    }

    #[test]
    fn notifications_filter_by_user() {
        let log = EventLog::new();
        let alice = UserId::new();
        let bren = UserId::new();
        log.push(SandboxEvent::NotificationSent {
            user: alice,
            level: NotifyLevel::Info,
            text: "hello".into(),
        });
        log.push(SandboxEvent::NotificationSent {
            user: bren,
            level: NotifyLevel::Error,
            text: "boom".into(),
        });

        let for_alice = log.notifications_for(alice);
        assert_eq!(for_alice.len(), 1);
        assert_eq!(for_alice[0].1, "hello");
    }
}
