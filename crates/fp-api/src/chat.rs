//! Chat messages, drafts, and speakers.
//!
//! Chat messages are immutable once created. A module that wants to
//! change a posted roll composes a replacement [`MessageDraft`], creates
//! it, and deletes the original.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::{ActorId, MessageId, UserId};
use crate::roll::Roll;

/// Who a chat message speaks as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// The actor speaking, if any.
    pub actor: Option<ActorId>,
    /// Display alias shown in the log.
    pub alias: Option<String>,
}

impl Speaker {
    /// Speak as an actor under a display alias.
    pub fn for_actor(actor: ActorId, alias: impl Into<String>) -> Self {
        Self {
            actor: Some(actor),
            alias: Some(alias.into()),
        }
    }
}

/// A chat message as stored in the host's log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier.
    pub id: MessageId,
    /// The user who posted the message.
    pub author: UserId,
    /// Who the message speaks as.
    pub speaker: Speaker,
    /// Rendered message body (markup).
    pub content: String,
    /// Optional flavor line shown above the body.
    pub flavor: Option<String>,
    /// Dice rolls attached to the message, in posting order.
    pub rolls: Vec<Roll>,
    /// Module-namespaced flags, keyed `"namespace.key"`.
    pub flags: HashMap<String, Value>,
    /// Creation time assigned by the host.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// The first attached roll, if the message has roll data.
    pub fn first_roll(&self) -> Option<&Roll> {
        self.rolls.first()
    }

    /// Read a namespaced flag, if present.
    pub fn flag(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.flags.get(&format!("{namespace}.{key}"))
    }
}

/// A message waiting to be created; the host assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDraft {
    /// The posting user.
    pub author: UserId,
    /// Who the message speaks as.
    pub speaker: Speaker,
    /// Rendered message body (markup).
    pub content: String,
    /// Optional flavor line.
    pub flavor: Option<String>,
    /// Attached rolls.
    pub rolls: Vec<Roll>,
    /// Module-namespaced flags, keyed `"namespace.key"`.
    pub flags: HashMap<String, Value>,
}

impl MessageDraft {
    /// Start an empty draft for an author.
    pub fn new(author: UserId) -> Self {
        Self {
            author,
            speaker: Speaker::default(),
            content: String::new(),
            flavor: None,
            rolls: Vec::new(),
            flags: HashMap::new(),
        }
    }

    /// Set the speaker (builder style).
    pub fn with_speaker(mut self, speaker: Speaker) -> Self {
        self.speaker = speaker;
        self
    }

    /// Set the body content (builder style).
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the flavor line (builder style).
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = Some(flavor.into());
        self
    }

    /// Attach a roll (builder style).
    pub fn with_roll(mut self, roll: Roll) -> Self {
        self.rolls.push(roll);
        self
    }

    /// Set a namespaced flag (builder style).
    pub fn with_flag(mut self, namespace: &str, key: &str, value: Value) -> Self {
        self.flags.insert(format!("{namespace}.{key}"), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::Die;

    #[test]
    fn draft_builder_collects_fields() {
        let author = UserId::new();
        let draft = MessageDraft::new(author)
            .with_content("<p>hello</p>")
            .with_flavor("Perception check")
            .with_roll(Roll::single(Die::D20, 14, 3))
            .with_flag("friend-points", "rerolled-from", Value::Null);

        assert_eq!(draft.author, author);
        assert_eq!(draft.rolls.len(), 1);
        assert_eq!(draft.flavor.as_deref(), Some("Perception check"));
        assert!(draft.flags.contains_key("friend-points.rerolled-from"));
    }
}
