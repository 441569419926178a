//! In-memory actor and chat document stores.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use fp_api::{
    Actor, ActorId, ActorStore, ChatLog, ChatMessage, HostError, HostResult, MessageDraft,
    MessageId,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::events::{EventLog, SandboxEvent};
use crate::relock;

/// Actor store backed by a plain vector.
///
/// Insertion order is preserved so listings and eligibility scans are
/// deterministic across runs.
pub struct SandboxActors {
    actors: RwLock<Vec<Actor>>,
    fail_next: Mutex<Option<String>>,
    events: Arc<EventLog>,
}

impl SandboxActors {
    pub(crate) fn new(actors: Vec<Actor>, events: Arc<EventLog>) -> Self {
        Self {
            actors: RwLock::new(actors),
            fail_next: Mutex::new(None),
            events,
        }
    }

    /// Make the next `set_flag` fail with a storage error.
    pub fn fail_next_write(&self, reason: impl Into<String>) {
        *relock(self.fail_next.lock()) = Some(reason.into());
    }

    pub(crate) async fn insert(&self, actor: Actor) -> ActorId {
        let id = actor.id;
        self.actors.write().await.push(actor);
        id
    }
}

#[async_trait]
impl ActorStore for SandboxActors {
    async fn get(&self, id: ActorId) -> HostResult<Actor> {
        self.actors
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(HostError::ActorNotFound(id))
    }

    async fn list(&self) -> HostResult<Vec<Actor>> {
        Ok(self.actors.read().await.clone())
    }

    async fn set_flag(
        &self,
        id: ActorId,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> HostResult<()> {
        if let Some(reason) = relock(self.fail_next.lock()).take() {
            return Err(HostError::Storage(reason));
        }
        let mut actors = self.actors.write().await;
        let actor = actors
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(HostError::ActorNotFound(id))?;
        actor
            .flags
            .insert(format!("{namespace}.{key}"), value.clone());
        tracing::debug!(actor = %id, namespace, key, "flag written");
        self.events.push(SandboxEvent::FlagWritten {
            actor: id,
            namespace: namespace.to_string(),
            key: key.to_string(),
            value,
        });
        Ok(())
    }
}

/// Chat log backed by a plain vector, oldest message first.
pub struct SandboxChat {
    messages: RwLock<Vec<ChatMessage>>,
    events: Arc<EventLog>,
}

impl SandboxChat {
    pub(crate) fn new(events: Arc<EventLog>) -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            events,
        }
    }
}

#[async_trait]
impl ChatLog for SandboxChat {
    async fn get(&self, id: MessageId) -> HostResult<ChatMessage> {
        self.messages
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(HostError::MessageNotFound(id))
    }

    async fn list(&self) -> HostResult<Vec<ChatMessage>> {
        Ok(self.messages.read().await.clone())
    }

    async fn create(&self, draft: MessageDraft) -> HostResult<ChatMessage> {
        let message = ChatMessage {
            id: MessageId::new(),
            author: draft.author,
            speaker: draft.speaker,
            content: draft.content,
            flavor: draft.flavor,
            rolls: draft.rolls,
            flags: draft.flags,
            created_at: Utc::now(),
        };
        tracing::debug!(message = %message.id, author = %message.author, "message created");
        self.events.push(SandboxEvent::MessageCreated {
            message: message.id,
            author: message.author,
        });
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn delete(&self, id: MessageId) -> HostResult<()> {
        let mut messages = self.messages.write().await;
        let index = messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(HostError::MessageNotFound(id))?;
        messages.remove(index);
        tracing::debug!(message = %id, "message deleted");
        self.events.push(SandboxEvent::MessageDeleted { message: id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_api::{ActorKind, UserId};
    use serde_json::json;

    fn actors_with(actor: Actor) -> SandboxActors {
        SandboxActors::new(vec![actor], Arc::new(EventLog::new()))
    }

    #[tokio::test]
    async fn get_missing_actor_fails() {
        let store = SandboxActors::new(Vec::new(), Arc::new(EventLog::new()));
        let err = store.get(ActorId::new()).await.unwrap_err();
        assert!(matches!(err, HostError::ActorNotFound(_)));
    }

    #[tokio::test]
    async fn set_flag_persists_and_records() {
        let actor = Actor::new("Kael", ActorKind::Character);
        let id = actor.id;
        let events = Arc::new(EventLog::new());
        let store = SandboxActors::new(vec![actor], Arc::clone(&events));

        store
            .set_flag(id, "friend-points", "points", json!({"value": 2, "max": 3}))
            .await
            .unwrap();

        let reread = store.get(id).await.unwrap();
        assert_eq!(
            reread.flag("friend-points", "points"),
            Some(&json!({"value": 2, "max": 3}))
        );
        assert!(
            events
                .position(|e| matches!(e, SandboxEvent::FlagWritten { .. }))
                .is_some()
        );
    }

    #[tokio::test]
    async fn fail_next_write_fails_exactly_once() {
        let actor = Actor::new("Kael", ActorKind::Character);
        let id = actor.id;
        let store = actors_with(actor);

        store.fail_next_write("disk on fire");
        let err = store
            .set_flag(id, "friend-points", "points", json!(1))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Storage(_)));

        store
            .set_flag(id, "friend-points", "points", json!(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn chat_create_then_delete_records_in_order() {
        let events = Arc::new(EventLog::new());
        let chat = SandboxChat::new(Arc::clone(&events));

        let created = chat
            .create(MessageDraft::new(UserId::new()).with_content("hello"))
            .await
            .unwrap();
        chat.delete(created.id).await.unwrap();
        assert!(chat.list().await.unwrap().is_empty());

        let create_pos = events
            .position(|e| matches!(e, SandboxEvent::MessageCreated { .. }))
            .unwrap();
        let delete_pos = events
            .position(|e| matches!(e, SandboxEvent::MessageDeleted { .. }))
            .unwrap();
        assert!(create_pos < delete_pos);
    }

    #[tokio::test]
    async fn delete_missing_message_fails() {
        let chat = SandboxChat::new(Arc::new(EventLog::new()));
        let err = chat.delete(MessageId::new()).await.unwrap_err();
        assert!(matches!(err, HostError::MessageNotFound(_)));
    }
}
