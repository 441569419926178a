//! Connected sessions and the session-to-session remote channel.
//!
//! Each connected user owns a session entry holding its registered
//! remote-method handlers. An `invoke` runs the target's handler on a
//! spawned task and awaits the reply through a oneshot channel, so a
//! caller observes exactly one of: a reply, a timeout, or a closed
//! channel when the target session goes away mid-call.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use fp_api::{HostError, HostResult, RemoteChannel, RemoteHandler, UserId};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::events::{EventLog, SandboxEvent};
use crate::relock;

#[derive(Default)]
struct SessionEntry {
    handlers: HashMap<String, RemoteHandler>,
    calls: Vec<JoinHandle<()>>,
}

/// Registry of connected sessions.
#[derive(Default)]
pub(crate) struct SessionRegistry {
    sessions: RwLock<HashMap<UserId, SessionEntry>>,
}

impl SessionRegistry {
    pub(crate) fn connect(&self, user: UserId) {
        relock(self.sessions.write()).entry(user).or_default();
    }

    pub(crate) fn disconnect(&self, user: UserId) {
        if let Some(entry) = relock(self.sessions.write()).remove(&user) {
            for call in entry.calls {
                call.abort();
            }
        }
    }

    pub(crate) fn is_connected(&self, user: UserId) -> bool {
        relock(self.sessions.read()).contains_key(&user)
    }

    fn register(&self, user: UserId, method: &str, handler: RemoteHandler) {
        relock(self.sessions.write())
            .entry(user)
            .or_default()
            .handlers
            .insert(method.to_string(), handler);
    }

    fn handler(&self, user: UserId, method: &str) -> HostResult<RemoteHandler> {
        let sessions = relock(self.sessions.read());
        let entry = sessions
            .get(&user)
            .ok_or(HostError::SessionOffline(user))?;
        entry
            .handlers
            .get(method)
            .cloned()
            .ok_or_else(|| HostError::UnknownMethod(method.to_string()))
    }

    fn track(&self, user: UserId, call: JoinHandle<()>) {
        if let Some(entry) = relock(self.sessions.write()).get_mut(&user) {
            entry.calls.push(call);
        } else {
            // Target disconnected between dispatch and tracking.
            call.abort();
        }
    }
}

/// Remote channel view for one session.
pub struct SandboxRemote {
    user: UserId,
    registry: Arc<SessionRegistry>,
    events: Arc<EventLog>,
}

impl SandboxRemote {
    pub(crate) fn new(user: UserId, registry: Arc<SessionRegistry>, events: Arc<EventLog>) -> Self {
        Self {
            user,
            registry,
            events,
        }
    }
}

#[async_trait]
impl RemoteChannel for SandboxRemote {
    fn register(&self, method: &str, handler: RemoteHandler) {
        tracing::debug!(user = %self.user, method, "remote handler registered");
        self.registry.register(self.user, method, handler);
    }

    async fn invoke(
        &self,
        target: UserId,
        method: &str,
        payload: Value,
        timeout: Duration,
    ) -> HostResult<Value> {
        let handler = self.registry.handler(target, method)?;
        tracing::debug!(from = %self.user, to = %target, method, "remote call");
        self.events.push(SandboxEvent::RemoteInvoked {
            from: self.user,
            to: target,
            method: method.to_string(),
        });

        let (tx, rx) = oneshot::channel();
        let call = tokio::spawn(async move {
            let _ = tx.send(handler(payload).await);
        });
        self.registry.track(target, call);

        match tokio::time::timeout(timeout, rx).await {
            Err(_) => Err(HostError::Timeout(timeout)),
            Ok(Err(_)) => Err(HostError::ChannelClosed),
            Ok(Ok(reply)) => reply.map_err(|e| HostError::Remote(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_api::RemoteFuture;
    use serde_json::json;

    fn remote_for(user: UserId, registry: &Arc<SessionRegistry>) -> SandboxRemote {
        SandboxRemote::new(user, Arc::clone(registry), Arc::new(EventLog::new()))
    }

    fn echo_handler() -> RemoteHandler {
        Arc::new(|payload: Value| -> RemoteFuture {
            Box::pin(async move { Ok(json!({ "echo": payload })) })
        })
    }

    fn silent_handler() -> RemoteHandler {
        Arc::new(|_payload: Value| -> RemoteFuture {
            Box::pin(std::future::pending::<HostResult<Value>>())
        })
    }

    #[tokio::test]
    async fn invoke_offline_target_fails() {
        let registry = Arc::new(SessionRegistry::default());
        let caller = remote_for(UserId::new(), &registry);
        let err = caller
            .invoke(UserId::new(), "m", json!(null), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::SessionOffline(_)));
    }

    #[tokio::test]
    async fn invoke_unknown_method_fails() {
        let registry = Arc::new(SessionRegistry::default());
        let target = UserId::new();
        registry.connect(target);
        let caller = remote_for(UserId::new(), &registry);
        let err = caller
            .invoke(target, "nope", json!(null), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::UnknownMethod(_)));
    }

    #[tokio::test]
    async fn invoke_round_trips_through_handler() {
        let registry = Arc::new(SessionRegistry::default());
        let target = UserId::new();
        registry.connect(target);
        remote_for(target, &registry).register("echo", echo_handler());

        let caller = remote_for(UserId::new(), &registry);
        let reply = caller
            .invoke(target, "echo", json!(7), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(reply, json!({ "echo": 7 }));
    }

    #[tokio::test(start_paused = true)]
    async fn invoke_times_out_when_handler_never_replies() {
        let registry = Arc::new(SessionRegistry::default());
        let target = UserId::new();
        registry.connect(target);
        remote_for(target, &registry).register("stall", silent_handler());

        let caller = remote_for(UserId::new(), &registry);
        let err = caller
            .invoke(target, "stall", json!(null), Duration::from_secs(30))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Timeout(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_mid_call_closes_the_channel() {
        let registry = Arc::new(SessionRegistry::default());
        let target = UserId::new();
        registry.connect(target);
        remote_for(target, &registry).register("stall", silent_handler());

        let caller = remote_for(UserId::new(), &registry);
        let call = tokio::spawn(async move {
            caller
                .invoke(target, "stall", json!(null), Duration::from_secs(3600))
                .await
        });
        // Let the call reach its await before pulling the session.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        registry.disconnect(target);

        let err = call.await.unwrap().unwrap_err();
        assert!(matches!(err, HostError::ChannelClosed));
    }

    #[tokio::test]
    async fn handler_errors_surface_as_remote_failures() {
        let registry = Arc::new(SessionRegistry::default());
        let target = UserId::new();
        registry.connect(target);
        let failing: RemoteHandler = Arc::new(|_| -> RemoteFuture {
            Box::pin(async { Err(HostError::PermissionDenied("no".into())) })
        });
        remote_for(target, &registry).register("fail", failing);

        let caller = remote_for(UserId::new(), &registry);
        let err = caller
            .invoke(target, "fail", json!(null), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Remote(_)));
    }
}
