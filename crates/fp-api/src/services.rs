//! Host service contracts and the per-session context handle.
//!
//! Each connected session gets a [`HostContext`] bundling the services a
//! module may call. Document stores, chat, dialogs, the remote channel,
//! and template rendering are async (they suspend on I/O or on another
//! user's answer); user lookups, settings, localization, notifications,
//! and dice are plain synchronous reads against session state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actor::Actor;
use crate::chat::{ChatMessage, MessageDraft};
use crate::error::HostResult;
use crate::id::{ActorId, MessageId, UserId};
use crate::roll::Die;
use crate::user::User;

/// Access to actor documents.
#[async_trait]
pub trait ActorStore: Send + Sync {
    /// Fetch one actor by id.
    async fn get(&self, id: ActorId) -> HostResult<Actor>;

    /// Snapshot of every actor in the world.
    async fn list(&self) -> HostResult<Vec<Actor>>;

    /// Persist a namespaced flag on an actor.
    async fn set_flag(
        &self,
        id: ActorId,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> HostResult<()>;
}

/// Access to the chat message log.
#[async_trait]
pub trait ChatLog: Send + Sync {
    /// Fetch one message by id.
    async fn get(&self, id: MessageId) -> HostResult<ChatMessage>;

    /// Snapshot of the log, oldest first.
    async fn list(&self) -> HostResult<Vec<ChatMessage>>;

    /// Create a message from a draft; the host assigns id and timestamp.
    async fn create(&self, draft: MessageDraft) -> HostResult<ChatMessage>;

    /// Delete a message.
    async fn delete(&self, id: MessageId) -> HostResult<()>;
}

/// Read-only view of the user list.
pub trait UserDirectory: Send + Sync {
    /// Fetch one user by id.
    fn get(&self, id: UserId) -> Option<User>;

    /// Every known user.
    fn list(&self) -> Vec<User>;

    /// Users with a currently connected session.
    fn active_users(&self) -> Vec<User>;
}

/// How the viewer answered a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptAnswer {
    /// The viewer picked the confirming option.
    Accepted,
    /// The viewer picked the declining option.
    Declined,
    /// The viewer closed the prompt without answering.
    Dismissed,
}

/// A yes/no prompt shown to the session's user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogPrompt {
    /// Window title.
    pub title: String,
    /// Prompt body (markup).
    pub body: String,
    /// Label on the confirming button.
    pub yes_label: String,
    /// Label on the declining button.
    pub no_label: String,
}

impl DialogPrompt {
    /// Create a prompt with default Yes/No button labels.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            yes_label: "Yes".into(),
            no_label: "No".into(),
        }
    }

    /// Override the button labels (builder style).
    pub fn with_labels(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
        self.yes_label = yes.into();
        self.no_label = no.into();
        self
    }
}

/// Modal dialogs presented to this session's user.
///
/// Dismissal is an answer, not an error; these calls only fail when the
/// session itself is going away.
#[async_trait]
pub trait DialogService: Send + Sync {
    /// Show a yes/no prompt and wait for the answer.
    async fn confirm(&self, prompt: &DialogPrompt) -> HostResult<PromptAnswer>;

    /// Show a pick-one list; `None` means the dialog was dismissed.
    async fn choose(&self, title: &str, options: &[String]) -> HostResult<Option<usize>>;

    /// Show an informational notice and wait for it to be closed.
    async fn inform(&self, title: &str, body: &str) -> HostResult<()>;
}

/// Future returned by a remote-method handler.
pub type RemoteFuture = Pin<Box<dyn Future<Output = HostResult<Value>> + Send>>;

/// Handler invoked when a registered remote method is called on this
/// session.
pub type RemoteHandler = Arc<dyn Fn(Value) -> RemoteFuture + Send + Sync>;

/// Point-to-point request/response channel between user sessions.
#[async_trait]
pub trait RemoteChannel: Send + Sync {
    /// Register a handler for a method name on this session.
    fn register(&self, method: &str, handler: RemoteHandler);

    /// Call a method on another user's session and await its reply.
    ///
    /// Fails with [`crate::HostError::SessionOffline`] when the target
    /// has no connected session and [`crate::HostError::Timeout`] when
    /// no reply arrives within the deadline.
    async fn invoke(
        &self,
        target: UserId,
        method: &str,
        payload: Value,
        timeout: Duration,
    ) -> HostResult<Value>;
}

/// Named-template registration and rendering.
#[async_trait]
pub trait TemplateService: Send + Sync {
    /// Register a template source under a path.
    fn register(&self, path: &str, source: &str);

    /// Render a registered template against a JSON context.
    async fn render(&self, path: &str, context: &Value) -> HostResult<String>;
}

/// Where a setting's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingScope {
    /// One value shared by the whole world; only the GM may change it.
    World,
    /// Per-client value.
    Client,
}

/// The value kind a setting accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    /// A whole number.
    Integer,
    /// True or false.
    Boolean,
    /// Free text.
    Text,
}

/// Registration record for one module setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingSpec {
    /// The registering module's namespace.
    pub namespace: String,
    /// Setting key within the namespace.
    pub key: String,
    /// Localization key for the display label.
    pub name: String,
    /// Localization key for the hint text.
    pub hint: String,
    /// World or client scope.
    pub scope: SettingScope,
    /// Accepted value kind.
    pub kind: SettingKind,
    /// Value used until the setting is first changed.
    pub default: Value,
}

impl SettingSpec {
    /// Create a spec with empty label and hint keys.
    pub fn new(
        namespace: impl Into<String>,
        key: impl Into<String>,
        scope: SettingScope,
        kind: SettingKind,
        default: Value,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            name: String::new(),
            hint: String::new(),
            scope,
            kind,
            default,
        }
    }

    /// Set the label localization key (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the hint localization key (builder style).
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }
}

/// Typed key/value settings registered by modules.
pub trait SettingsRegistry: Send + Sync {
    /// Register a setting; later reads fall back to its default.
    fn register(&self, spec: SettingSpec);

    /// Read a setting's current value.
    fn get(&self, namespace: &str, key: &str) -> HostResult<Value>;

    /// Change a setting's value.
    fn set(&self, namespace: &str, key: &str, value: Value) -> HostResult<()>;
}

/// String catalog with `{placeholder}` formatting.
pub trait Localization: Send + Sync {
    /// Add entries to the catalog; later entries win on key collisions.
    fn extend(&self, entries: Vec<(String, String)>);

    /// Look up a key; unknown keys return the key itself.
    fn localize(&self, key: &str) -> String;

    /// Look up a key and substitute `{name}` placeholders.
    fn format(&self, key: &str, args: &[(&str, &str)]) -> String;
}

/// Fire-and-forget toast notifications shown to this session's user.
pub trait Notifier: Send + Sync {
    /// Informational toast.
    fn info(&self, text: &str);

    /// Warning toast.
    fn warn(&self, text: &str);

    /// Error toast.
    fn error(&self, text: &str);
}

/// The host's dice server.
pub trait DiceRoller: Send + Sync {
    /// Roll one die and return its face value (1 through `die.sides()`).
    fn roll(&self, die: Die) -> u32;
}

/// Handle to every host service one session's module code can reach.
///
/// Cheap to clone; clones share the underlying services.
#[derive(Clone)]
pub struct HostContext {
    /// The user this session belongs to.
    pub user: UserId,
    /// Actor document store.
    pub actors: Arc<dyn ActorStore>,
    /// Chat message log.
    pub chat: Arc<dyn ChatLog>,
    /// User directory.
    pub users: Arc<dyn UserDirectory>,
    /// Modal dialogs for this session's user.
    pub dialogs: Arc<dyn DialogService>,
    /// Session-to-session remote channel.
    pub remote: Arc<dyn RemoteChannel>,
    /// Template registry and renderer.
    pub templates: Arc<dyn TemplateService>,
    /// Module settings registry.
    pub settings: Arc<dyn SettingsRegistry>,
    /// Localized string catalog.
    pub i18n: Arc<dyn Localization>,
    /// Toast notifications for this session's user.
    pub notify: Arc<dyn Notifier>,
    /// Dice server.
    pub dice: Arc<dyn DiceRoller>,
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl HostContext {
    /// The user record for this session, if still known to the host.
    pub fn current_user(&self) -> Option<User> {
        self.users.get(self.user)
    }
}
