//! In-memory reference host for `fp-api` modules.
//!
//! The sandbox wires every host contract to deterministic in-memory
//! implementations: vector-backed document stores, scripted dialogs, a
//! seeded dice server, and a task-based remote channel between
//! connected sessions. Tests and the demo binary drive modules through
//! it the way a real host would: install, connect, then feed renders,
//! clicks, messages, and menu picks. Everything the host does lands in
//! an observable [`EventLog`].

/// Scripted dialog responders.
pub mod dialogs;
/// Seeded dice server.
pub mod dice;
/// The observable event log.
pub mod events;
/// In-memory string catalog.
pub mod i18n;
/// Captured toast notifications.
pub mod notify;
/// Sessions and the remote channel.
pub mod sessions;
/// Settings registry with kind checking.
pub mod settings;
/// Actor and chat document stores.
pub mod store;
/// `{{variable}}` template rendering.
pub mod templates;
/// User directory with connection tracking.
pub mod users;

/// Re-export dialog scripting.
pub use dialogs::DialogScript;
/// Re-export event types.
pub use events::{EventLog, NotifyLevel, SandboxEvent};

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fp_api::{
    Actor, ActorId, ActorStore, ChatLog, ChatMessage, HostContext, HostError, HostResult,
    MenuEntry, MessageDraft, MessageId, Module, OwnershipLevel, SheetCommand, SheetNode,
    SheetRender, User, UserId,
};

use dialogs::{SandboxDialogs, ScriptTable};
use dice::SandboxDice;
use i18n::SandboxI18n;
use notify::SandboxNotifier;
use sessions::{SandboxRemote, SessionRegistry};
use settings::SandboxSettings;
use store::{SandboxActors, SandboxChat};
use templates::SandboxTemplates;
use users::SandboxUsers;

/// Take a lock, recovering the guard if a panicking holder poisoned it.
pub(crate) fn relock<G>(result: Result<G, std::sync::PoisonError<G>>) -> G {
    result.unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Builder for a [`Sandbox`].
#[derive(Default)]
pub struct SandboxBuilder {
    seed: u64,
    users: Vec<User>,
    actors: Vec<Actor>,
    scripts: HashMap<UserId, DialogScript>,
}

impl SandboxBuilder {
    /// Seed for the dice server.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Add a user account.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Add a pre-world actor document. Creation hooks do not fire for
    /// actors seeded here; module `ready` passes pick them up.
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actors.push(actor);
        self
    }

    /// Assign a user's dialog script (default: dismiss everything).
    pub fn with_script(mut self, user: UserId, script: DialogScript) -> Self {
        self.scripts.insert(user, script);
        self
    }

    /// Assemble the sandbox.
    pub fn build(self) -> Sandbox {
        let events = Arc::new(EventLog::new());
        Sandbox {
            actors: Arc::new(SandboxActors::new(self.actors, Arc::clone(&events))),
            chat: Arc::new(SandboxChat::new(Arc::clone(&events))),
            users: Arc::new(SandboxUsers::new(self.users)),
            settings: Arc::new(SandboxSettings::new(Arc::clone(&events))),
            templates: Arc::new(SandboxTemplates::new()),
            i18n: Arc::new(SandboxI18n::new()),
            dice: Arc::new(SandboxDice::new(self.seed)),
            scripts: Arc::new(RwLock::new(self.scripts)),
            registry: Arc::new(SessionRegistry::default()),
            modules: RwLock::new(Vec::new()),
            events,
        }
    }
}

/// The assembled in-memory host.
pub struct Sandbox {
    actors: Arc<SandboxActors>,
    chat: Arc<SandboxChat>,
    users: Arc<SandboxUsers>,
    settings: Arc<SandboxSettings>,
    templates: Arc<SandboxTemplates>,
    i18n: Arc<SandboxI18n>,
    dice: Arc<SandboxDice>,
    events: Arc<EventLog>,
    scripts: ScriptTable,
    registry: Arc<SessionRegistry>,
    modules: RwLock<Vec<Arc<dyn Module>>>,
}

impl Sandbox {
    /// Start building a sandbox.
    pub fn builder() -> SandboxBuilder {
        SandboxBuilder::default()
    }

    /// Install a module. Install everything before connecting sessions
    /// so each session runs the full module lifecycle.
    pub fn install(&self, module: Arc<dyn Module>) {
        relock(self.modules.write()).push(module);
    }

    fn modules(&self) -> Vec<Arc<dyn Module>> {
        relock(self.modules.read()).clone()
    }

    /// Build the per-session service handle for a user.
    pub fn context(&self, user: UserId) -> HostResult<HostContext> {
        if !self.users.contains(user) {
            return Err(HostError::UserNotFound(user));
        }
        Ok(HostContext {
            user,
            actors: Arc::clone(&self.actors) as _,
            chat: Arc::clone(&self.chat) as _,
            users: Arc::clone(&self.users) as _,
            dialogs: Arc::new(SandboxDialogs::new(
                user,
                Arc::clone(&self.scripts),
                Arc::clone(&self.events),
            )),
            remote: Arc::new(SandboxRemote::new(
                user,
                Arc::clone(&self.registry),
                Arc::clone(&self.events),
            )),
            templates: Arc::clone(&self.templates) as _,
            settings: Arc::clone(&self.settings) as _,
            i18n: Arc::clone(&self.i18n) as _,
            notify: Arc::new(SandboxNotifier::new(user, Arc::clone(&self.events))),
            dice: Arc::clone(&self.dice) as _,
        })
    }

    /// Connect a user's session: marks the user active, then runs every
    /// installed module's `init` and `ready` with the session context.
    pub async fn connect(&self, user: UserId) -> HostResult<HostContext> {
        let ctx = self.context(user)?;
        self.registry.connect(user);
        self.users.set_active(user, true);
        tracing::info!(%user, "session connected");
        for module in self.modules() {
            module.init(&ctx).await;
            module.ready(&ctx).await;
        }
        Ok(ctx)
    }

    /// Disconnect a user's session. In-flight remote calls to it fail
    /// with a closed channel.
    pub fn disconnect(&self, user: UserId) {
        self.registry.disconnect(user);
        self.users.set_active(user, false);
        tracing::info!(%user, "session disconnected");
    }

    /// Whether a user currently has a connected session.
    pub fn is_connected(&self, user: UserId) -> bool {
        self.registry.is_connected(user)
    }

    /// Create an actor mid-session and fire creation hooks as `as_user`.
    pub async fn create_actor(&self, as_user: UserId, actor: Actor) -> HostResult<ActorId> {
        let ctx = self.context(as_user)?;
        let id = self.actors.insert(actor).await;
        for module in self.modules() {
            module.on_actor_created(&ctx, id).await;
        }
        Ok(id)
    }

    /// Render an actor's sheet for a viewer and run module render hooks.
    pub async fn render_sheet(
        &self,
        viewer: UserId,
        actor: ActorId,
        minimized: bool,
    ) -> HostResult<SheetRender> {
        let ctx = self.context(viewer)?;
        let doc = self.actors.get(actor).await?;
        let owner = doc.ownership_level(viewer) >= OwnershipLevel::Owner;
        let mut render = SheetRender {
            actor: Some(actor),
            viewer,
            owner,
            minimized,
            root: default_sheet(&doc),
        };
        for module in self.modules() {
            module.on_render_sheet(&ctx, &mut render).await;
        }
        Ok(render)
    }

    /// Dispatch an activated sheet command to the module that owns it.
    pub async fn activate(&self, viewer: UserId, command: &SheetCommand) -> HostResult<()> {
        let ctx = self.context(viewer)?;
        for module in self.modules() {
            if module.id() == command.module {
                module.on_sheet_command(&ctx, command).await;
            }
        }
        Ok(())
    }

    /// Context-menu entries modules currently show for a message.
    pub fn menu_entries_for(&self, message: &ChatMessage) -> Vec<MenuEntry> {
        self.modules()
            .iter()
            .flat_map(|m| {
                m.chat_menu_entries()
                    .into_iter()
                    .filter(|e| m.menu_entry_visible(&e.id, message))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Pick a module's context-menu entry on a message.
    pub async fn pick_menu_entry(
        &self,
        viewer: UserId,
        entry: &str,
        message: MessageId,
    ) -> HostResult<()> {
        let ctx = self.context(viewer)?;
        for module in self.modules() {
            if module.chat_menu_entries().iter().any(|e| e.id == entry) {
                module.on_menu_action(&ctx, entry, message).await;
            }
        }
        Ok(())
    }

    /// Post a chat message directly (host-side helper for demos and
    /// tests).
    pub async fn post_message(&self, draft: MessageDraft) -> HostResult<ChatMessage> {
        self.chat.create(draft).await
    }

    /// Current chat log, oldest first.
    pub async fn chat_log(&self) -> Vec<ChatMessage> {
        self.chat.list().await.unwrap_or_default()
    }

    /// Fetch an actor document.
    pub async fn actor(&self, id: ActorId) -> HostResult<Actor> {
        self.actors.get(id).await
    }

    /// Make the next actor flag write fail with a storage error.
    pub fn fail_next_actor_write(&self, reason: &str) {
        self.actors.fail_next_write(reason);
    }

    /// Snapshot of everything the host has done, oldest first.
    pub fn events(&self) -> Vec<SandboxEvent> {
        self.events.snapshot()
    }

    /// The shared event log handle.
    pub fn event_log(&self) -> Arc<EventLog> {
        Arc::clone(&self.events)
    }

    /// Notifications a user has received, oldest first.
    pub fn notifications_for(&self, user: UserId) -> Vec<(NotifyLevel, String)> {
        self.events.notifications_for(user)
    }
}

/// The host's stock character sheet scaffold.
fn default_sheet(actor: &Actor) -> SheetNode {
    SheetNode::new("form")
        .with_class("character-sheet")
        .with_child(
            SheetNode::new("header")
                .with_class("char-header")
                .with_text(actor.name.clone()),
        )
        .with_child(
            SheetNode::new("div")
                .with_class("char-details")
                .with_child(SheetNode::new("div").with_class("abilities"))
                .with_child(SheetNode::new("div").with_class("dots")),
        )
}
