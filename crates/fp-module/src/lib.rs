//! Friend Points: a shared-resource module for virtual tabletop hosts.
//!
//! Every player character carries a small pool of Friend Points. Owners
//! track them as clickable pips on the character sheet; any player may
//! ask another, over the host's session channel, to spend one so a die
//! they just posted to chat gets rerolled. The module is host-agnostic
//! and reaches the world only through the contracts in [`fp_api`].

/// Module-level error type.
pub mod error;
/// The cross-session reroll request flow.
pub mod flow;
/// Bundled localization strings.
pub mod lang;
/// Reroll preconditions and the replace operation.
pub mod reroll;
/// The points counter and its typed store.
pub mod resource;
/// World settings.
pub mod settings;
/// Sheet pips and click handling.
pub mod sheet;

/// Re-export the error type and alias.
pub use error::{ModuleError, ModuleResult};
/// Re-export the flow's public types.
pub use flow::{EligibleTarget, RequestOutcome, RerollRequest};
/// Re-export the resource and its store.
pub use resource::{FriendPoints, FriendPointsStore};

use async_trait::async_trait;
use fp_api::{
    ActorId, ChatMessage, HostContext, MenuEntry, MessageId, Module, SheetCommand, SheetRender,
};

/// Stable module identifier; namespaces flags, settings, and templates.
pub const MODULE_ID: &str = "friend-points";

/// Id of the chat context-menu entry that starts a reroll request.
pub const MENU_REQUEST_REROLL: &str = "friend-points.request-reroll";

/// Icon shown next to the context-menu entry.
const MENU_ICON: &str = "fas fa-users";

/// Report a failed operation: log it and toast the session's user.
pub(crate) fn report(ctx: &HostContext, err: &ModuleError) {
    tracing::warn!(%err, "Friend Points operation failed");
    let text = err.to_string();
    ctx.notify.error(
        &ctx.i18n
            .format("FRIENDPOINTS.OperationFailed", &[("error", text.as_str())]),
    );
}

/// The Friend Points module. Stateless: everything it persists lives on
/// host documents, so any number of sessions can run it concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct FriendPointsModule;

impl FriendPointsModule {
    /// Create the module.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for FriendPointsModule {
    fn id(&self) -> &'static str {
        MODULE_ID
    }

    async fn init(&self, ctx: &HostContext) {
        settings::register(ctx.settings.as_ref());
        ctx.templates
            .register(reroll::TEMPLATE_PATH, reroll::TEMPLATE_SOURCE);
        ctx.i18n.extend(lang::english());
        ctx.remote
            .register(flow::REMOTE_METHOD, flow::remote_handler(ctx));
        tracing::info!(module = MODULE_ID, user = %ctx.user, "module initialized");
    }

    async fn ready(&self, ctx: &HostContext) {
        // Every session sweeps. ensure() skips characters that already
        // have a resource, so whichever client connects first seeds and
        // the rest find nothing to do.
        let store = FriendPointsStore::new(ctx);
        match store.ensure_all().await {
            Ok(0) => {}
            Ok(created) => tracing::info!(created, "Friend Points resources seeded"),
            Err(err) => report(ctx, &err),
        }
    }

    async fn on_actor_created(&self, ctx: &HostContext, actor: ActorId) {
        let store = FriendPointsStore::new(ctx);
        let seeded = match ctx.actors.get(actor).await {
            Ok(doc) => store.ensure(&doc).await,
            Err(err) => Err(err.into()),
        };
        if let Err(err) = seeded {
            report(ctx, &err);
        }
    }

    async fn on_render_sheet(&self, ctx: &HostContext, render: &mut SheetRender) {
        sheet::render(ctx, render).await;
    }

    fn chat_menu_entries(&self) -> Vec<MenuEntry> {
        vec![MenuEntry::new(
            MENU_REQUEST_REROLL,
            "FRIENDPOINTS.MenuRequestReroll",
            MENU_ICON,
        )]
    }

    fn menu_entry_visible(&self, entry: &str, message: &ChatMessage) -> bool {
        entry == MENU_REQUEST_REROLL
            && !message.rolls.is_empty()
            && message.flag(MODULE_ID, reroll::REROLLED_FROM_FLAG).is_none()
    }

    async fn on_menu_action(&self, ctx: &HostContext, entry: &str, message: MessageId) {
        if entry != MENU_REQUEST_REROLL {
            return;
        }
        match flow::request_reroll(ctx, message).await {
            Ok(outcome) => {
                tracing::info!(?outcome, message = %message, "reroll request finished");
            }
            Err(err) => report(ctx, &err),
        }
    }

    async fn on_sheet_command(&self, ctx: &HostContext, command: &SheetCommand) {
        if command.module != MODULE_ID {
            return;
        }
        sheet::handle_command(ctx, command).await;
    }
}
