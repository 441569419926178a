//! The trait a module implements to hook into the host.

use async_trait::async_trait;

use crate::chat::ChatMessage;
use crate::id::{ActorId, MessageId};
use crate::menu::MenuEntry;
use crate::services::HostContext;
use crate::sheet::{SheetCommand, SheetRender};

/// A host-platform module.
///
/// Hook methods do not return errors: a module is expected to absorb
/// its own failures, report them through [`crate::Notifier`], and leave
/// the host running. Every hook has a no-op default so modules only
/// implement what they use.
#[async_trait]
pub trait Module: Send + Sync {
    /// Stable module identifier, also the flag and settings namespace.
    fn id(&self) -> &'static str;

    /// Called once per session at startup, before any other hook.
    /// Registrations (settings, templates, strings, remote methods)
    /// happen here.
    async fn init(&self, ctx: &HostContext);

    /// Called once per session after the world is fully loaded.
    async fn ready(&self, _ctx: &HostContext) {}

    /// Called when a new actor document has been created.
    async fn on_actor_created(&self, _ctx: &HostContext, _actor: ActorId) {}

    /// Called while an actor sheet renders; the module may splice nodes
    /// into `render.root`.
    async fn on_render_sheet(&self, _ctx: &HostContext, _render: &mut SheetRender) {}

    /// Entries this module contributes to the chat context menu.
    fn chat_menu_entries(&self) -> Vec<MenuEntry> {
        Vec::new()
    }

    /// Whether a contributed entry should be shown for a message.
    fn menu_entry_visible(&self, _entry: &str, _message: &ChatMessage) -> bool {
        false
    }

    /// Called when the user picks one of this module's menu entries.
    async fn on_menu_action(&self, _ctx: &HostContext, _entry: &str, _message: MessageId) {}

    /// Called when a sheet command bound by this module is activated.
    async fn on_sheet_command(&self, _ctx: &HostContext, _command: &SheetCommand) {}
}
