//! Contracts between a virtual-tabletop host platform and its modules.
//!
//! This crate defines the documents a host owns (actors, users, chat
//! messages with dice rolls), the services it exposes to module code
//! (storage, dialogs, a per-user remote channel, templates, settings,
//! localization), and the [`Module`] trait a plugin implements. It is
//! independent of any concrete host; `fp-sandbox` provides an in-memory
//! one for tests and demos.

/// Actor documents, ownership levels, and flag access.
pub mod actor;
/// Chat messages, drafts, and speakers.
pub mod chat;
/// Error types shared by every host service.
pub mod error;
/// Identifier newtypes for documents and users.
pub mod id;
/// Chat context-menu entries.
pub mod menu;
/// The trait a module implements to hook into the host.
pub mod module;
/// Dice denominations, terms, and roll records.
pub mod roll;
/// Host service contracts and the per-session context handle.
pub mod services;
/// The character-sheet widget tree and its command bindings.
pub mod sheet;
/// User records and roles.
pub mod user;

/// Re-export actor types.
pub use actor::{Actor, ActorKind, OwnershipLevel};
/// Re-export chat types.
pub use chat::{ChatMessage, MessageDraft, Speaker};
/// Re-export error types.
pub use error::{HostError, HostResult};
/// Re-export identifier newtypes.
pub use id::{ActorId, MessageId, UserId};
/// Re-export menu types.
pub use menu::MenuEntry;
/// Re-export the module trait.
pub use module::Module;
/// Re-export roll types.
pub use roll::{Die, DieResult, DieTerm, Roll};
/// Re-export service contracts.
pub use services::{
    ActorStore, ChatLog, DialogPrompt, DialogService, DiceRoller, HostContext, Localization,
    Notifier, PromptAnswer, RemoteChannel, RemoteFuture, RemoteHandler, SettingKind, SettingScope,
    SettingSpec, SettingsRegistry, TemplateService, UserDirectory,
};
/// Re-export sheet types.
pub use sheet::{SheetCommand, SheetNode, SheetRender};
/// Re-export user types.
pub use user::{User, UserRole};
