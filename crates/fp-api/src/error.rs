//! Error types shared by every host service.

use std::time::Duration;

use crate::id::{ActorId, MessageId, UserId};

/// Alias for `Result<T, HostError>`.
pub type HostResult<T> = Result<T, HostError>;

/// Errors a host service can return to module code.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The requested actor does not exist.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// The requested chat message does not exist.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// The requested user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The acting user lacks permission for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The backing store rejected or lost a write.
    #[error("storage failure: {0}")]
    Storage(String),

    /// The target user has no connected session.
    #[error("no active session for user {0}")]
    SessionOffline(UserId),

    /// The remote side went away before replying.
    #[error("remote channel closed before a reply arrived")]
    ChannelClosed,

    /// The remote call did not complete within its deadline.
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),

    /// No handler is registered for a remote method.
    #[error("no handler registered for remote method \"{0}\"")]
    UnknownMethod(String),

    /// The remote handler ran but reported a failure.
    #[error("remote handler failed: {0}")]
    Remote(String),

    /// No template is registered under the requested path.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// A template referenced a variable the context does not provide.
    #[error("template \"{template}\" is missing variable \"{variable}\"")]
    TemplateVar {
        /// The template path being rendered.
        template: String,
        /// The unresolved variable name.
        variable: String,
    },

    /// The setting was never registered.
    #[error("setting not registered: {namespace}.{key}")]
    SettingNotFound {
        /// The module namespace.
        namespace: String,
        /// The setting key.
        key: String,
    },

    /// A setting value did not match its registered kind.
    #[error("setting {namespace}.{key} rejected value: {message}")]
    SettingValue {
        /// The module namespace.
        namespace: String,
        /// The setting key.
        key: String,
        /// What was wrong with the value.
        message: String,
    },
}
