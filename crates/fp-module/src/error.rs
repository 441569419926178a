//! Module-level error type.
//!
//! Host failures are wrapped rather than flattened so callers can still
//! distinguish "the store rejected the write" from "this message cannot
//! be rerolled".

use fp_api::{ActorId, HostError, MessageId};

/// Convenience alias for module operations.
pub type ModuleResult<T> = Result<T, ModuleError>;

/// Everything that can go wrong inside the Friend Points module.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The actor exists but carries no Friend Points resource.
    #[error("actor {0} has no Friend Points resource")]
    ResourceMissing(ActorId),

    /// The message carries no roll at all.
    #[error("message {0} has no roll to reroll")]
    NoRollData(MessageId),

    /// The message's roll has no die terms.
    #[error("message {0} has a roll without die terms")]
    NoDieTerms(MessageId),

    /// The die term has no recorded results.
    #[error("message {0} has a die term without results")]
    NoResults(MessageId),

    /// The die term has more than one result; only single-die rolls
    /// can be rerolled.
    #[error("message {0} has more than one die result")]
    MultipleResults(MessageId),

    /// The result was already discarded by an earlier reroll.
    #[error("message {0} was already rerolled")]
    AlreadyDiscarded(MessageId),

    /// Request payloads travel as JSON; this wraps a failed
    /// (de)serialization.
    #[error("request payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// A host service failed underneath the module.
    #[error(transparent)]
    Host(#[from] HostError),
}
