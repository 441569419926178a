//! Actor documents, ownership levels, and flag access.
//!
//! Actors are the host's character records. Modules never store state of
//! their own; everything they persist lives in an actor's flag map under
//! a namespaced dotted key (`"my-module.some-key"`).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::{ActorId, UserId};

/// How much access a user has to an actor document, lowest to highest.
///
/// The variant order is meaningful: levels compare with `>=` when a
/// module checks for "owner or better".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipLevel {
    /// No access at all.
    None,
    /// May see the actor exists, nothing more.
    Limited,
    /// May view the sheet but not change it.
    Observer,
    /// Full control of the actor.
    Owner,
}

/// The kind of an actor document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A player character.
    Character,
    /// A GM-controlled non-player character.
    Npc,
    /// A host- or system-defined kind not covered above.
    Custom(String),
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::Npc => write!(f, "npc"),
            Self::Custom(s) => write!(f, "{s}"),
        }
    }
}

/// An actor document: a named record with module flags and per-user
/// ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Document kind; modules usually only touch [`ActorKind::Character`].
    pub kind: ActorKind,
    /// Module-namespaced persisted values, keyed `"namespace.key"`.
    pub flags: HashMap<String, Value>,
    /// Access level per user. Users absent from the map have
    /// [`OwnershipLevel::None`].
    pub ownership: HashMap<UserId, OwnershipLevel>,
}

impl Actor {
    /// Create a new actor with no flags and no ownership entries.
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            kind,
            flags: HashMap::new(),
            ownership: HashMap::new(),
        }
    }

    /// Grant a user an ownership level (builder style).
    pub fn with_owner(mut self, user: UserId, level: OwnershipLevel) -> Self {
        self.ownership.insert(user, level);
        self
    }

    /// Set a namespaced flag (builder style).
    pub fn with_flag(mut self, namespace: &str, key: &str, value: Value) -> Self {
        self.flags.insert(format!("{namespace}.{key}"), value);
        self
    }

    /// Read a namespaced flag, if present.
    pub fn flag(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.flags.get(&format!("{namespace}.{key}"))
    }

    /// The access level a user has on this actor.
    pub fn ownership_level(&self, user: UserId) -> OwnershipLevel {
        self.ownership
            .get(&user)
            .copied()
            .unwrap_or(OwnershipLevel::None)
    }

    /// Users holding at least the given access level.
    pub fn users_at_least(&self, level: OwnershipLevel) -> Vec<UserId> {
        self.ownership
            .iter()
            .filter(|(_, l)| **l >= level)
            .map(|(u, _)| *u)
            .collect()
    }
}
