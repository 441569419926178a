//! User records and roles.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// The role a user holds in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A regular player.
    Player,
    /// The gamemaster.
    Gamemaster,
}

/// A user account known to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Player or gamemaster.
    pub role: UserRole,
    /// Whether the user currently has a connected session.
    pub active: bool,
}

impl User {
    /// Create a new, not-yet-connected user.
    pub fn new(name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            role,
            active: false,
        }
    }

    /// Returns true for gamemaster accounts.
    pub fn is_gm(&self) -> bool {
        self.role == UserRole::Gamemaster
    }
}
