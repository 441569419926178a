//! In-memory user directory.

use std::sync::RwLock;

use fp_api::{User, UserDirectory, UserId};

use crate::relock;

/// User directory with connection tracking.
pub struct SandboxUsers {
    users: RwLock<Vec<User>>,
}

impl SandboxUsers {
    pub(crate) fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Mark a user as connected or disconnected.
    pub(crate) fn set_active(&self, id: UserId, active: bool) {
        if let Some(user) = relock(self.users.write()).iter_mut().find(|u| u.id == id) {
            user.active = active;
        }
    }

    pub(crate) fn contains(&self, id: UserId) -> bool {
        relock(self.users.read()).iter().any(|u| u.id == id)
    }
}

impl UserDirectory for SandboxUsers {
    fn get(&self, id: UserId) -> Option<User> {
        relock(self.users.read()).iter().find(|u| u.id == id).cloned()
    }

    fn list(&self) -> Vec<User> {
        relock(self.users.read()).clone()
    }

    fn active_users(&self) -> Vec<User> {
        relock(self.users.read())
            .iter()
            .filter(|u| u.active)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_api::UserRole;

    #[test]
    fn active_users_tracks_connection_state() {
        let alice = User::new("Alice", UserRole::Player);
        let bren = User::new("Bren", UserRole::Player);
        let alice_id = alice.id;
        let dir = SandboxUsers::new(vec![alice, bren]);

        assert!(dir.active_users().is_empty());
        dir.set_active(alice_id, true);
        let active = dir.active_users();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, alice_id);

        dir.set_active(alice_id, false);
        assert!(dir.active_users().is_empty());
    }

    #[test]
    fn get_unknown_user_is_none() {
        let dir = SandboxUsers::new(Vec::new());
        assert!(dir.get(UserId::new()).is_none());
    }
}
