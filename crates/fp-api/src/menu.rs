//! Chat context-menu entries.

use serde::{Deserialize, Serialize};

/// An entry a module contributes to the chat message context menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Stable identifier the host passes back when the entry is picked.
    pub id: String,
    /// Localization key for the display label.
    pub label: String,
    /// Icon class, e.g. `"fas fa-users"`.
    pub icon: String,
}

impl MenuEntry {
    /// Create a menu entry.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
        }
    }
}
