//! In-memory string catalog.

use std::collections::HashMap;
use std::sync::RwLock;

use fp_api::Localization;

use crate::relock;

/// String catalog; unknown keys localize to themselves so a missing
/// entry is visible instead of fatal.
#[derive(Default)]
pub struct SandboxI18n {
    entries: RwLock<HashMap<String, String>>,
}

impl SandboxI18n {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Localization for SandboxI18n {
    fn extend(&self, entries: Vec<(String, String)>) {
        relock(self.entries.write()).extend(entries);
    }

    fn localize(&self, key: &str) -> String {
        relock(self.entries.read())
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.localize(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}
