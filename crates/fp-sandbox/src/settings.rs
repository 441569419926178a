//! In-memory settings registry with kind checking.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fp_api::{HostError, HostResult, SettingKind, SettingSpec, SettingsRegistry};
use serde_json::Value;

use crate::events::{EventLog, SandboxEvent};
use crate::relock;

type Key = (String, String);

/// Settings registry; unset values fall back to the registered default.
///
/// Registration is idempotent so that every connecting session may run
/// the same module `init`.
pub struct SandboxSettings {
    specs: RwLock<HashMap<Key, SettingSpec>>,
    values: RwLock<HashMap<Key, Value>>,
    events: Arc<EventLog>,
}

impl SandboxSettings {
    pub(crate) fn new(events: Arc<EventLog>) -> Self {
        Self {
            specs: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
            events,
        }
    }
}

fn kind_accepts(kind: SettingKind, value: &Value) -> bool {
    match kind {
        SettingKind::Integer => value.as_i64().is_some(),
        SettingKind::Boolean => value.is_boolean(),
        SettingKind::Text => value.is_string(),
    }
}

impl SettingsRegistry for SandboxSettings {
    fn register(&self, spec: SettingSpec) {
        let key = (spec.namespace.clone(), spec.key.clone());
        relock(self.specs.write()).insert(key, spec);
    }

    fn get(&self, namespace: &str, key: &str) -> HostResult<Value> {
        let lookup = (namespace.to_string(), key.to_string());
        if let Some(value) = relock(self.values.read()).get(&lookup) {
            return Ok(value.clone());
        }
        relock(self.specs.read())
            .get(&lookup)
            .map(|spec| spec.default.clone())
            .ok_or_else(|| HostError::SettingNotFound {
                namespace: namespace.to_string(),
                key: key.to_string(),
            })
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> HostResult<()> {
        let lookup = (namespace.to_string(), key.to_string());
        let kind = relock(self.specs.read())
            .get(&lookup)
            .map(|spec| spec.kind)
            .ok_or_else(|| HostError::SettingNotFound {
                namespace: namespace.to_string(),
                key: key.to_string(),
            })?;
        if !kind_accepts(kind, &value) {
            return Err(HostError::SettingValue {
                namespace: namespace.to_string(),
                key: key.to_string(),
                message: format!("expected {kind:?}, got {value}"),
            });
        }
        tracing::debug!(namespace, key, %value, "setting changed");
        self.events.push(SandboxEvent::SettingChanged {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: value.clone(),
        });
        relock(self.values.write()).insert(lookup, value);
        Ok(())
    }
}
