//! World settings: how many points a character can hold and how long a
//! reroll request waits for an answer.

use std::time::Duration;

use fp_api::{SettingKind, SettingScope, SettingSpec, SettingsRegistry};
use serde_json::json;

use crate::MODULE_ID;

/// Key of the per-character point cap setting.
pub const SETTING_MAX_POINTS: &str = "maxPoints";
/// Key of the reroll-request timeout setting, in seconds.
pub const SETTING_REQUEST_TIMEOUT: &str = "requestTimeout";

const DEFAULT_MAX_POINTS: i64 = 3;
const DEFAULT_REQUEST_TIMEOUT_SECS: i64 = 30;

/// Register both settings with the host. Safe to call on every session.
pub fn register(settings: &dyn SettingsRegistry) {
    settings.register(
        SettingSpec::new(
            MODULE_ID,
            SETTING_MAX_POINTS,
            SettingScope::World,
            SettingKind::Integer,
            json!(DEFAULT_MAX_POINTS),
        )
        .with_name("FRIENDPOINTS.SettingMaxPointsName")
        .with_hint("FRIENDPOINTS.SettingMaxPointsHint"),
    );
    settings.register(
        SettingSpec::new(
            MODULE_ID,
            SETTING_REQUEST_TIMEOUT,
            SettingScope::World,
            SettingKind::Integer,
            json!(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
        .with_name("FRIENDPOINTS.SettingRequestTimeoutName")
        .with_hint("FRIENDPOINTS.SettingRequestTimeoutHint"),
    );
}

/// Configured point cap, clamped to at least one pip. Falls back to the
/// default when the setting is unregistered or holds a non-integer.
pub fn max_points(settings: &dyn SettingsRegistry) -> u8 {
    let configured = settings
        .get(MODULE_ID, SETTING_MAX_POINTS)
        .ok()
        .and_then(|value| value.as_i64())
        .unwrap_or(DEFAULT_MAX_POINTS);
    configured.clamp(1, i64::from(u8::MAX)) as u8
}

/// Configured request timeout, clamped to at least one second.
pub fn request_timeout(settings: &dyn SettingsRegistry) -> Duration {
    let configured = settings
        .get(MODULE_ID, SETTING_REQUEST_TIMEOUT)
        .ok()
        .and_then(|value| value.as_i64())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(configured.max(1) as u64)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fp_api::{User, UserRole};
    use fp_sandbox::Sandbox;

    use super::*;

    fn registry() -> Arc<dyn SettingsRegistry> {
        let gm = User::new("GM", UserRole::Gamemaster);
        let gm_id = gm.id;
        let sandbox = Sandbox::builder().with_user(gm).build();
        let ctx = sandbox.context(gm_id).unwrap();
        Arc::clone(&ctx.settings)
    }

    #[test]
    fn defaults_apply_before_registration() {
        let settings = registry();
        assert_eq!(max_points(settings.as_ref()), 3);
        assert_eq!(request_timeout(settings.as_ref()), Duration::from_secs(30));
    }

    #[test]
    fn registered_values_are_read_back() {
        let settings = registry();
        register(settings.as_ref());
        settings
            .set(MODULE_ID, SETTING_MAX_POINTS, json!(5))
            .unwrap();
        settings
            .set(MODULE_ID, SETTING_REQUEST_TIMEOUT, json!(2))
            .unwrap();
        assert_eq!(max_points(settings.as_ref()), 5);
        assert_eq!(request_timeout(settings.as_ref()), Duration::from_secs(2));
    }

    #[test]
    fn nonsense_values_are_clamped() {
        let settings = registry();
        register(settings.as_ref());
        settings
            .set(MODULE_ID, SETTING_MAX_POINTS, json!(0))
            .unwrap();
        settings
            .set(MODULE_ID, SETTING_REQUEST_TIMEOUT, json!(-10))
            .unwrap();
        assert_eq!(max_points(settings.as_ref()), 1);
        assert_eq!(request_timeout(settings.as_ref()), Duration::from_secs(1));
    }

    #[test]
    fn registration_is_idempotent() {
        let settings = registry();
        register(settings.as_ref());
        settings
            .set(MODULE_ID, SETTING_MAX_POINTS, json!(2))
            .unwrap();
        register(settings.as_ref());
        assert_eq!(max_points(settings.as_ref()), 2);
    }
}
