//! The Friend Points resource and its typed store.
//!
//! The resource is a flat `{value, max}` record persisted as an actor
//! flag under the module namespace. All reads and writes go through
//! [`FriendPointsStore`] so the clamping rules live in one place.

use std::fmt;
use std::sync::Arc;

use fp_api::{Actor, ActorId, ActorKind, ActorStore, HostContext, SettingsRegistry};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ModuleError, ModuleResult};
use crate::{MODULE_ID, settings};

/// Flag key the resource is stored under (namespaced by the module id).
pub const RESOURCE_KEY: &str = "points";

/// A character's Friend Points counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendPoints {
    /// Points currently available to spend.
    pub value: u8,
    /// Cap the value may never exceed.
    pub max: u8,
}

impl FriendPoints {
    /// A fresh, empty counter with the given cap.
    pub fn new(max: u8) -> Self {
        Self { value: 0, max }
    }

    /// The counter after a clamped adjustment. The value never leaves
    /// `[0, max]`; the cap is untouched.
    pub fn adjusted(self, delta: i32) -> Self {
        let value = (i32::from(self.value) + delta).clamp(0, i32::from(self.max));
        Self {
            value: value as u8,
            max: self.max,
        }
    }

    /// True when no points are left.
    pub fn is_empty(self) -> bool {
        self.value == 0
    }

    /// True when the counter is at its cap.
    pub fn is_full(self) -> bool {
        self.value >= self.max
    }
}

impl fmt::Display for FriendPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.max)
    }
}

/// Typed accessor over the actor store for the Friend Points flag.
pub struct FriendPointsStore {
    actors: Arc<dyn ActorStore>,
    settings: Arc<dyn SettingsRegistry>,
}

impl FriendPointsStore {
    /// Build a store over a session's services.
    pub fn new(ctx: &HostContext) -> Self {
        Self {
            actors: Arc::clone(&ctx.actors),
            settings: Arc::clone(&ctx.settings),
        }
    }

    /// Read the resource off an actor document already in hand. A
    /// malformed flag payload reads as absent.
    pub fn read(actor: &Actor) -> Option<FriendPoints> {
        let value = actor.flag(MODULE_ID, RESOURCE_KEY)?;
        match serde_json::from_value(value.clone()) {
            Ok(points) => Some(points),
            Err(err) => {
                tracing::warn!(actor = %actor.id, %err, "malformed Friend Points flag; treating as absent");
                None
            }
        }
    }

    /// Fetch an actor and read its resource.
    pub async fn get(&self, id: ActorId) -> ModuleResult<Option<FriendPoints>> {
        let actor = self.actors.get(id).await?;
        Ok(Self::read(&actor))
    }

    /// Attach an empty resource to a character that lacks one. Returns
    /// true when a write happened.
    pub async fn ensure(&self, actor: &Actor) -> ModuleResult<bool> {
        if actor.kind != ActorKind::Character {
            return Ok(false);
        }
        if Self::read(actor).is_some() {
            return Ok(false);
        }
        let points = FriendPoints::new(settings::max_points(self.settings.as_ref()));
        self.write(actor.id, points).await?;
        tracing::info!(actor = %actor.id, name = %actor.name, max = points.max, "Friend Points resource created");
        Ok(true)
    }

    /// Sweep every actor and attach missing resources. Returns how many
    /// characters were seeded.
    pub async fn ensure_all(&self) -> ModuleResult<usize> {
        let mut created = 0;
        for actor in self.actors.list().await? {
            if self.ensure(&actor).await? {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Clamp-adjust a character's points and persist the result. The
    /// stored counter is written back even when the clamp leaves it
    /// unchanged, so the write always reflects what this session saw.
    pub async fn adjust(&self, id: ActorId, delta: i32) -> ModuleResult<FriendPoints> {
        let actor = self.actors.get(id).await?;
        let current = Self::read(&actor).ok_or(ModuleError::ResourceMissing(id))?;
        let next = current.adjusted(delta);
        self.write(id, next).await?;
        tracing::debug!(actor = %id, from = current.value, to = next.value, "Friend Points adjusted");
        Ok(next)
    }

    async fn write(&self, id: ActorId, points: FriendPoints) -> ModuleResult<()> {
        let value = json!({"value": points.value, "max": points.max});
        self.actors.set_flag(id, MODULE_ID, RESOURCE_KEY, value).await?;
        Ok(())
    }
}
