//! Seeded dice server.

use std::sync::Mutex;

use fp_api::{DiceRoller, Die};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::relock;

/// Dice roller with a deterministic, seedable RNG.
pub struct SandboxDice {
    rng: Mutex<StdRng>,
}

impl SandboxDice {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DiceRoller for SandboxDice {
    fn roll(&self, die: Die) -> u32 {
        // A zero-sided custom die still rolls a 1.
        let sides = die.sides().max(1);
        let value = relock(self.rng.lock()).random_range(1..=sides);
        tracing::debug!(%die, value, "die rolled");
        value
    }
}
