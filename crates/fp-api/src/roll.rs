//! Dice denominations, terms, and roll records.
//!
//! A chat message may carry one or more [`Roll`]s. Each roll is a list
//! of die terms plus a flat modifier; each term records the individual
//! die results, including results that were discarded by a reroll.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A polyhedral die denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// Build a die from a side count, preferring the standard denominations.
    pub fn from_sides(sides: u32) -> Self {
        match sides {
            4 => Self::D4,
            6 => Self::D6,
            8 => Self::D8,
            10 => Self::D10,
            12 => Self::D12,
            20 => Self::D20,
            100 => Self::D100,
            n => Self::Custom(n),
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A single die result inside a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The face value rolled.
    pub value: u32,
    /// Whether this result has been discarded by a reroll and no longer
    /// counts toward the total.
    pub discarded: bool,
}

impl DieResult {
    /// A fresh, counting result.
    pub fn new(value: u32) -> Self {
        Self {
            value,
            discarded: false,
        }
    }

    /// A result that has been discarded by a reroll.
    pub fn discarded(value: u32) -> Self {
        Self {
            value,
            discarded: true,
        }
    }
}

/// One dice term of a roll: a denomination and its rolled results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieTerm {
    /// The die denomination rolled.
    pub die: Die,
    /// The individual results, in roll order.
    pub results: Vec<DieResult>,
}

impl DieTerm {
    /// Create an empty term for a denomination.
    pub fn new(die: Die) -> Self {
        Self {
            die,
            results: Vec::new(),
        }
    }

    /// Append a counting result.
    pub fn with_result(mut self, value: u32) -> Self {
        self.results.push(DieResult::new(value));
        self
    }

    /// The results that still count (not discarded).
    pub fn active_results(&self) -> impl Iterator<Item = &DieResult> {
        self.results.iter().filter(|r| !r.discarded)
    }
}

/// A recorded dice roll: terms plus a flat modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// The dice terms, in formula order.
    pub terms: Vec<DieTerm>,
    /// Flat modifier added to the summed results.
    pub modifier: i32,
}

impl Roll {
    /// Create a roll from its terms and modifier.
    pub fn new(terms: Vec<DieTerm>, modifier: i32) -> Self {
        Self { terms, modifier }
    }

    /// Convenience constructor for the common single-die roll.
    pub fn single(die: Die, value: u32, modifier: i32) -> Self {
        Self {
            terms: vec![DieTerm::new(die).with_result(value)],
            modifier,
        }
    }

    /// Sum of all non-discarded results plus the modifier.
    pub fn total(&self) -> i32 {
        let dice: i64 = self
            .terms
            .iter()
            .flat_map(DieTerm::active_results)
            .map(|r| i64::from(r.value))
            .sum();
        dice as i32 + self.modifier
    }

    /// Human-readable formula, e.g. `1d20+3`.
    pub fn formula(&self) -> String {
        let mut out = String::new();
        for term in &self.terms {
            if !out.is_empty() {
                out.push('+');
            }
            out.push_str(&format!("{}{}", term.results.len(), term.die));
        }
        if self.modifier > 0 {
            out.push_str(&format!("+{}", self.modifier));
        } else if self.modifier < 0 {
            out.push_str(&self.modifier.to_string());
        }
        out
    }
}
