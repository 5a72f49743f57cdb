//! Difficulty presets.
//!
//! The level catalog is a small fixed enumeration. Each difficulty maps to
//! an immutable `LevelConfig` controlling deck size, grid shape, time
//! budget, and how heavily mismatches are penalized when scoring.
//!
//! Hosts validate raw keys through [`Difficulty::from_key`] before anything
//! else; an unknown key is a configuration error, never silently defaulted.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Difficulty preset selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Immutable per-difficulty parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Number of matching pairs in the deck.
    pub pair_count: usize,

    /// Grid columns (layout hint for rendering hosts).
    pub columns: usize,

    /// Countdown budget in seconds.
    pub time_budget_secs: u32,

    /// Multiplier applied to the per-mismatch score penalty.
    pub mismatch_penalty_weight: u32,
}

impl Difficulty {
    /// All difficulties, in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse a raw difficulty key from the host boundary.
    pub fn from_key(key: &str) -> Result<Self, EngineError> {
        match key {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(EngineError::UnknownDifficulty(key.to_string())),
        }
    }

    /// Stable key used for persistence and host configuration.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Look up the preset for this difficulty.
    #[must_use]
    pub const fn config(self) -> LevelConfig {
        match self {
            Difficulty::Easy => LevelConfig {
                pair_count: 6,
                columns: 3,
                time_budget_secs: 90,
                mismatch_penalty_weight: 1,
            },
            Difficulty::Medium => LevelConfig {
                pair_count: 8,
                columns: 4,
                time_budget_secs: 120,
                mismatch_penalty_weight: 1,
            },
            Difficulty::Hard => LevelConfig {
                pair_count: 12,
                columns: 6,
                time_budget_secs: 180,
                mismatch_penalty_weight: 2,
            },
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
