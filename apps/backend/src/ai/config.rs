//! AI difficulty presets and rollout-policy characters.

use serde::{Deserialize, Serialize};

/// Named search budgets for seated AIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// Simulations per decision.
    pub fn iterations(self) -> u32 {
        match self {
            Difficulty::Easy => 250,
            Difficulty::Medium => 1000,
            Difficulty::Hard => 5000,
            Difficulty::Expert => 10000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

/// Scalar multipliers applied to the rollout policy only; the tree search
/// itself is untouched. A missing character means "balanced" (all 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Scales the estimated trick count when deciding whether (and how high)
    /// to bid.
    pub aggressiveness: f64,
    /// >1 prefers winning plays; <1 conserves high cards.
    pub risk_taking: f64,
    /// >1 stays in on weaker hands; <1 folds earlier.
    pub fold_bias: f64,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            aggressiveness: 1.0,
            risk_taking: 1.0,
            fold_bias: 1.0,
        }
    }
}

impl Character {
    /// Named presets; unknown names fall back to balanced.
    pub fn by_name(name: &str) -> Self {
        match name {
            "timid" => Self {
                aggressiveness: 0.8,
                risk_taking: 0.7,
                fold_bias: 0.6,
            },
            "bold" => Self {
                aggressiveness: 1.3,
                risk_taking: 1.2,
                fold_bias: 1.4,
            },
            "wild" => Self {
                aggressiveness: 1.6,
                risk_taking: 1.5,
                fold_bias: 1.8,
            },
            _ => Self::default(),
        }
    }
}

/// Everything the executor needs for one AI seat.
#[derive(Debug, Clone)]
pub struct AiSeatConfig {
    pub difficulty: Difficulty,
    pub iterations: u32,
    pub character: Character,
}

impl AiSeatConfig {
    pub fn new(difficulty: Difficulty, iterations: Option<u32>, character: Option<&str>) -> Self {
        Self {
            difficulty,
            iterations: iterations.unwrap_or_else(|| difficulty.iterations()),
            character: character.map(Character::by_name).unwrap_or_default(),
        }
    }
}
