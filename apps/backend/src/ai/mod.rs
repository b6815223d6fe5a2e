//! AI decision engine: ISMCTS with determinization.
//!
//! [`determinize`] builds honest observations and samples worlds,
//! [`rollout`] is the fast heuristic playout policy, and [`ismcts`] runs the
//! search and produces per-action statistics. The game-side executor that
//! schedules searches lives in `crate::game::actor`.

pub mod config;
pub mod determinize;
pub mod ismcts;
pub mod rollout;

use std::fmt;

pub use config::{AiSeatConfig, Character, Difficulty};
pub use determinize::{determinize, observe, Observation};
pub use ismcts::{
    analysis_type_for, search, ActionStats, AnalysisType, SearchAction, SearchConfig,
    SearchOutcome,
};

/// Errors from AI decision-making.
#[derive(Debug)]
pub enum AiError {
    /// The search was cancelled before producing anything usable.
    Cancelled,
    /// The engine hit an unexpected condition.
    Internal(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Cancelled => write!(f, "AI search cancelled"),
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}
