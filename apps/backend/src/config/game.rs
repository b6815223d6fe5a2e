//! Gameplay pacing and feature toggles, read from the environment once at
//! startup. Every knob has a production default; tests build the struct
//! directly with short timers.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Pause after a trick's final card so clients can render it.
    pub trick_reveal: Duration,
    /// Pause on ROUND_OVER before the next round auto-starts.
    pub round_auto_start: Duration,
    /// How long a disconnected seat is held before the game pauses.
    pub disconnect_grace: Duration,
    /// How long a finished game lingers before the actor stops.
    pub game_over_linger: Duration,
    /// Artificial delay bounds before an AI decision is submitted.
    pub ai_delay_min: Duration,
    pub ai_delay_max: Duration,
    /// Hard wall-clock cap on a single ISMCTS search.
    pub ai_time_budget: Duration,
    /// Whether the deck/dealer pinning endpoints are live.
    pub test_hooks_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            trick_reveal: Duration::from_secs(3),
            round_auto_start: Duration::from_secs(8),
            disconnect_grace: Duration::from_secs(30),
            game_over_linger: Duration::from_secs(30),
            ai_delay_min: Duration::ZERO,
            ai_delay_max: Duration::from_millis(500),
            ai_time_budget: Duration::from_secs(2),
            test_hooks_enabled: false,
        }
    }
}

impl GameConfig {
    /// Load from `APP_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            trick_reveal: env_millis("APP_TRICK_REVEAL_MS", defaults.trick_reveal),
            round_auto_start: env_millis("APP_ROUND_AUTO_START_MS", defaults.round_auto_start),
            disconnect_grace: env_millis("APP_DISCONNECT_GRACE_MS", defaults.disconnect_grace),
            game_over_linger: env_millis("APP_GAME_OVER_LINGER_MS", defaults.game_over_linger),
            ai_delay_min: env_millis("APP_AI_DELAY_MIN_MS", defaults.ai_delay_min),
            ai_delay_max: env_millis("APP_AI_DELAY_MAX_MS", defaults.ai_delay_max),
            ai_time_budget: env_millis("APP_AI_TIME_BUDGET_MS", defaults.ai_time_budget),
            test_hooks_enabled: env_flag("APP_TEST_HOOKS"),
        }
    }

}

fn env_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).ok().as_deref(),
        Some("1") | Some("true") | Some("TRUE")
    )
}
