//! Terminal game results go to a pluggable `StatisticsSink`.
//!
//! Delivery is fire-and-forget: the game actor spawns the call and keeps
//! going, and implementations log-and-swallow their own failures.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::Seat;

#[derive(Debug, Clone)]
pub struct PlayerResult {
    pub player_id: Uuid,
    pub display_name: String,
    pub position: Seat,
    pub score: i16,
}

#[derive(Debug, Clone)]
pub struct GameResult {
    pub game_id: Uuid,
    pub rounds_played: u32,
    pub players: Vec<PlayerResult>,
    pub winner_position: Seat,
}

#[async_trait]
pub trait StatisticsSink: Send + Sync {
    async fn record(&self, result: GameResult);
}

/// Default sink: structured log line per finished game.
pub struct LoggingSink;

#[async_trait]
impl StatisticsSink for LoggingSink {
    async fn record(&self, result: GameResult) {
        let scores: Vec<String> = result
            .players
            .iter()
            .map(|p| format!("{}={}", p.display_name, p.score))
            .collect();
        info!(
            game_id = %result.game_id,
            rounds = result.rounds_played,
            winner = result.winner_position,
            scores = %scores.join(","),
            "game finished"
        );
    }
}
