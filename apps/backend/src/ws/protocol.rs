//! JSON wire protocol for the bidirectional event surface.
//!
//! Messages are objects tagged by `event`; event names are
//! SCREAMING_SNAKE_CASE and payload fields are camelCase. Clients tolerate
//! unknown fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::{ActionStats, AnalysisType};
use crate::domain::state::{BidValue, Seat};
use crate::domain::{GameSnapshot, Suit};
use crate::errors::ErrorCode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMsg {
    #[serde(rename_all = "camelCase")]
    JoinGame {
        game_id: Uuid,
        #[serde(default)]
        analysis: bool,
    },
    #[serde(rename_all = "camelCase")]
    PlaceBid { game_id: Uuid, amount: BidValue },
    #[serde(rename_all = "camelCase")]
    DeclareTrump { game_id: Uuid, trump_suit: Suit },
    #[serde(rename_all = "camelCase")]
    FoldDecision { game_id: Uuid, folded: bool },
    #[serde(rename_all = "camelCase")]
    PlayCard { game_id: Uuid, card_id: String },
    #[serde(rename_all = "camelCase")]
    StartNextRound { game_id: Uuid },
    #[serde(rename_all = "camelCase")]
    RequestState { game_id: Uuid },
    #[serde(rename_all = "camelCase")]
    LeaveGame { game_id: Uuid },
}

impl ClientMsg {
    pub fn game_id(&self) -> Uuid {
        match self {
            ClientMsg::JoinGame { game_id, .. }
            | ClientMsg::PlaceBid { game_id, .. }
            | ClientMsg::DeclareTrump { game_id, .. }
            | ClientMsg::FoldDecision { game_id, .. }
            | ClientMsg::PlayCard { game_id, .. }
            | ClientMsg::StartNextRound { game_id }
            | ClientMsg::RequestState { game_id }
            | ClientMsg::LeaveGame { game_id } => *game_id,
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMsg {
    #[serde(rename_all = "camelCase")]
    GameStateUpdate { game_state: GameSnapshot },
    #[serde(rename_all = "camelCase")]
    TrickComplete {
        trick_number: u8,
        winner_position: Seat,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_player_position: Option<Seat>,
    },
    #[serde(rename_all = "camelCase")]
    RoundComplete {
        deltas: [i16; 4],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_round: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    AllPlayersPassed { new_round: u32 },
    #[serde(rename_all = "camelCase")]
    GameWaiting {
        game_id: Uuid,
        player_count: u8,
        players_needed: u8,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayerConnected {
        player_id: Uuid,
        display_name: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayerDisconnected { position: Seat },
    #[serde(rename_all = "camelCase")]
    PlayerReconnected { player_id: Uuid },
    #[serde(rename_all = "camelCase")]
    AiAnalysisUpdate {
        analysis_type: AnalysisType,
        player_position: Seat,
        options: Vec<ActionStats>,
    },
    #[serde(rename_all = "camelCase")]
    Error { code: ErrorCode, message: String },
}
