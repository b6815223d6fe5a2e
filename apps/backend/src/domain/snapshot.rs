//! Per-recipient redacted views of the game state.
//!
//! Information hiding is a correctness property here: the server builds a
//! view per recipient, so a client never receives another player's hand or
//! the blind, only counts and public facts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cards_types::{Card, Suit};
use super::state::{
    FoldDecision, GameState, Phase, PlacedBid, Seat, SeatKind, Trick,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub player_id: Uuid,
    pub display_name: String,
    pub position: Seat,
    /// Present only in the owner's own view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
    pub hand_count: u8,
    pub score: i16,
    pub tricks_taken: u8,
    pub connected: bool,
    pub folded: bool,
    pub fold_decision: FoldDecision,
    pub seat_kind: SeatKind,
}

/// The full redacted state carried by every `GAME_STATE_UPDATE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: Uuid,
    pub phase: Phase,
    pub round_no: u32,
    pub dealer_position: Seat,
    pub players: Vec<PlayerSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_up: Option<Card>,
    pub clubs_turned_up: bool,
    pub bids: Vec<PlacedBid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bidder: Option<Seat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_bid: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_bidder_position: Option<Seat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trump_suit: Option<Suit>,
    pub tricks: Vec<Trick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_trick: Option<Trick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_player_position: Option<Seat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_position: Option<Seat>,
    pub version: u64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Build the state as seen from `viewer`'s seat; `None` redacts every hand
/// (the spectator/REST view).
pub fn snapshot_for(state: &GameState, viewer: Option<Seat>) -> GameSnapshot {
    let players = state
        .players
        .iter()
        .map(|p| PlayerSnapshot {
            player_id: p.id,
            display_name: p.display_name.clone(),
            position: p.position,
            hand: if viewer == Some(p.position) {
                Some(p.hand.clone())
            } else {
                None
            },
            hand_count: p.hand.len() as u8,
            score: p.score,
            tricks_taken: p.tricks_taken,
            connected: p.connected,
            folded: p.folded,
            fold_decision: p.fold_decision,
            seat_kind: p.seat_kind,
        })
        .collect();

    GameSnapshot {
        game_id: state.game_id,
        phase: state.phase,
        round_no: state.round_no,
        dealer_position: state.dealer,
        players,
        turn_up: state.turn_up,
        clubs_turned_up: state.clubs_turned_up,
        bids: state.bids.clone(),
        current_bidder: state.current_bidder,
        highest_bid: state.highest_bid,
        winning_bidder_position: state.winning_bidder,
        trump_suit: state.trump,
        tricks: state.tricks.clone(),
        current_trick: state.current_trick.clone(),
        current_player_position: state.current_player,
        winner_position: state.winner,
        version: state.version,
        created_at_ms: state.created_at_ms,
        updated_at_ms: state.updated_at_ms,
    }
}

/// Seat line for the lobby's public snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSeat {
    pub position: Seat,
    pub display_name: String,
    pub connected: bool,
}

/// Hands-invisible game summary for unauthenticated-with-respect-to-the-game
/// callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGameInfo {
    pub game_id: Uuid,
    pub phase: Phase,
    pub seat_count: u8,
    pub players: Vec<PublicSeat>,
}

pub fn public_info(state: &GameState) -> PublicGameInfo {
    PublicGameInfo {
        game_id: state.game_id,
        phase: state.phase,
        seat_count: state.players.len() as u8,
        players: state
            .players
            .iter()
            .map(|p| PublicSeat {
                position: p.position,
                display_name: p.display_name.clone(),
                connected: p.connected,
            })
            .collect(),
    }
}
