//! Messages accepted by the game actor.

use actix::prelude::*;
use uuid::Uuid;

use crate::ai::{ActionStats, AiSeatConfig, AnalysisType};
use crate::domain::state::{BidValue, Seat};
use crate::domain::{PublicGameInfo, Suit};
use crate::ws::protocol::ServerMsg;
use crate::AppError;

/// An event bound for one connection's outbox.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct OutboundEvent(pub ServerMsg);

/// A player action, already authenticated; the actor authorizes it against
/// the seat and phase.
#[derive(Debug, Clone)]
pub enum PlayerAction {
    PlaceBid(BidValue),
    DeclareTrump(Suit),
    FoldDecision(bool),
    PlayCard(String),
    StartNextRound,
    RequestState,
    Leave,
}

/// Seat (or re-bind) `player_id` and subscribe their outbox.
#[derive(Message)]
#[rtype(result = "Result<(), AppError>")]
pub struct Join {
    pub player_id: Uuid,
    pub display_name: String,
    pub analysis: bool,
    pub recipient: Recipient<OutboundEvent>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Act {
    pub player_id: Uuid,
    pub action: PlayerAction,
}

/// Transport lost the player's connection.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnected {
    pub player_id: Uuid,
}

/// Redacted summary for REST callers.
#[derive(Message)]
#[rtype(result = "PublicGameInfo")]
pub struct GetPublicInfo;

/// Seat an AI at the next free position.
#[derive(Message)]
#[rtype(result = "Result<PublicGameInfo, AppError>")]
pub struct SeatAi {
    pub config: AiSeatConfig,
}

/// A finished decision search for an AI seat, version-guarded.
#[derive(Message)]
#[rtype(result = "()")]
pub(crate) struct AiDecision {
    pub seat: Seat,
    pub version: u64,
    pub action: PlayerAction,
}

/// A finished analysis search for a human seat, version-guarded.
#[derive(Message)]
#[rtype(result = "()")]
pub(crate) struct AnalysisReady {
    pub seat: Seat,
    pub version: u64,
    pub analysis_type: AnalysisType,
    pub options: Vec<ActionStats>,
}
