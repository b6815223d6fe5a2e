//! Domain-level error type for rule-engine rejections.
//!
//! This error type is HTTP- and transport-agnostic. The game actor catches it,
//! leaves the state untouched, and reports it to the offending player only;
//! HTTP handlers convert it into `crate::error::AppError`.

use thiserror::Error;

use crate::errors::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("action is not allowed in the current phase")]
    PhaseMismatch,
    #[error("it is not this player's turn to act")]
    OutOfTurn,
    #[error("bid must be PASS or a number from 2 to 5")]
    InvalidBid,
    #[error("bid must be strictly greater than the current high bid")]
    BidTooLow,
    #[error("card is not in this player's hand")]
    CardNotInHand,
    #[error("must follow the led suit while holding it")]
    MustFollowSuit,
    #[error("folding is forbidden when clubs are turned up")]
    FoldForbidden,
    #[error("fold decision was already made")]
    AlreadyDecided,
    #[error("a folded player cannot act")]
    PlayerFolded,
    #[error("seat unavailable: the game is full or already started")]
    GameFull,
    #[error("player is not seated in this game")]
    NotSeated,
    #[error("unknown card id: {0}")]
    UnknownCard(String),
    #[error("invalid deck override: {0}")]
    InvalidDeck(String),
    #[error("game state invariant violated: {0}")]
    Invariant(String),
}

impl DomainError {
    /// Wire code for this rejection, per the error taxonomy.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::PhaseMismatch | DomainError::OutOfTurn => ErrorCode::NotYourTurn,
            DomainError::GameFull => ErrorCode::SeatTaken,
            DomainError::NotSeated => ErrorCode::JoinGameFailed,
            DomainError::Invariant(_) => ErrorCode::Internal,
            _ => ErrorCode::InvalidAction,
        }
    }
}
