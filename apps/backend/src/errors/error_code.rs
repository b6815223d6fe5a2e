//! Error codes for the game backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses and in `ERROR` events on the socket.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Centralized error codes for the game backend.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,

    // Gameplay authorization
    /// Action submitted by a player not currently entitled to act
    NotYourTurn,
    /// Action violates a game rule or carries a malformed payload
    InvalidAction,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Seat unavailable: game full or already started
    SeatTaken,
    /// Could not join the requested game
    JoinGameFailed,

    // Request Validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // System Errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::InvalidAction => "INVALID_ACTION",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::SeatTaken => "SEAT_TAKEN",
            Self::JoinGameFailed => "JOIN_GAME_FAILED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let code = match s.as_str() {
            "UNAUTHORIZED" => Self::Unauthorized,
            "UNAUTHORIZED_MISSING_BEARER" => Self::UnauthorizedMissingBearer,
            "UNAUTHORIZED_INVALID_JWT" => Self::UnauthorizedInvalidJwt,
            "UNAUTHORIZED_EXPIRED_JWT" => Self::UnauthorizedExpiredJwt,
            "NOT_YOUR_TURN" => Self::NotYourTurn,
            "INVALID_ACTION" => Self::InvalidAction,
            "GAME_NOT_FOUND" => Self::GameNotFound,
            "NOT_FOUND" => Self::NotFound,
            "SEAT_TAKEN" => Self::SeatTaken,
            "JOIN_GAME_FAILED" => Self::JoinGameFailed,
            "VALIDATION_ERROR" => Self::ValidationError,
            "BAD_REQUEST" => Self::BadRequest,
            "INTERNAL" => Self::Internal,
            "CONFIG_ERROR" => Self::ConfigError,
            other => return Err(serde::de::Error::custom(format!("unknown code: {other}"))),
        };
        Ok(code)
    }
}
