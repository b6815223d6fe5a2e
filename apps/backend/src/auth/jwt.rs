//! HS256 access tokens carrying a player identity.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ErrorCode;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims included in backend-issued access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Player id
    pub sub: Uuid,
    /// Display name shown at the table
    pub name: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Mint an access token for `player_id`/`display_name`.
pub fn mint_access_token(
    security: &SecurityConfig,
    player_id: Uuid,
    display_name: &str,
    now: SystemTime,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;
    let exp = iat + security.token_ttl_secs;

    let claims = Claims {
        sub: player_id,
        name: display_name.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token and return its claims.
///
/// Errors:
/// - Expired token → `UNAUTHORIZED_EXPIRED_JWT`
/// - Anything else (bad signature, malformed) → `UNAUTHORIZED_INVALID_JWT`
pub fn verify_access_token(security: &SecurityConfig, token: &str) -> Result<Claims, AppError> {
    // Default Validation already checks exp; pin the algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::unauthorized_with(ErrorCode::UnauthorizedExpiredJwt)
        }
        _ => AppError::unauthorized_with(ErrorCode::UnauthorizedInvalidJwt),
    })
}
