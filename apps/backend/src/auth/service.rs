//! The auth collaborator seam.
//!
//! Registration, passwords, and third-party identity live outside this core;
//! all it needs is something that issues bearer tokens and resolves them to a
//! `{player_id, display_name}` identity. `LocalAuth` is the built-in
//! implementation: guest identities signed with the server's own secret.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use super::jwt::{mint_access_token, verify_access_token};
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Identity derived from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub player_id: Uuid,
    pub display_name: String,
}

/// A freshly issued credential.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub token: String,
    pub expires_at_ms: i64,
    pub player_id: Uuid,
    pub display_name: String,
}

pub trait AuthService: Send + Sync {
    /// Issue a token for a new guest identity.
    fn issue_guest(&self, display_name: &str) -> Result<AuthGrant, AppError>;

    /// Resolve a bearer token to an identity, rejecting invalid or expired
    /// tokens.
    fn verify(&self, token: &str) -> Result<Identity, AppError>;
}

pub struct LocalAuth {
    security: SecurityConfig,
}

impl LocalAuth {
    pub fn new(security: SecurityConfig) -> Self {
        Self { security }
    }
}

impl AuthService for LocalAuth {
    fn issue_guest(&self, display_name: &str) -> Result<AuthGrant, AppError> {
        let trimmed = display_name.trim();
        if trimmed.is_empty() || trimmed.len() > 32 {
            return Err(AppError::validation(
                "displayName must be 1..=32 characters",
            ));
        }
        let player_id = Uuid::new_v4();
        let now = SystemTime::now();
        let token = mint_access_token(&self.security, player_id, trimmed, now)?;
        let issued_ms = now
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
            .as_millis() as i64;
        Ok(AuthGrant {
            token,
            expires_at_ms: issued_ms + self.security.token_ttl_secs * 1000,
            player_id,
            display_name: trimmed.to_string(),
        })
    }

    fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let claims = verify_access_token(&self.security, token)?;
        Ok(Identity {
            player_id: claims.sub,
            display_name: claims.name,
        })
    }
}
