//! `CurrentUser` extractor: bearer token → player identity.
//!
//! The token comes from the `Authorization: Bearer …` header. WebSocket
//! handshakes, where browsers cannot set headers, may pass it as a `token`
//! query parameter instead.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::errors::ErrorCode;
use crate::state::app_state::AppState;
use crate::AppError;

/// The authenticated player for this request or connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub player_id: Uuid,
    pub display_name: String,
}

fn bearer_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(header) = req.headers().get(actix_web::http::header::AUTHORIZATION) {
        let value = header.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        return Some(token.to_string());
    }
    // WebSocket handshake fallback.
    let query = req.query_string();
    for pair in query.split('&') {
        if let Some(token) = pair.strip_prefix("token=") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    None
}

pub fn resolve_current_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let app_state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;
    let token = bearer_from_request(req)
        .ok_or_else(|| AppError::unauthorized_with(ErrorCode::UnauthorizedMissingBearer))?;
    let identity = app_state.auth.verify(&token)?;
    Ok(CurrentUser {
        player_id: identity.player_id,
        display_name: identity.display_name,
    })
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve_current_user(req))
    }
}
