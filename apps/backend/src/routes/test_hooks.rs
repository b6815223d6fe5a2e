//! Dev-only deck and dealer pinning.
//!
//! Disabled unless `APP_TEST_HOOKS=1`; in production these endpoints do not
//! exist (404), so the pinning surface cannot leak into live games.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::domain::cards_parsing::try_parse_cards;
use crate::domain::state::Seat;
use crate::errors::ErrorCode;
use crate::extractors::CurrentUser;
use crate::state::app_state::AppState;
use crate::AppError;

fn require_hooks(app_state: &AppState) -> Result<(), AppError> {
    if app_state.config.test_hooks_enabled {
        Ok(())
    } else {
        Err(AppError::not_found(ErrorCode::NotFound, "not found"))
    }
}

#[derive(Debug, Deserialize)]
pub struct DeckRequest {
    pub deck: Option<Vec<String>>,
}

/// POST /api/test/deck: pin the next deal's deck ordering (null clears).
pub async fn pin_deck(
    _user: CurrentUser,
    body: web::Json<DeckRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_hooks(&app_state)?;
    let deck = match &body.deck {
        Some(ids) => {
            let cards = try_parse_cards(ids)?;
            if cards.len() != 24 {
                return Err(AppError::validation("deck must contain exactly 24 cards"));
            }
            Some(cards)
        }
        None => None,
    };
    app_state.lobby.hooks().pin_deck(deck);
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct DealerRequest {
    pub position: Option<Seat>,
}

/// POST /api/test/dealer: pin the first-round dealer (null clears).
pub async fn pin_dealer(
    _user: CurrentUser,
    body: web::Json<DealerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_hooks(&app_state)?;
    if let Some(position) = body.position {
        if position > 3 {
            return Err(AppError::validation("position must be 0..=3"));
        }
    }
    app_state.lobby.hooks().pin_dealer(body.position);
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/test")
            .route("/deck", web::post().to(pin_deck))
            .route("/dealer", web::post().to(pin_dealer)),
    );
}
