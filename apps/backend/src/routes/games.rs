//! Lobby and game REST endpoints.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::ai::{AiSeatConfig, Difficulty};
use crate::errors::ErrorCode;
use crate::extractors::CurrentUser;
use crate::game::messages::{GetPublicInfo, SeatAi};
use crate::state::app_state::AppState;
use crate::AppError;

/// POST /api/games: create a game with the caller in seat 0.
pub async fn create_game(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let created = app_state
        .lobby
        .create_game(user.player_id, &user.display_name);
    Ok(HttpResponse::Ok().json(created))
}

/// GET /api/games: games still waiting for players.
pub async fn list_games(
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.lobby.list_waiting()))
}

/// GET /api/games/{gameId}: hands-invisible snapshot.
pub async fn get_game(
    _user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();
    let handle = app_state
        .lobby
        .get(game_id)
        .ok_or_else(|| AppError::not_found(ErrorCode::GameNotFound, "game not found"))?;
    let info = handle
        .addr
        .send(GetPublicInfo)
        .await
        .map_err(|e| AppError::internal(format!("game actor unavailable: {e}")))?;
    Ok(HttpResponse::Ok().json(info))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAiRequest {
    pub difficulty: Difficulty,
    pub iterations: Option<u32>,
    pub character: Option<String>,
}

/// POST /api/games/{gameId}/ai: seat an AI at the next free position.
pub async fn seat_ai(
    _user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<SeatAiRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();
    let handle = app_state
        .lobby
        .get(game_id)
        .ok_or_else(|| AppError::not_found(ErrorCode::GameNotFound, "game not found"))?;
    let config = AiSeatConfig::new(body.difficulty, body.iterations, body.character.as_deref());
    let info = handle
        .addr
        .send(SeatAi { config })
        .await
        .map_err(|e| AppError::internal(format!("game actor unavailable: {e}")))??;
    Ok(HttpResponse::Ok().json(info))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/games")
            .route("", web::post().to(create_game))
            .route("", web::get().to(list_games))
            .route("/{game_id}", web::get().to(get_game))
            .route("/{game_id}/ai", web::post().to(seat_ai)),
    );
}
