//! Liveness endpoint.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::state::app_state::AppState;
use crate::util::now_ms;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    uptime_ms: i64,
    active_games: usize,
    active_connections: usize,
}

pub async fn health(app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        uptime_ms: now_ms() - app_state.started_at_ms,
        active_games: app_state.lobby.active_game_count(),
        active_connections: app_state.connections.active_connections_count(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health));
}
