//! Guest token issuance.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::app_state::AppState;
use crate::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRequest {
    pub display_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestResponse {
    pub token: String,
    pub expires_at_ms: i64,
    pub player_id: Uuid,
    pub display_name: String,
}

/// POST /api/auth/guest: mint a bearer token for a display name.
pub async fn guest(
    body: web::Json<GuestRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let grant = app_state.auth.issue_guest(&body.display_name)?;
    Ok(HttpResponse::Ok().json(GuestResponse {
        token: grant.token,
        expires_at_ms: grant.expires_at_ms,
        player_id: grant.player_id,
        display_name: grant.display_name,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/auth").route("/guest", web::post().to(guest)));
}
