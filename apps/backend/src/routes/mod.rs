//! HTTP and WebSocket route wiring.

use actix_web::web;

pub mod auth;
pub mod games;
pub mod test_hooks;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(crate::health::configure_routes)
        .configure(auth::configure_routes)
        .configure(games::configure_routes)
        .configure(test_hooks::configure_routes)
        .route("/ws", web::get().to(crate::ws::session::upgrade));
}
