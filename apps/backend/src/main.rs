#![deny(clippy::wildcard_imports)]

use actix_web::{web, App, HttpServer};
use backend::routes;
use backend::{AppState, GameConfig, SecurityConfig};
use futures_util::future::join_all;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let jwt = std::env::var("APP_JWT_SECRET").unwrap_or_else(|_| {
        eprintln!("APP_JWT_SECRET must be set");
        std::process::exit(1);
    });
    let security = SecurityConfig::new(jwt.as_bytes());
    let config = GameConfig::from_env();
    if config.test_hooks_enabled {
        tracing::warn!("test hooks are ENABLED; do not run this configuration in production");
    }

    let app_state = web::Data::new(AppState::new(config, security));
    let shutdown_state = app_state.clone();

    println!("Starting Buck Euchre backend on http://127.0.0.1:3001");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind(("127.0.0.1", 3001))?
    .run();

    let result = server.await;

    // Close any sessions that outlived the server loop.
    let closing = shutdown_state.connections.close_all_connections();
    let _ = join_all(closing).await;

    result
}
