//! Application state shared across workers.

use std::sync::Arc;

use crate::auth::{AuthService, LocalAuth};
use crate::config::GameConfig;
use crate::game::lobby::Lobby;
use crate::state::security_config::SecurityConfig;
use crate::stats::{LoggingSink, StatisticsSink};
use crate::util::now_ms;
use crate::ws::hub::ConnectionRegistry;

pub struct AppState {
    pub lobby: Arc<Lobby>,
    pub auth: Arc<dyn AuthService>,
    pub connections: Arc<ConnectionRegistry>,
    pub config: GameConfig,
    pub started_at_ms: i64,
}

impl AppState {
    /// Wire the default collaborators: local JWT auth and a logging
    /// statistics sink.
    pub fn new(config: GameConfig, security: SecurityConfig) -> Self {
        let stats: Arc<dyn StatisticsSink> = Arc::new(LoggingSink);
        Self::with_collaborators(config, security, stats)
    }

    pub fn with_collaborators(
        config: GameConfig,
        security: SecurityConfig,
        stats: Arc<dyn StatisticsSink>,
    ) -> Self {
        let lobby = Lobby::new(config.clone(), stats);
        Self {
            lobby,
            auth: Arc::new(LocalAuth::new(security)),
            connections: Arc::new(ConnectionRegistry::new()),
            config,
            started_at_ms: now_ms(),
        }
    }
}
