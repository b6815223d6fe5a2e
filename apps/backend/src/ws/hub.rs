//! Per-player connection registry.
//!
//! One live connection per player identity: registering a newer connection
//! shuts the older one down, and only the current connection may report the
//! player as disconnected (reconnect races resolve in favor of the latest
//! socket).

use actix::prelude::*;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::ws::session::{Shutdown, WsSession};

pub struct ConnectionRegistry {
    /// player id → (connection id, session address)
    connections: DashMap<Uuid, (Uuid, Addr<WsSession>)>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register the player's latest connection; any previous one is told to
    /// shut down.
    pub fn register(&self, player_id: Uuid, conn_id: Uuid, addr: Addr<WsSession>) {
        let previous = self.connections.insert(player_id, (conn_id, addr));
        info!(
            player_id = %player_id,
            conn_id = %conn_id,
            active_connections = self.connections.len(),
            "websocket session registered"
        );
        if let Some((old_conn, old_addr)) = previous {
            if old_conn != conn_id {
                old_addr.do_send(Shutdown);
            }
        }
    }

    /// Whether `conn_id` is still the player's live connection.
    pub fn is_current(&self, player_id: Uuid, conn_id: Uuid) -> bool {
        self.connections
            .get(&player_id)
            .map(|entry| entry.0 == conn_id)
            .unwrap_or(false)
    }

    /// Drop the registration, but only if it still belongs to `conn_id`.
    pub fn unregister(&self, player_id: Uuid, conn_id: Uuid) {
        let removed = self
            .connections
            .remove_if(&player_id, |_, value| value.0 == conn_id)
            .is_some();
        if removed {
            info!(
                player_id = %player_id,
                conn_id = %conn_id,
                active_connections = self.connections.len(),
                "websocket session unregistered"
            );
        }
    }

    /// Ask every live session to shut down; used on server exit.
    pub fn close_all_connections(&self) -> Vec<actix::dev::Request<WsSession, Shutdown>> {
        // Clone addrs first to drop DashMap guards before sending shutdowns.
        let mut addrs = Vec::new();
        for entry in self.connections.iter() {
            addrs.push(entry.value().1.clone());
        }
        addrs.into_iter().map(|addr| addr.send(Shutdown)).collect()
    }

    pub fn active_connections_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
