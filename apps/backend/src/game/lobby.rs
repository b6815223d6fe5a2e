//! Process-wide game registry.
//!
//! Maps `game_id → actor handle`. The actor keeps a small shared meta record
//! fresh so listing does not have to round-trip through every actor's inbox.

use std::sync::{Arc, Weak};

use actix::prelude::*;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::domain::cards_types::Card;
use crate::domain::dealing::{Deal, DealSource, ShuffledDealSource};
use crate::domain::state::{Phase, Seat};
use crate::game::actor::GameActor;
use crate::stats::StatisticsSink;
use crate::util::now_ms;

/// Live facts the actor maintains for lobby listings.
#[derive(Debug, Clone, Copy)]
pub struct GameMeta {
    pub phase: Phase,
    pub seat_count: u8,
    pub created_at_ms: i64,
}

#[derive(Clone)]
pub struct GameHandle {
    pub addr: Addr<GameActor>,
    pub meta: Arc<RwLock<GameMeta>>,
}

/// Lobby listing line for games still waiting on seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListing {
    pub game_id: Uuid,
    pub seat_count: u8,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGame {
    pub game_id: Uuid,
    pub created_by: Uuid,
    pub created_at_ms: i64,
}

/// Dev-only pins for the next deal. The deck pin is consumed by the next
/// deal; the dealer pin persists until cleared.
#[derive(Default)]
pub struct TestHooks {
    deck: Mutex<Option<Vec<Card>>>,
    dealer: Mutex<Option<Seat>>,
}

impl TestHooks {
    pub fn pin_deck(&self, deck: Option<Vec<Card>>) {
        *self.deck.lock() = deck;
    }

    pub fn pin_dealer(&self, dealer: Option<Seat>) {
        *self.dealer.lock() = dealer;
    }

    fn take_deck(&self) -> Option<Vec<Card>> {
        self.deck.lock().take()
    }

    fn dealer(&self) -> Option<Seat> {
        *self.dealer.lock()
    }
}

/// Per-game deal source that honors the shared pins when present.
pub struct HookedDealSource {
    hooks: Arc<TestHooks>,
    fallback: ShuffledDealSource,
}

impl HookedDealSource {
    pub fn new(hooks: Arc<TestHooks>) -> Self {
        Self {
            hooks,
            fallback: ShuffledDealSource::new(),
        }
    }
}

impl DealSource for HookedDealSource {
    fn next_deal(&mut self) -> Deal {
        let pinned_dealer = self.hooks.dealer();
        match self.hooks.take_deck() {
            Some(deck) => Deal {
                deck,
                first_dealer: pinned_dealer,
            },
            None => {
                let mut deal = self.fallback.next_deal();
                if pinned_dealer.is_some() {
                    deal.first_dealer = pinned_dealer;
                }
                deal
            }
        }
    }
}

pub struct Lobby {
    games: DashMap<Uuid, GameHandle>,
    pub config: GameConfig,
    stats: Arc<dyn StatisticsSink>,
    hooks: Arc<TestHooks>,
}

impl Lobby {
    pub fn new(config: GameConfig, stats: Arc<dyn StatisticsSink>) -> Arc<Self> {
        Arc::new(Self {
            games: DashMap::new(),
            config,
            stats,
            hooks: Arc::new(TestHooks::default()),
        })
    }

    pub fn hooks(&self) -> Arc<TestHooks> {
        self.hooks.clone()
    }

    /// Allocate a new game actor with the creator in seat 0.
    pub fn create_game(
        self: &Arc<Self>,
        creator_id: Uuid,
        creator_name: &str,
    ) -> CreatedGame {
        let game_id = Uuid::new_v4();
        let created_at_ms = now_ms();
        let meta = Arc::new(RwLock::new(GameMeta {
            phase: Phase::WaitingForPlayers,
            seat_count: 1,
            created_at_ms,
        }));
        let source = Box::new(HookedDealSource::new(self.hooks.clone()));
        let lobby: Weak<Lobby> = Arc::downgrade(self);
        let addr = GameActor::new(
            game_id,
            created_at_ms,
            creator_id,
            creator_name.to_string(),
            self.config.clone(),
            source,
            meta.clone(),
            lobby,
            self.stats.clone(),
        )
        .start();
        self.games.insert(game_id, GameHandle { addr, meta });
        info!(game_id = %game_id, creator = %creator_id, "game created");
        CreatedGame {
            game_id,
            created_by: creator_id,
            created_at_ms,
        }
    }

    pub fn get(&self, game_id: Uuid) -> Option<GameHandle> {
        self.games.get(&game_id).map(|h| h.clone())
    }

    /// Games still waiting for players, oldest first.
    pub fn list_waiting(&self) -> Vec<GameListing> {
        let mut listings: Vec<GameListing> = self
            .games
            .iter()
            .filter_map(|entry| {
                let meta = entry.value().meta.read();
                (meta.phase == Phase::WaitingForPlayers).then(|| GameListing {
                    game_id: *entry.key(),
                    seat_count: meta.seat_count,
                    created_at_ms: meta.created_at_ms,
                })
            })
            .collect();
        listings.sort_by_key(|l| l.created_at_ms);
        listings
    }

    pub fn remove(&self, game_id: Uuid) {
        if self.games.remove(&game_id).is_some() {
            info!(game_id = %game_id, "game removed from lobby");
        }
    }

    pub fn active_game_count(&self) -> usize {
        self.games.len()
    }
}
