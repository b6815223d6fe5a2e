//! The per-game single-writer actor.
//!
//! One actor owns one `GameState`. It processes its inbox strictly serially:
//! player actions, connection events, and its own timers (trick reveal, round
//! auto-start, disconnect grace, AI decisions). Nothing else ever mutates the
//! state, so no lock guards it. Every accepted mutation bumps `version` and
//! fans a per-recipient redacted snapshot out to the seated players.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use actix::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::ai::{
    analysis_type_for, observe, search, AiError, AiSeatConfig, SearchConfig,
};
use crate::config::GameConfig;
use crate::domain::bidding::{apply_bid, apply_trump_declaration, BidOutcome};
use crate::domain::dealing::{deal_next_round, start_first_round, DealSource};
use crate::domain::folding::{apply_fold_decision, FoldOutcome};
use crate::domain::rules::PLAYERS;
use crate::domain::scoring::RoundResult;
use crate::domain::snapshot::{public_info, snapshot_for};
use crate::domain::state::{GameState, Phase, PlayerState, Seat, SeatKind};
use crate::domain::tricks::{advance_trick, apply_card_play, PlayOutcome, TrickAdvance};
use crate::domain::{DomainError, PublicGameInfo};
use crate::errors::ErrorCode;
use crate::game::lobby::{GameMeta, Lobby};
use crate::game::messages::{
    Act, AiDecision, AnalysisReady, Disconnected, GetPublicInfo, Join, OutboundEvent,
    PlayerAction, SeatAi,
};
use crate::stats::{GameResult, PlayerResult, StatisticsSink};
use crate::util::now_ms;
use crate::ws::protocol::ServerMsg;
use crate::AppError;

/// A timer step swallowed while the game was paused on an abandoned seat;
/// replayed on reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredStep {
    RevealElapsed,
    AutoStart,
}

struct InFlightSearch {
    cancel: Arc<AtomicBool>,
}

impl InFlightSearch {
    fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

pub struct GameActor {
    state: GameState,
    config: GameConfig,
    deal_source: Box<dyn DealSource>,
    /// Latest live outbox per seated player id.
    outboxes: HashMap<Uuid, Recipient<OutboundEvent>>,
    /// Players who asked for AI analysis of their own decisions.
    analysis_seats: HashSet<Uuid>,
    ai_seats: HashMap<Seat, AiSeatConfig>,
    meta: Arc<parking_lot::RwLock<GameMeta>>,
    lobby: Weak<Lobby>,
    stats: Arc<dyn StatisticsSink>,
    rng: ChaCha12Rng,
    reveal_timer: Option<SpawnHandle>,
    auto_start_timer: Option<SpawnHandle>,
    grace_timers: HashMap<Uuid, SpawnHandle>,
    /// Seats whose grace expired; any non-empty set pauses the game.
    abandoned: HashSet<Uuid>,
    deferred: Option<DeferredStep>,
    decision_search: Option<InFlightSearch>,
    analysis_search: Option<InFlightSearch>,
    stats_recorded: bool,
}

impl GameActor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        game_id: Uuid,
        created_at_ms: i64,
        creator_id: Uuid,
        creator_name: String,
        config: GameConfig,
        deal_source: Box<dyn DealSource>,
        meta: Arc<parking_lot::RwLock<GameMeta>>,
        lobby: Weak<Lobby>,
        stats: Arc<dyn StatisticsSink>,
    ) -> Self {
        let mut state = GameState::new(game_id, created_at_ms);
        state
            .players
            .push(PlayerState::new(creator_id, creator_name, 0, SeatKind::Human));
        Self {
            state,
            config,
            deal_source,
            outboxes: HashMap::new(),
            analysis_seats: HashSet::new(),
            ai_seats: HashMap::new(),
            meta,
            lobby,
            stats,
            rng: ChaCha12Rng::from_os_rng(),
            reveal_timer: None,
            auto_start_timer: None,
            grace_timers: HashMap::new(),
            abandoned: HashSet::new(),
            deferred: None,
            decision_search: None,
            analysis_search: None,
            stats_recorded: false,
        }
    }

    fn paused(&self) -> bool {
        !self.abandoned.is_empty()
    }

    /// One accepted mutation: bump the version, refresh timestamps and the
    /// lobby's meta record.
    fn touch(&mut self) {
        self.state.version += 1;
        self.state.updated_at_ms = now_ms();
        *self.meta.write() = GameMeta {
            phase: self.state.phase,
            seat_count: self.state.players.len() as u8,
            created_at_ms: self.state.created_at_ms,
        };
    }

    fn send_to(&self, player_id: Uuid, msg: ServerMsg) {
        if let Some(outbox) = self.outboxes.get(&player_id) {
            // Best-effort: a dead session drops the event and the client
            // reconciles with REQUEST_STATE on reconnect.
            outbox.do_send(OutboundEvent(msg));
        }
    }

    fn broadcast(&self, msg: ServerMsg) {
        for outbox in self.outboxes.values() {
            outbox.do_send(OutboundEvent(msg.clone()));
        }
    }

    /// Per-recipient redacted state fan-out.
    fn broadcast_state(&self) {
        for player in &self.state.players {
            if let Some(outbox) = self.outboxes.get(&player.id) {
                let snapshot = snapshot_for(&self.state, Some(player.position));
                outbox.do_send(OutboundEvent(ServerMsg::GameStateUpdate {
                    game_state: snapshot,
                }));
            }
        }
    }

    fn broadcast_waiting(&self) {
        let count = self.state.players.len() as u8;
        let needed = PLAYERS as u8 - count;
        self.broadcast(ServerMsg::GameWaiting {
            game_id: self.state.game_id,
            player_count: count,
            players_needed: needed,
            message: format!("Waiting for {needed} more player(s)"),
        });
    }

    fn send_error(&self, player_id: Uuid, err: &DomainError) {
        self.send_to(
            player_id,
            ServerMsg::Error {
                code: err.code(),
                message: err.to_string(),
            },
        );
    }

    // ----- timers -----

    fn schedule_reveal(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.reveal_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_later(self.config.trick_reveal, |act, ctx| {
            act.reveal_timer = None;
            act.on_reveal_elapsed(ctx);
        });
        self.reveal_timer = Some(handle);
    }

    fn on_reveal_elapsed(&mut self, ctx: &mut Context<Self>) {
        if self.paused() {
            self.deferred = Some(DeferredStep::RevealElapsed);
            return;
        }
        if self.state.phase != Phase::Playing {
            return;
        }
        match advance_trick(&mut self.state) {
            Ok(TrickAdvance::NextTrick { .. }) => {
                self.touch();
                self.broadcast_state();
                self.trigger_searches(ctx);
            }
            Ok(TrickAdvance::RoundOver(result)) => {
                self.touch();
                self.on_round_over(ctx, result);
            }
            Err(err) => self.poison(ctx, err),
        }
    }

    fn schedule_auto_start(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.auto_start_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_later(self.config.round_auto_start, |act, ctx| {
            act.auto_start_timer = None;
            act.on_auto_start(ctx);
        });
        self.auto_start_timer = Some(handle);
    }

    fn on_auto_start(&mut self, ctx: &mut Context<Self>) {
        if self.paused() {
            self.deferred = Some(DeferredStep::AutoStart);
            return;
        }
        if self.state.phase != Phase::RoundOver {
            return;
        }
        if let Err(err) = self.start_next_round(ctx) {
            self.poison(ctx, err);
        }
    }

    fn schedule_grace(&mut self, ctx: &mut Context<Self>, player_id: Uuid) {
        if let Some(handle) = self.grace_timers.remove(&player_id) {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_later(self.config.disconnect_grace, move |act, _ctx| {
            act.grace_timers.remove(&player_id);
            act.on_grace_elapsed(player_id);
        });
        self.grace_timers.insert(player_id, handle);
    }

    fn on_grace_elapsed(&mut self, player_id: Uuid) {
        let still_disconnected = self
            .state
            .players
            .iter()
            .any(|p| p.id == player_id && !p.connected);
        if !still_disconnected {
            return;
        }
        warn!(
            game_id = %self.state.game_id,
            player_id = %player_id,
            "disconnect grace elapsed; pausing game"
        );
        // Policy: hold the table for the missing player. Timers and AI stay
        // quiet until they return.
        self.abandoned.insert(player_id);
        self.cancel_searches();
    }

    fn maybe_resume(&mut self, ctx: &mut Context<Self>) {
        if self.paused() {
            return;
        }
        if let Some(step) = self.deferred.take() {
            match step {
                DeferredStep::RevealElapsed => self.on_reveal_elapsed(ctx),
                DeferredStep::AutoStart => self.on_auto_start(ctx),
            }
        }
        self.trigger_searches(ctx);
    }

    // ----- round flow -----

    fn start_game(&mut self, ctx: &mut Context<Self>) {
        match start_first_round(&mut self.state, self.deal_source.as_mut()) {
            Ok(_) => {
                self.touch();
                self.broadcast_state();
                self.trigger_searches(ctx);
            }
            Err(err) => self.poison(ctx, err),
        }
    }

    fn start_next_round(&mut self, ctx: &mut Context<Self>) -> Result<(), DomainError> {
        if self.state.phase != Phase::RoundOver {
            return Err(DomainError::PhaseMismatch);
        }
        if self.paused() {
            self.deferred = Some(DeferredStep::AutoStart);
            return Ok(());
        }
        if let Some(handle) = self.auto_start_timer.take() {
            ctx.cancel_future(handle);
        }
        deal_next_round(&mut self.state, self.deal_source.as_mut())?;
        self.touch();
        self.broadcast_state();
        self.trigger_searches(ctx);
        Ok(())
    }

    fn on_round_over(&mut self, ctx: &mut Context<Self>, result: RoundResult) {
        self.broadcast_state();
        self.broadcast(ServerMsg::RoundComplete {
            deltas: result.deltas,
            new_round: (!result.game_over).then(|| self.state.round_no + 1),
        });
        if result.game_over {
            self.on_game_over(ctx);
        } else {
            self.schedule_auto_start(ctx);
        }
    }

    fn on_game_over(&mut self, ctx: &mut Context<Self>) {
        self.cancel_searches();
        if !self.stats_recorded {
            self.stats_recorded = true;
            if let Some(winner) = self.state.winner {
                let result = GameResult {
                    game_id: self.state.game_id,
                    rounds_played: self.state.round_no,
                    players: self
                        .state
                        .players
                        .iter()
                        .map(|p| PlayerResult {
                            player_id: p.id,
                            display_name: p.display_name.clone(),
                            position: p.position,
                            score: p.score,
                        })
                        .collect(),
                    winner_position: winner,
                };
                let sink = self.stats.clone();
                actix::spawn(async move {
                    sink.record(result).await;
                });
            }
        }
        // Linger so clients can observe the terminal state, then go away.
        ctx.run_later(self.config.game_over_linger, |act, ctx| {
            act.terminate(ctx);
        });
    }

    fn terminate(&mut self, ctx: &mut Context<Self>) {
        self.cancel_searches();
        if let Some(lobby) = self.lobby.upgrade() {
            lobby.remove(self.state.game_id);
        }
        ctx.stop();
    }

    /// A rule-engine invariant broke: log everything, tell the players, stop.
    fn poison(&mut self, ctx: &mut Context<Self>, err: DomainError) {
        error!(
            game_id = %self.state.game_id,
            error = %err,
            state = ?self.state,
            "game actor poisoned"
        );
        self.broadcast(ServerMsg::Error {
            code: ErrorCode::Internal,
            message: "internal error; game terminated".to_string(),
        });
        self.terminate(ctx);
    }

    // ----- actions -----

    fn handle_action(&mut self, ctx: &mut Context<Self>, player_id: Uuid, action: PlayerAction) {
        let Some(seat) = self.state.seat_of(player_id) else {
            self.send_to(
                player_id,
                ServerMsg::Error {
                    code: ErrorCode::JoinGameFailed,
                    message: DomainError::NotSeated.to_string(),
                },
            );
            return;
        };
        if let Err(err) = self.apply_action(ctx, seat, action) {
            self.send_error(player_id, &err);
        }
    }

    fn apply_action(
        &mut self,
        ctx: &mut Context<Self>,
        seat: Seat,
        action: PlayerAction,
    ) -> Result<(), DomainError> {
        match action {
            PlayerAction::PlaceBid(bid) => {
                let outcome = apply_bid(&mut self.state, seat, bid, self.deal_source.as_mut())?;
                self.touch();
                if let BidOutcome::AllPassed { new_round, .. } = outcome {
                    self.broadcast(ServerMsg::AllPlayersPassed { new_round });
                }
                self.broadcast_state();
                self.trigger_searches(ctx);
            }
            PlayerAction::DeclareTrump(suit) => {
                apply_trump_declaration(&mut self.state, seat, suit)?;
                self.touch();
                self.broadcast_state();
                self.trigger_searches(ctx);
            }
            PlayerAction::FoldDecision(fold) => {
                let outcome = apply_fold_decision(&mut self.state, seat, fold)?;
                self.touch();
                match outcome {
                    FoldOutcome::RoundOver(result) => self.on_round_over(ctx, result),
                    _ => {
                        self.broadcast_state();
                        self.trigger_searches(ctx);
                    }
                }
            }
            PlayerAction::PlayCard(card_id) => {
                let card = card_id
                    .parse()
                    .map_err(|_| DomainError::UnknownCard(card_id.clone()))?;
                let outcome = apply_card_play(&mut self.state, seat, card)?;
                self.touch();
                self.broadcast_state();
                if let PlayOutcome::TrickComplete {
                    winner,
                    trick_number,
                    round_continues,
                } = outcome
                {
                    self.broadcast(ServerMsg::TrickComplete {
                        trick_number,
                        winner_position: winner,
                        next_player_position: round_continues.then_some(winner),
                    });
                    self.schedule_reveal(ctx);
                }
                self.trigger_searches(ctx);
            }
            PlayerAction::StartNextRound => {
                self.start_next_round(ctx)?;
            }
            PlayerAction::RequestState => {
                // Resync, not a mutation.
                if let Some(player) = self.state.player(seat) {
                    self.send_to(
                        player.id,
                        ServerMsg::GameStateUpdate {
                            game_state: snapshot_for(&self.state, Some(seat)),
                        },
                    );
                }
            }
            PlayerAction::Leave => {
                self.handle_leave(ctx, seat);
            }
        }
        Ok(())
    }

    fn handle_leave(&mut self, ctx: &mut Context<Self>, seat: Seat) {
        let Some(player_id) = self.state.player(seat).map(|p| p.id) else {
            return;
        };
        if self.state.phase == Phase::WaitingForPlayers {
            self.state.players.retain(|p| p.id != player_id);
            for (i, player) in self.state.players.iter_mut().enumerate() {
                player.position = i as Seat;
            }
            self.outboxes.remove(&player_id);
            self.analysis_seats.remove(&player_id);
            self.touch();
            if self.state.players.is_empty() {
                self.terminate(ctx);
                return;
            }
            self.broadcast_waiting();
            self.broadcast_state();
        } else {
            // Mid-game leave behaves like a disconnect: the seat is held and
            // the grace clock starts.
            self.mark_disconnected(ctx, player_id);
        }
    }

    fn mark_disconnected(&mut self, ctx: &mut Context<Self>, player_id: Uuid) {
        let Some(seat) = self.state.seat_of(player_id) else {
            return;
        };
        let was_connected = self
            .state
            .player(seat)
            .map(|p| p.connected)
            .unwrap_or(false);
        self.outboxes.remove(&player_id);
        if !was_connected {
            return;
        }
        if let Some(player) = self.state.player_mut(seat) {
            player.connected = false;
        }
        self.touch();
        self.broadcast(ServerMsg::PlayerDisconnected { position: seat });
        self.broadcast_state();
        if self.state.phase != Phase::WaitingForPlayers
            && self.state.phase != Phase::GameOver
        {
            self.schedule_grace(ctx, player_id);
        }
    }

    // ----- AI scheduling -----

    fn cancel_searches(&mut self) {
        if let Some(search) = self.decision_search.take() {
            search.cancel();
        }
        if let Some(search) = self.analysis_search.take() {
            search.cancel();
        }
    }

    fn ai_delay(&mut self) -> Duration {
        let min = self.config.ai_delay_min.as_millis() as u64;
        let max = self.config.ai_delay_max.as_millis() as u64;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(self.rng.random_range(min..=max))
    }

    /// After every mutation: drop stale searches and, when the seat to act is
    /// an AI (or an analysis-subscribed human), launch a fresh one.
    fn trigger_searches(&mut self, ctx: &mut Context<Self>) {
        self.cancel_searches();
        if self.paused() || self.state.phase == Phase::GameOver {
            return;
        }
        let Some(seat) = self.state.seat_to_act() else {
            return;
        };

        if let Some(seat_cfg) = self.ai_seats.get(&seat).cloned() {
            self.spawn_decision_search(ctx, seat, seat_cfg);
        } else if let Some(player) = self.state.player(seat) {
            if self.analysis_seats.contains(&player.id) {
                self.spawn_analysis_search(ctx, seat);
            }
        }
    }

    fn spawn_decision_search(
        &mut self,
        ctx: &mut Context<Self>,
        seat: Seat,
        seat_cfg: AiSeatConfig,
    ) {
        let obs = observe(&self.state, seat);
        let mut config = SearchConfig::new(seat_cfg.iterations, self.rng.random());
        config.character = seat_cfg.character;
        config.time_budget = self.config.ai_time_budget;
        let cancel = Arc::new(AtomicBool::new(false));
        self.decision_search = Some(InFlightSearch {
            cancel: cancel.clone(),
        });
        let version = self.state.version;
        let delay = self.ai_delay();
        let addr = ctx.address();
        let game_id = self.state.game_id;

        actix::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let outcome =
                tokio::task::spawn_blocking(move || search(&obs, &config, &cancel)).await;
            match outcome {
                Ok(Ok(result)) => {
                    addr.do_send(AiDecision {
                        seat,
                        version,
                        action: search_action_to_player_action(result.best),
                    });
                }
                Ok(Err(AiError::Cancelled)) => {}
                Ok(Err(err)) => {
                    warn!(game_id = %game_id, seat, error = %err, "AI search failed");
                }
                Err(err) => {
                    warn!(game_id = %game_id, seat, error = %err, "AI worker panicked");
                }
            }
        });
    }

    fn spawn_analysis_search(&mut self, ctx: &mut Context<Self>, seat: Seat) {
        let Some(analysis_type) = analysis_type_for(self.state.phase) else {
            return;
        };
        let obs = observe(&self.state, seat);
        let config = SearchConfig::new(crate::ai::Difficulty::Hard.iterations(), self.rng.random());
        let cancel = Arc::new(AtomicBool::new(false));
        self.analysis_search = Some(InFlightSearch {
            cancel: cancel.clone(),
        });
        let version = self.state.version;
        let addr = ctx.address();

        actix::spawn(async move {
            let outcome =
                tokio::task::spawn_blocking(move || search(&obs, &config, &cancel)).await;
            if let Ok(Ok(result)) = outcome {
                addr.do_send(AnalysisReady {
                    seat,
                    version,
                    analysis_type,
                    options: result.stats,
                });
            }
        });
    }
}

fn search_action_to_player_action(action: crate::ai::SearchAction) -> PlayerAction {
    use crate::ai::SearchAction;
    match action {
        SearchAction::Bid(bid) => PlayerAction::PlaceBid(bid),
        SearchAction::Trump(suit) => PlayerAction::DeclareTrump(suit),
        SearchAction::Fold(fold) => PlayerAction::FoldDecision(fold),
        SearchAction::Card(card) => PlayerAction::PlayCard(card.to_string()),
    }
}

impl Actor for GameActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(game_id = %self.state.game_id, "game actor started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.cancel_searches();
        info!(game_id = %self.state.game_id, "game actor stopped");
    }
}

impl Handler<Join> for GameActor {
    type Result = Result<(), AppError>;

    fn handle(&mut self, msg: Join, ctx: &mut Self::Context) -> Self::Result {
        if let Some(seat) = self.state.seat_of(msg.player_id) {
            // Re-join: silently rebind the outbox and replay the state.
            self.outboxes.insert(msg.player_id, msg.recipient);
            if msg.analysis {
                self.analysis_seats.insert(msg.player_id);
            } else {
                self.analysis_seats.remove(&msg.player_id);
            }
            if let Some(handle) = self.grace_timers.remove(&msg.player_id) {
                ctx.cancel_future(handle);
            }
            let was_disconnected = self
                .state
                .player(seat)
                .map(|p| !p.connected)
                .unwrap_or(false);
            self.abandoned.remove(&msg.player_id);
            if was_disconnected {
                if let Some(player) = self.state.player_mut(seat) {
                    player.connected = true;
                }
                self.touch();
                self.broadcast(ServerMsg::PlayerReconnected {
                    player_id: msg.player_id,
                });
                self.broadcast_state();
                self.maybe_resume(ctx);
            } else {
                self.send_to(
                    msg.player_id,
                    ServerMsg::GameStateUpdate {
                        game_state: snapshot_for(&self.state, Some(seat)),
                    },
                );
            }
            return Ok(());
        }

        if self.state.phase != Phase::WaitingForPlayers || self.state.is_full() {
            return Err(AppError::conflict(
                ErrorCode::SeatTaken,
                "game is full or already started",
            ));
        }

        let seat = self.state.players.len() as Seat;
        self.state.players.push(PlayerState::new(
            msg.player_id,
            msg.display_name.clone(),
            seat,
            SeatKind::Human,
        ));
        if let Some(player) = self.state.player_mut(seat) {
            player.connected = true;
        }
        self.outboxes.insert(msg.player_id, msg.recipient);
        if msg.analysis {
            self.analysis_seats.insert(msg.player_id);
        }
        self.touch();
        self.broadcast(ServerMsg::PlayerConnected {
            player_id: msg.player_id,
            display_name: msg.display_name,
        });
        self.broadcast_waiting();
        self.broadcast_state();
        if self.state.is_full() {
            self.start_game(ctx);
        }
        Ok(())
    }
}

impl Handler<Act> for GameActor {
    type Result = ();

    fn handle(&mut self, msg: Act, ctx: &mut Self::Context) -> Self::Result {
        self.handle_action(ctx, msg.player_id, msg.action);
    }
}

impl Handler<Disconnected> for GameActor {
    type Result = ();

    fn handle(&mut self, msg: Disconnected, ctx: &mut Self::Context) -> Self::Result {
        self.mark_disconnected(ctx, msg.player_id);
    }
}

impl Handler<GetPublicInfo> for GameActor {
    type Result = MessageResult<GetPublicInfo>;

    fn handle(&mut self, _msg: GetPublicInfo, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(public_info(&self.state))
    }
}

impl Handler<SeatAi> for GameActor {
    type Result = Result<PublicGameInfo, AppError>;

    fn handle(&mut self, msg: SeatAi, ctx: &mut Self::Context) -> Self::Result {
        if self.state.phase != Phase::WaitingForPlayers || self.state.is_full() {
            return Err(AppError::conflict(
                ErrorCode::SeatTaken,
                "game is full or already started",
            ));
        }
        let seat = self.state.players.len() as Seat;
        let ai_id = Uuid::new_v4();
        let name = format!("AI ({})", msg.config.difficulty.label());
        self.state
            .players
            .push(PlayerState::new(ai_id, name.clone(), seat, SeatKind::Ai));
        self.ai_seats.insert(seat, msg.config);
        self.touch();
        self.broadcast(ServerMsg::PlayerConnected {
            player_id: ai_id,
            display_name: name,
        });
        self.broadcast_waiting();
        self.broadcast_state();
        if self.state.is_full() {
            self.start_game(ctx);
        }
        Ok(public_info(&self.state))
    }
}

impl Handler<AiDecision> for GameActor {
    type Result = ();

    fn handle(&mut self, msg: AiDecision, ctx: &mut Self::Context) -> Self::Result {
        // Stale decisions (phase moved on, or the game paused) are discarded.
        if msg.version != self.state.version || self.paused() {
            return;
        }
        self.decision_search = None;
        let Some(player_id) = self.state.player(msg.seat).map(|p| p.id) else {
            return;
        };
        self.handle_action(ctx, player_id, msg.action);
    }
}

impl Handler<AnalysisReady> for GameActor {
    type Result = ();

    fn handle(&mut self, msg: AnalysisReady, _ctx: &mut Self::Context) -> Self::Result {
        if msg.version != self.state.version {
            return;
        }
        self.analysis_search = None;
        let Some(player_id) = self.state.player(msg.seat).map(|p| p.id) else {
            return;
        };
        // Scoped to the requesting seat's personal outbox only.
        self.send_to(
            player_id,
            ServerMsg::AiAnalysisUpdate {
                analysis_type: msg.analysis_type,
                player_position: msg.seat,
                options: msg.options,
            },
        );
    }
}
