//! One authenticated WebSocket session per client.
//!
//! The session validates the bearer token at upgrade, keeps the connection
//! alive with ping/pong, parses `event`-tagged JSON into player actions, and
//! routes them to the owning game actor. Inbound order is preserved into the
//! actor's inbox; outbound events arrive as `OutboundEvent` messages.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ErrorCode;
use crate::extractors::current_user::{resolve_current_user, CurrentUser};
use crate::game::actor::GameActor;
use crate::game::messages::{Act, Disconnected, Join, OutboundEvent, PlayerAction};
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

/// `GET /ws` upgrade endpoint.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let current_user = resolve_current_user(&req)?;
    let conn_id = Uuid::new_v4();
    let session = WsSession::new(conn_id, current_user, app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    user: CurrentUser,
    app_state: web::Data<AppState>,
    /// Games this connection has joined, for routing and disconnect fan-out.
    joined: HashMap<Uuid, Addr<GameActor>>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(conn_id: Uuid, user: CurrentUser, app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id,
            user,
            app_state,
            joined: HashMap::new(),
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound message"),
        }
    }

    fn send_error(
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code,
                message: message.into(),
            },
        );
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    player_id = %actor.user.player_id,
                    "heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn handle_client_msg(&mut self, msg: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        let game_id = msg.game_id();
        match msg {
            ClientMsg::JoinGame { analysis, .. } => {
                let Some(handle) = self.app_state.lobby.get(game_id) else {
                    Self::send_error(ctx, ErrorCode::GameNotFound, "game not found");
                    return;
                };
                let join = Join {
                    player_id: self.user.player_id,
                    display_name: self.user.display_name.clone(),
                    analysis,
                    recipient: ctx.address().recipient::<OutboundEvent>(),
                };
                let addr = handle.addr.clone();
                addr.send(join)
                    .into_actor(self)
                    .map(move |res, actor, ctx| match res {
                        Ok(Ok(())) => {
                            actor.joined.insert(game_id, addr);
                        }
                        Ok(Err(err)) => {
                            Self::send_error(ctx, err.code(), err.to_string());
                        }
                        Err(err) => {
                            warn!(game_id = %game_id, error = %err, "join delivery failed");
                            Self::send_error(ctx, ErrorCode::Internal, "join failed");
                        }
                    })
                    .wait(ctx);
            }
            other => {
                let action = match other {
                    ClientMsg::PlaceBid { amount, .. } => PlayerAction::PlaceBid(amount),
                    ClientMsg::DeclareTrump { trump_suit, .. } => {
                        PlayerAction::DeclareTrump(trump_suit)
                    }
                    ClientMsg::FoldDecision { folded, .. } => PlayerAction::FoldDecision(folded),
                    ClientMsg::PlayCard { card_id, .. } => PlayerAction::PlayCard(card_id),
                    ClientMsg::StartNextRound { .. } => PlayerAction::StartNextRound,
                    ClientMsg::RequestState { .. } => PlayerAction::RequestState,
                    ClientMsg::LeaveGame { .. } => PlayerAction::Leave,
                    ClientMsg::JoinGame { .. } => return,
                };
                let addr = self
                    .joined
                    .get(&game_id)
                    .cloned()
                    .or_else(|| self.app_state.lobby.get(game_id).map(|h| h.addr));
                match addr {
                    Some(addr) => {
                        if matches!(action, PlayerAction::Leave) {
                            self.joined.remove(&game_id);
                        }
                        addr.do_send(Act {
                            player_id: self.user.player_id,
                            action,
                        });
                    }
                    None => Self::send_error(ctx, ErrorCode::GameNotFound, "game not found"),
                }
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            player_id = %self.user.player_id,
            "websocket session started"
        );
        self.app_state
            .connections
            .register(self.user.player_id, self.conn_id, ctx.address());
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        // Only the latest connection speaks for the player; a session
        // replaced by a reconnect must not mark them disconnected.
        let registry = &self.app_state.connections;
        if registry.is_current(self.user.player_id, self.conn_id) {
            registry.unregister(self.user.player_id, self.conn_id);
            for addr in self.joined.values() {
                addr.do_send(Disconnected {
                    player_id: self.user.player_id,
                });
            }
        }
        info!(
            conn_id = %self.conn_id,
            player_id = %self.user.player_id,
            "websocket session stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.handle_client_msg(cmd, ctx),
                    Err(err) => {
                        Self::send_error(
                            ctx,
                            ErrorCode::BadRequest,
                            format!("malformed message: {err}"),
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_error(ctx, ErrorCode::BadRequest, "binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    player_id = %self.user.player_id,
                    error = %err,
                    "websocket protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<OutboundEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: OutboundEvent, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}

impl Handler<Shutdown> for WsSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
        ctx.stop();
    }
}
