use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::models::{AppState, ClientEvent, RelayFrame, ServerEvent};
use crate::websocket::rooms::RoomRegistry;

/// WebSocket session relaying moves between the members of a room
pub struct RelaySession {
    pub id: String,
    pub app_state: web::Data<AppState>,
}

impl Actor for RelaySession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register the actor with the application state
        let total_sessions = {
            let mut sessions = self.app_state.sessions();
            sessions.insert(self.id.clone(), ctx.address());
            sessions.len()
        };
        info!("WebSocket connection started: {}", self.id);
        info!("Total active sessions: {}", total_sessions);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        for room_id in self.app_state.rooms().leave(&self.id) {
            info!("Removed player {} from room {}", self.id, room_id);
        }

        let total_sessions = {
            let mut sessions = self.app_state.sessions();
            sessions.remove(&self.id);
            sessions.len()
        };
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        Running::Stop
    }
}

impl Handler<RelayFrame> for RelaySession {
    type Result = ();

    fn handle(&mut self, msg: RelayFrame, ctx: &mut Self::Context) {
        info!("Forwarding frame to client {}: {}", self.id, msg.0);
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for RelaySession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                info!("Received text frame: {}", text);
                match serde_json::from_str::<ClientEvent>(text.as_ref()) {
                    Ok(event) => self.handle_event(event, ctx),
                    Err(e) => {
                        warn!("Error parsing client frame: {}", e);
                        reply(ctx, &ServerEvent::Error(format!("Invalid frame: {}", e)));
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                reply(ctx, &ServerEvent::Error("Binary messages are not supported".to_string()));
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl RelaySession {
    pub fn new(app_state: web::Data<AppState>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            app_state,
        }
    }

    pub fn handle_event(&mut self, event: ClientEvent, ctx: &mut ws::WebsocketContext<Self>) {
        let routed = {
            let mut rooms = self.app_state.rooms();
            route_event(&mut rooms, &self.id, event)
        };
        match routed {
            Route::Reply(event) => reply(ctx, &event),
            Route::Forward(peers, event) => self.forward(&peers, &event),
        }
    }

    fn forward(&self, peers: &[String], event: &ServerEvent) {
        // Serialize the frame once
        let frame = match serde_json::to_string(event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Error serializing frame: {}", e);
                return;
            }
        };

        // Copy the addresses out so no lock is held while sending
        let addrs: Vec<_> = {
            let sessions = self.app_state.sessions();
            peers
                .iter()
                .filter_map(|peer| match sessions.get(peer) {
                    Some(addr) => Some(addr.clone()),
                    None => {
                        warn!("Session not found for connection ID: {}", peer);
                        None
                    }
                })
                .collect()
        };

        for addr in addrs {
            addr.do_send(RelayFrame(frame.clone()));
        }
    }
}

/// Where the relay sends the outcome of one client event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Back to the sender only
    Reply(ServerEvent),
    /// To the listed connections
    Forward(Vec<String>, ServerEvent),
}

/// Update room membership for `event` and decide who hears about it.
///
/// Moves are relayed as-is; legality is each client's concern.
pub fn route_event(rooms: &mut RoomRegistry, conn_id: &str, event: ClientEvent) -> Route {
    match event {
        ClientEvent::Join { room_id } => match rooms.join(&room_id, conn_id) {
            Ok(color) => Route::Reply(ServerEvent::Joined { room_id, color }),
            Err(e) => {
                warn!("Player {} cannot join room {}: {}", conn_id, room_id, e);
                Route::Reply(ServerEvent::Error(e.to_string()))
            }
        },
        ClientEvent::Move(room_id, descriptor) => match rooms.peers(&room_id, conn_id) {
            Ok(peers) => Route::Forward(peers, ServerEvent::OpponentMove(descriptor)),
            Err(e) => {
                warn!("Player {} cannot move in room {}: {}", conn_id, room_id, e);
                Route::Reply(ServerEvent::Error(e.to_string()))
            }
        },
    }
}

fn reply(ctx: &mut ws::WebsocketContext<RelaySession>, event: &ServerEvent) {
    match serde_json::to_string(event) {
        Ok(frame) => ctx.text(frame),
        Err(e) => warn!("Error serializing frame: {}", e),
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = RelaySession::new(app_state);
    info!("New WebSocket connection: {}", session.id);
    ws::start(session, &req, stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::v1::test;
    use crate::error::SyncError;
    use crate::models::MoveDescriptor;
    use chess::{Color, Square};

    fn join(rooms: &mut RoomRegistry, conn_id: &str) -> Route {
        let event = ClientEvent::Join { room_id: "r".to_string() };
        route_event(rooms, conn_id, event)
    }

    fn e2e4() -> ClientEvent {
        ClientEvent::Move("r".to_string(), MoveDescriptor::new(Square::E2, Square::E4))
    }

    #[test]
    fn join_replies_with_color() {
        let mut rooms = RoomRegistry::new();
        assert_eq!(
            join(&mut rooms, "a"),
            Route::Reply(ServerEvent::Joined { room_id: "r".to_string(), color: Color::White })
        );
        assert_eq!(
            join(&mut rooms, "b"),
            Route::Reply(ServerEvent::Joined { room_id: "r".to_string(), color: Color::Black })
        );
    }

    #[test]
    fn third_joiner_gets_error_frame() {
        let mut rooms = RoomRegistry::new();
        join(&mut rooms, "a");
        join(&mut rooms, "b");

        let expected = SyncError::RoomFull("r".to_string()).to_string();
        assert_eq!(join(&mut rooms, "c"), Route::Reply(ServerEvent::Error(expected)));
        assert_eq!(rooms.member_count("r"), 2);
    }

    #[test]
    fn move_is_forwarded_to_the_other_member() {
        let mut rooms = RoomRegistry::new();
        join(&mut rooms, "a");
        join(&mut rooms, "b");

        let opponent_move = ServerEvent::OpponentMove(MoveDescriptor::new(Square::E2, Square::E4));
        assert_eq!(
            route_event(&mut rooms, "a", e2e4()),
            Route::Forward(vec!["b".to_string()], opponent_move)
        );
    }

    #[test]
    fn move_alone_in_room_reaches_nobody() {
        let mut rooms = RoomRegistry::new();
        join(&mut rooms, "a");

        match route_event(&mut rooms, "a", e2e4()) {
            Route::Forward(peers, _) => assert!(peers.is_empty()),
            other => panic!("unexpected route {:?}", other),
        }
    }

    #[test]
    fn move_from_outsider_gets_error_frame() {
        let mut rooms = RoomRegistry::new();
        join(&mut rooms, "a");
        join(&mut rooms, "b");

        let expected = SyncError::NotInRoom("r".to_string()).to_string();
        assert_eq!(route_event(&mut rooms, "c", e2e4()), Route::Reply(ServerEvent::Error(expected)));
    }

    #[test]
    fn error_frame_matches_wire_format() {
        let mut rooms = RoomRegistry::new();
        let Route::Reply(event) = route_event(&mut rooms, "c", e2e4()) else {
            panic!("expected a reply");
        };
        let frame = serde_json::to_string(&event).unwrap();
        assert!(frame.starts_with(r#"{"event":"error","data":"#), "{frame}");
    }
}
