use chess::Square;
use futures::Stream;
use log::{debug, info, warn};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::error::SyncError;
use crate::game::{Action, BoardGrid, GameState, GameStatus, TransitionKind};
use crate::models::{MoveDescriptor, ServerEvent, SessionContext};
use crate::sync::channel::{MoveSyncChannel, Subscription};
use crate::sync::transport::Transport;

/// One player's side of a game: local state wired to the move channel.
///
/// Local drags are applied optimistically and then sent; inbound opponent
/// moves are classified against the local board and applied.
pub struct GameClient<T> {
    state: Rc<RefCell<GameState>>,
    channel: MoveSyncChannel<T>,
    subscription: Option<Subscription>,
}

impl<T: Transport> GameClient<T> {
    pub fn new(session: SessionContext, transport: T) -> Self {
        Self::from_state(GameState::new(session), transport)
    }

    /// Resume a game from a serialized position
    pub fn from_fen(fen: &str, session: SessionContext, transport: T) -> Result<Self, SyncError> {
        Ok(Self::from_state(GameState::from_fen(fen, session)?, transport))
    }

    fn from_state(state: GameState, transport: T) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            channel: MoveSyncChannel::new(transport),
            subscription: None,
        }
    }

    /// Start applying opponent moves. Calling this twice keeps one handler.
    pub fn activate(&mut self) {
        if self.subscription.is_some() {
            return;
        }

        let state = Rc::clone(&self.state);
        let subscription = self.channel.on_opponent_move(move |descriptor| {
            let mut state = state.borrow_mut();
            let action = state.classify(descriptor);
            info!("Opponent played {} ({:?})", descriptor, action);
            state.dispatch(action);
        });
        self.subscription = Some(subscription);
    }

    /// Stop applying opponent moves
    pub fn deactivate(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.channel.off(subscription);
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Ask the relay for our room
    pub fn join(&mut self) -> Result<(), SyncError> {
        let room_id = self.state.borrow().session().room_id().to_string();
        self.channel.join(&room_id)
    }

    pub fn select(&mut self, square: Square) -> bool {
        self.state.borrow_mut().dispatch(Action::Select(square))
    }

    /// Finish a drag from `from` to `to`.
    ///
    /// The drop must land on one of the current hints for the selected
    /// square; otherwise it is discarded and nothing is sent.
    pub fn drag_end(&mut self, from: Square, to: Square) -> Option<TransitionKind> {
        let descriptor = MoveDescriptor::new(from, to);

        let (kind, room_id) = {
            let mut state = self.state.borrow_mut();
            if state.selected() != Some(from) || !state.move_hints().contains(&to) {
                debug!("Discarding drag {}", descriptor);
                return None;
            }

            let action = state.classify(descriptor);
            if !state.dispatch(action) {
                return None;
            }
            (state.last_transition(), state.session().room_id().to_string())
        };

        // Delivery is best effort; the local move stands either way
        if let Err(e) = self.channel.send_move(&room_id, descriptor) {
            warn!("Failed to send {}: {}", descriptor, e);
        }
        kind
    }

    /// Process one inbound frame
    pub fn receive(&mut self, frame: &str) -> Result<Option<ServerEvent>, SyncError> {
        self.channel.receive(frame)
    }

    /// Drain inbound frames until the stream ends
    pub async fn pump<S>(&mut self, inbound: S)
    where
        S: Stream<Item = String> + Unpin,
    {
        self.channel
            .pump(inbound, |event| match event {
                ServerEvent::Error(message) => warn!("Relay error: {}", message),
                other => info!("Session event: {:?}", other),
            })
            .await
    }

    /// Borrow the live state.
    ///
    /// The opponent-move handler writes to the same state, so the guard
    /// must be dropped before calling [`receive`](Self::receive) or
    /// [`pump`](Self::pump); holding it across either panics. Use
    /// [`snapshot`](Self::snapshot) to keep a copy around.
    pub fn state(&self) -> Ref<'_, GameState> {
        self.state.borrow()
    }

    /// Owned copy of the current state, unaffected by later moves
    pub fn snapshot(&self) -> GameState {
        self.state.borrow().clone()
    }

    pub fn board(&self) -> BoardGrid {
        *self.state.borrow().board()
    }

    pub fn last_transition(&self) -> Option<TransitionKind> {
        self.state.borrow().last_transition()
    }

    pub fn status(&self) -> GameStatus {
        self.state.borrow().status()
    }

    pub fn transport(&self) -> &T {
        self.channel.transport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::transport::ChannelTransport;
    use chess::Color;

    fn client(color: Color) -> (GameClient<ChannelTransport>, futures::channel::mpsc::UnboundedReceiver<String>) {
        let (transport, rx) = ChannelTransport::pair();
        (GameClient::new(SessionContext::new("room-7", color), transport), rx)
    }

    #[test]
    fn drag_to_hint_moves_and_sends() {
        let (mut client, mut rx) = client(Color::White);
        client.select(Square::E2);

        assert_eq!(client.drag_end(Square::E2, Square::E4), Some(TransitionKind::Move));
        assert_eq!(
            rx.try_next().unwrap().unwrap(),
            r#"{"event":"move","data":["room-7",{"from":"e2","to":"e4"}]}"#
        );
    }

    #[test]
    fn drag_off_hints_is_discarded() {
        let (mut client, mut rx) = client(Color::White);
        client.select(Square::E2);

        assert_eq!(client.drag_end(Square::E2, Square::E5), None);
        assert_eq!(client.drag_end(Square::D2, Square::D4), None);
        assert_eq!(client.state().selected(), Some(Square::E2));
        assert!(rx.try_next().is_err());
    }

    #[test]
    fn inactive_client_ignores_opponent_moves() {
        let (mut client, _rx) = client(Color::Black);
        let frame = r#"{"event":"opponent-move","data":{"from":"e2","to":"e4"}}"#;

        client.receive(frame).unwrap();
        assert_eq!(client.last_transition(), None);

        client.activate();
        client.activate();
        client.receive(frame).unwrap();
        assert_eq!(client.last_transition(), Some(TransitionKind::Move));
        assert!(client.state().is_my_turn());

        client.deactivate();
        assert!(!client.is_active());
    }

    #[test]
    fn opponent_move_from_empty_square_is_rejected() {
        let (mut client, _rx) = client(Color::Black);
        client.activate();
        let before = client.state().position().fen();

        client
            .receive(r#"{"event":"opponent-move","data":{"from":"e4","to":"e5"}}"#)
            .unwrap();
        assert_eq!(client.state().position().fen(), before);
        assert_eq!(client.last_transition(), None);
    }

    #[test]
    fn snapshot_survives_receive() {
        let (mut client, _rx) = client(Color::Black);
        client.activate();
        let before = client.snapshot();

        client
            .receive(r#"{"event":"opponent-move","data":{"from":"e2","to":"e4"}}"#)
            .unwrap();
        assert!(!before.is_my_turn());
        assert_eq!(before.last_transition(), None);
        assert_ne!(before.position().fen(), client.state().position().fen());
    }

    #[test]
    fn join_emits_room() {
        let (mut client, mut rx) = client(Color::White);
        client.join().unwrap();
        assert_eq!(
            rx.try_next().unwrap().unwrap(),
            r#"{"event":"join","data":{"room_id":"room-7"}}"#
        );
    }
}
