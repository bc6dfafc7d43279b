use futures::{Stream, StreamExt};
use log::{debug, info, warn};

use crate::error::SyncError;
use crate::models::{ClientEvent, MoveDescriptor, ServerEvent};
use crate::sync::transport::Transport;

/// Callback receiving inbound opponent moves
pub type OpponentMoveHandler = Box<dyn FnMut(MoveDescriptor)>;

/// Handle returned by [`MoveSyncChannel::on_opponent_move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// Bidirectional move channel for one game session.
///
/// At most one opponent-move handler is live at a time; registering a new
/// one replaces the previous.
pub struct MoveSyncChannel<T> {
    transport: T,
    handler: Option<(Subscription, OpponentMoveHandler)>,
    next_subscription: u64,
}

impl<T: Transport> MoveSyncChannel<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            handler: None,
            next_subscription: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask the relay to put this connection in `room_id`
    pub fn join(&mut self, room_id: &str) -> Result<(), SyncError> {
        info!("Joining room {}", room_id);
        self.transport.emit(&ClientEvent::Join {
            room_id: room_id.to_string(),
        })
    }

    /// Emit `move(room_id, descriptor)`
    pub fn send_move(&mut self, room_id: &str, descriptor: MoveDescriptor) -> Result<(), SyncError> {
        info!("Sending move {} to room {}", descriptor, room_id);
        self.transport
            .emit(&ClientEvent::Move(room_id.to_string(), descriptor))
    }

    pub fn on_opponent_move<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(MoveDescriptor) + 'static,
    {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;

        let handler: OpponentMoveHandler = Box::new(handler);
        if let Some((previous, _)) = self.handler.replace((subscription, handler)) {
            debug!("Handler {:?} replaced by {:?}", previous, subscription);
        }
        subscription
    }

    /// Deregister `subscription`. Stale handles are ignored.
    pub fn off(&mut self, subscription: Subscription) -> bool {
        match &self.handler {
            Some((live, _)) if *live == subscription => {
                self.handler = None;
                true
            }
            _ => false,
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Process one inbound frame.
    ///
    /// Opponent moves go to the handler and yield `None`; session frames are
    /// returned to the caller.
    pub fn receive(&mut self, frame: &str) -> Result<Option<ServerEvent>, SyncError> {
        let event = serde_json::from_str::<ServerEvent>(frame).map_err(|e| {
            warn!("Error parsing server frame: {}", e);
            SyncError::MalformedFrame(e.to_string())
        })?;

        match event {
            ServerEvent::OpponentMove(descriptor) => {
                match self.handler.as_mut() {
                    Some((_, handler)) => handler(descriptor),
                    None => debug!("No handler registered, dropping {}", descriptor),
                }
                Ok(None)
            }
            other => Ok(Some(other)),
        }
    }

    /// Drain `inbound` one frame at a time until it ends.
    ///
    /// Session frames are passed to `on_session`; malformed frames are
    /// logged and skipped.
    pub async fn pump<S, F>(&mut self, mut inbound: S, mut on_session: F)
    where
        S: Stream<Item = String> + Unpin,
        F: FnMut(ServerEvent),
    {
        while let Some(frame) = inbound.next().await {
            match self.receive(&frame) {
                Ok(Some(event)) => on_session(event),
                Ok(None) => {}
                Err(e) => warn!("Skipping frame: {}", e),
            }
        }
        info!("Inbound stream closed");
    }
}
