use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::SyncError;
use crate::models::ClientEvent;

/// Outbound side of the room-scoped channel.
pub trait Transport {
    /// Hand one frame to the network. Does not wait for any acknowledgement.
    fn emit(&mut self, event: &ClientEvent) -> Result<(), SyncError>;
}

/// Transport that writes serialized frames into an in-memory queue.
///
/// The receiving half is typically drained by a websocket writer, or by a
/// relay in tests.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: UnboundedSender<String>,
}

impl ChannelTransport {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Transport plus the queue its frames land in
    pub fn pair() -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded();
        (Self::new(tx), rx)
    }
}

impl Transport for ChannelTransport {
    fn emit(&mut self, event: &ClientEvent) -> Result<(), SyncError> {
        let frame =
            serde_json::to_string(event).map_err(|e| SyncError::MalformedFrame(e.to_string()))?;
        self.tx
            .unbounded_send(frame)
            .map_err(|_| SyncError::TransportClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MoveDescriptor;
    use chess::Square;

    #[test]
    fn emits_json_frames() {
        let (mut transport, mut rx) = ChannelTransport::pair();
        let event = ClientEvent::Move("r".to_string(), MoveDescriptor::new(Square::E2, Square::E4));
        transport.emit(&event).unwrap();

        let frame = rx.try_next().unwrap().unwrap();
        assert_eq!(serde_json::from_str::<ClientEvent>(&frame).unwrap(), event);
    }

    #[test]
    fn reports_closed_queue() {
        let (mut transport, rx) = ChannelTransport::pair();
        drop(rx);
        let event = ClientEvent::Join {
            room_id: "r".to_string(),
        };
        assert_eq!(transport.emit(&event), Err(SyncError::TransportClosed));
    }
}
