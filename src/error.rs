use chess::Square;
use thiserror::Error;

use crate::models::MoveDescriptor;

/// Errors raised by the sync core and the relay.
///
/// None of these are fatal: callers log them and leave local state as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// An inbound descriptor names a source square with no piece on it.
    #[error("no piece on source square {0}")]
    EmptySource(Square),

    /// The rules engine refused to play the move.
    #[error("move {0} cannot be played in this position")]
    UnplayableMove(MoveDescriptor),

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("transport closed")]
    TransportClosed,

    #[error("room {0} is full")]
    RoomFull(String),

    #[error("not a member of room {0}")]
    NotInRoom(String),
}
