//! Client-side move synchronization for two-player chess.
//!
//! [`game`] holds one player's local state machine, [`sync`] carries moves
//! between peers, and [`websocket`] is the room relay that connects them.

pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod routes;
pub mod sync;
pub mod websocket;

pub use error::SyncError;
pub use game::{Action, GameState, Phase, Position, TransitionKind};
pub use models::{ClientEvent, MoveDescriptor, ServerEvent, SessionContext};
pub use sync::{ChannelTransport, GameClient, MoveSyncChannel, Transport};
