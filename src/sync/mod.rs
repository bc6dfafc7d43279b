pub mod channel;
pub mod client;
pub mod transport;

pub use channel::{MoveSyncChannel, OpponentMoveHandler, Subscription};
pub use client::GameClient;
pub use transport::{ChannelTransport, Transport};
