pub mod handler;
pub mod rooms;

pub use handler::{route_event, ws_index, RelaySession, Route};
pub use rooms::RoomRegistry;
