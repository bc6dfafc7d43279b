pub mod board_view;
pub mod position;
pub mod state_machine;
pub mod utils;

pub use board_view::{piece_at, BoardGrid, Cell};
pub use position::Position;
pub use state_machine::{Action, GameState, Phase, TransitionKind};
pub use utils::GameStatus;
