use chess::{Board, BoardStatus, Color, File, Piece, Rank, Square};

use crate::error::SyncError;

/// Convert a chess color to its wire name
pub fn color_to_string(color: Color) -> String {
    match color {
        Color::White => "white".to_string(),
        Color::Black => "black".to_string(),
    }
}

/// Parse a wire color name
pub fn parse_color(raw: &str) -> Result<Color, SyncError> {
    match raw {
        "white" => Ok(Color::White),
        "black" => Ok(Color::Black),
        _ => Err(SyncError::InvalidColor(raw.to_string())),
    }
}

/// Parse a lowercase file-rank square name such as `e4`.
///
/// Anything that is not exactly one file letter `a..h` followed by one rank
/// digit `1..8` is rejected.
pub fn parse_square(raw: &str) -> Result<Square, SyncError> {
    match raw.as_bytes() {
        [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Square::make_square(
            Rank::from_index((rank - b'1') as usize),
            File::from_index((file - b'a') as usize),
        )),
        _ => Err(SyncError::InvalidSquare(raw.to_string())),
    }
}

/// Status of a position, for the feedback collaborator picking a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::InsufficientMaterial
        )
    }
}

/// Get the status of a position
pub fn game_status(board: &Board) -> GameStatus {
    match board.status() {
        BoardStatus::Checkmate => GameStatus::Checkmate,
        BoardStatus::Stalemate => GameStatus::Stalemate,
        BoardStatus::Ongoing if has_insufficient_material(board) => {
            GameStatus::InsufficientMaterial
        }
        BoardStatus::Ongoing if board.checkers().popcnt() > 0 => GameStatus::Check,
        BoardStatus::Ongoing => GameStatus::Ongoing,
    }
}

/// Check if neither side has enough material left to checkmate.
///
/// Covers K v K, K+minor v K, and K+B v K+B with both bishops on the same
/// square color.
pub fn has_insufficient_material(board: &Board) -> bool {
    let mut minors = Vec::new();

    for rank in 0..8 {
        for file in 0..8 {
            let square = Square::make_square(Rank::from_index(rank), File::from_index(file));
            match board.piece_on(square) {
                None | Some(Piece::King) => {}
                Some(Piece::Pawn) | Some(Piece::Rook) | Some(Piece::Queen) => return false,
                Some(piece) => minors.push((piece, board.color_on(square), (rank + file) % 2)),
            }
        }
    }

    match minors.as_slice() {
        [] | [_] => true,
        [(Piece::Bishop, first_color, first_shade), (Piece::Bishop, second_color, second_shade)] => {
            first_color != second_color && first_shade == second_shade
        }
        _ => false,
    }
}
