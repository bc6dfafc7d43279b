use chess::{Color, File, Piece, Rank, Square};

use crate::game::position::Position;

/// One cell of a rendered board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub square: Square,
    pub piece: Option<(Piece, Color)>,
}

/// Rows of cells, nearest row to the viewer last
pub type BoardGrid = [[Cell; 8]; 8];

/// Lay out `position` for `perspective`.
///
/// White sees rank 8 in the first row and rank 1 in the last; Black gets the
/// same rows in reverse order. Files always run a to h within a row.
pub fn oriented_grid(position: &Position, perspective: Color) -> BoardGrid {
    std::array::from_fn(|row| {
        let rank = match perspective {
            Color::White => 7 - row,
            Color::Black => row,
        };
        std::array::from_fn(|file| {
            let square = Square::make_square(Rank::from_index(rank), File::from_index(file));
            Cell {
                square,
                piece: position.get(square),
            }
        })
    })
}

/// Find the piece shown on `square` in a grid
pub fn piece_at(grid: &BoardGrid, square: Square) -> Option<(Piece, Color)> {
    grid.iter()
        .flatten()
        .find(|cell| cell.square == square)
        .and_then(|cell| cell.piece)
}
