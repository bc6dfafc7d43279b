use chess::{Board, ChessMove, Color, MoveGen, Piece, Square};
use log::debug;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::SyncError;
use crate::game::board_view::{oriented_grid, BoardGrid};
use crate::game::utils::{game_status, GameStatus};
use crate::models::MoveDescriptor;

/// A chess position plus the color of the player holding it.
///
/// Positions are never mutated: playing a move returns a fresh position
/// rebuilt from this one's FEN, so anyone still holding the old value keeps
/// a consistent view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    color: Color,
}

impl Position {
    /// Build a position from its FEN and the declared local color
    pub fn new(fen: &str, color: Color) -> Result<Self, SyncError> {
        let board = Board::from_str(fen).map_err(|e| SyncError::InvalidFen(format!("{fen}: {e}")))?;
        Ok(Self { board, color })
    }

    /// Standard starting position
    pub fn start(color: Color) -> Self {
        Self {
            board: Board::default(),
            color,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Side to move
    pub fn turn(&self) -> Color {
        self.board.side_to_move()
    }

    /// Piece and owner on a square, if any
    pub fn get(&self, square: Square) -> Option<(Piece, Color)> {
        let piece = self.board.piece_on(square)?;
        let color = self.board.color_on(square)?;
        Some((piece, color))
    }

    /// Legal destinations for the piece on `square`.
    ///
    /// Empty when the square is empty or holds a piece of the side not to move.
    pub fn get_moves(&self, square: Square) -> BTreeSet<Square> {
        MoveGen::new_legal(&self.board)
            .filter(|chess_move| chess_move.get_source() == square)
            .map(|chess_move| chess_move.get_dest())
            .collect()
    }

    /// Canonical serialization
    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    pub fn status(&self) -> GameStatus {
        game_status(&self.board)
    }

    /// Oriented 8x8 view for `perspective`
    pub fn get_board(&self, perspective: Color) -> BoardGrid {
        oriented_grid(self, perspective)
    }

    /// Play `descriptor` and return the resulting position.
    ///
    /// The move is replayed against a position parsed back from this one's
    /// FEN. Turn ownership is not checked here, but the engine only plays
    /// moves that are legal for the side to move, so anything else is
    /// refused and `self` is untouched.
    pub fn make_move(&self, descriptor: MoveDescriptor) -> Result<Position, SyncError> {
        if self.get(descriptor.from).is_none() {
            return Err(SyncError::EmptySource(descriptor.from));
        }

        let replay = Position::new(&self.fen(), self.color)?;
        let chess_move = replay.resolve(descriptor)?;
        debug!("Playing {} from {}", chess_move, replay.fen());

        Ok(Position {
            board: replay.board.make_move_new(chess_move),
            color: self.color,
        })
    }

    // The wire has no promotion field, so every peer promotes to a queen.
    fn resolve(&self, descriptor: MoveDescriptor) -> Result<ChessMove, SyncError> {
        let mut fallback = None;
        for chess_move in MoveGen::new_legal(&self.board) {
            if chess_move.get_source() != descriptor.from || chess_move.get_dest() != descriptor.to {
                continue;
            }
            match chess_move.get_promotion() {
                None | Some(Piece::Queen) => return Ok(chess_move),
                Some(_) => {
                    fallback.get_or_insert(chess_move);
                }
            }
        }
        fallback.ok_or(SyncError::UnplayableMove(descriptor))
    }
}
