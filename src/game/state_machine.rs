use chess::{Color, Square};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::SyncError;
use crate::game::board_view::BoardGrid;
use crate::game::position::Position;
use crate::game::utils::GameStatus;
use crate::models::{MoveDescriptor, SessionContext};

/// Selection phase of the local player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selected,
}

/// Kind of the last applied transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Move,
    Capture,
}

/// Inputs to [`GameState::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select(Square),
    Move(MoveDescriptor),
    Capture(MoveDescriptor),
}

/// One player's local copy of the game.
#[derive(Debug, Clone)]
pub struct GameState {
    position: Arc<Position>,
    session: SessionContext,
    selected: Option<Square>,
    move_hints: BTreeSet<Square>,
    board: BoardGrid,
    last_transition: Option<TransitionKind>,
}

impl GameState {
    /// Fresh game from the standard starting position
    pub fn new(session: SessionContext) -> Self {
        let position = Position::start(session.my_color());
        Self::with_position(position, session)
    }

    /// Resume from a serialized position
    pub fn from_fen(fen: &str, session: SessionContext) -> Result<Self, SyncError> {
        let position = Position::new(fen, session.my_color())?;
        Ok(Self::with_position(position, session))
    }

    fn with_position(position: Position, session: SessionContext) -> Self {
        let board = position.get_board(session.my_color());
        Self {
            position: Arc::new(position),
            session,
            selected: None,
            move_hints: BTreeSet::new(),
            board,
            last_transition: None,
        }
    }

    /// Current position; older handles stay valid after transitions
    pub fn position(&self) -> &Arc<Position> {
        &self.position
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn local_color(&self) -> Color {
        self.session.my_color()
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn move_hints(&self) -> &BTreeSet<Square> {
        &self.move_hints
    }

    /// Board oriented for the local player
    pub fn board(&self) -> &BoardGrid {
        &self.board
    }

    pub fn last_transition(&self) -> Option<TransitionKind> {
        self.last_transition
    }

    pub fn status(&self) -> GameStatus {
        self.position.status()
    }

    pub fn phase(&self) -> Phase {
        if self.selected.is_some() {
            Phase::Selected
        } else {
            Phase::Idle
        }
    }

    pub fn is_my_turn(&self) -> bool {
        self.position.turn() == self.local_color()
    }

    /// Decide Move vs Capture from what currently stands on `to`
    pub fn classify(&self, descriptor: MoveDescriptor) -> Action {
        if self.position.get(descriptor.to).is_some() {
            Action::Capture(descriptor)
        } else {
            Action::Move(descriptor)
        }
    }

    /// Apply one action. Returns whether the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Select(square) => self.select(square),
            Action::Move(descriptor) => self.try_apply(descriptor, TransitionKind::Move),
            Action::Capture(descriptor) => self.try_apply(descriptor, TransitionKind::Capture),
        }
    }

    /// Select one of our own pieces and compute its hints.
    ///
    /// Out of turn this does nothing. On our turn, picking an empty or
    /// opposing square, or a piece with no legal moves, drops any current
    /// selection and returns to idle.
    pub fn select(&mut self, square: Square) -> bool {
        if !self.is_my_turn() {
            debug!("Ignoring selection of {} out of turn", square);
            return false;
        }

        match self.position.get(square) {
            Some((_, owner)) if owner == self.local_color() => {}
            _ => {
                debug!("Selection of {} is not our piece", square);
                return self.clear_selection();
            }
        }

        let hints = self.position.get_moves(square);
        if hints.is_empty() {
            debug!("Selection of {} has no legal moves", square);
            return self.clear_selection();
        }

        self.selected = Some(square);
        self.move_hints = hints;
        true
    }

    // Returns whether there was a selection to drop
    fn clear_selection(&mut self) -> bool {
        self.move_hints.clear();
        self.selected.take().is_some()
    }

    /// Play a move or capture on a fresh position.
    ///
    /// On error nothing is changed.
    pub fn apply(&mut self, descriptor: MoveDescriptor, kind: TransitionKind) -> Result<(), SyncError> {
        let next = self.position.make_move(descriptor)?;
        info!("Applied {:?} {} as {:?}", kind, descriptor, self.local_color());

        self.board = next.get_board(self.local_color());
        self.position = Arc::new(next);
        self.selected = None;
        self.move_hints.clear();
        self.last_transition = Some(kind);
        Ok(())
    }

    fn try_apply(&mut self, descriptor: MoveDescriptor, kind: TransitionKind) -> bool {
        match self.apply(descriptor, kind) {
            Ok(()) => true,
            Err(e) => {
                warn!("Rejected {:?} {}: {}", kind, descriptor, e);
                false
            }
        }
    }
}
