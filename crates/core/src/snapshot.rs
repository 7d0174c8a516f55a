//! Snapshot module - read-only projection of a session for views

use arrayvec::ArrayVec;

use crate::board::{Board, MAX_PIECE_CELLS};
use crate::types::{PieceKind, NEXT_PREVIEW};

/// Everything a view needs to draw one frame
///
/// `board` already has the active piece drawn in; `ghost` is empty unless the
/// session is playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub ghost: ArrayVec<(i8, i8), MAX_PIECE_CELLS>,
    pub active_kind: PieceKind,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next_queue: ArrayVec<PieceKind, NEXT_PREVIEW>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// True if `(x, y)` is a ghost cell not covered by the board
    pub fn is_ghost_at(&self, x: i8, y: i8) -> bool {
        self.ghost.contains(&(x, y)) && !self.board.is_occupied(x, y)
    }
}
