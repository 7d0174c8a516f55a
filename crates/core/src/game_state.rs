//! Game state module - the session reducer
//!
//! Ties together board, placement, sequencing and scoring. A session is a
//! plain value: [`GameState::next_state`] maps a state and an action to the
//! next state (or `None` when the action is absorbed), and
//! [`GameState::apply_action`] commits that result in place.
//!
//! Gating rules:
//! - `Reset` is always applied.
//! - After game over nothing else is.
//! - While paused only `Start`, `TogglePause` and `Reset` are.

use arrayvec::ArrayVec;
use std::time::Duration;

use crate::bag::PieceQueue;
use crate::board::{Board, MAX_PIECE_CELLS};
use crate::placement::{self, can_place, drop_to_rest, spawn_piece, try_move, try_rotate, ActivePiece};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::{calculate_drop_score, calculate_level, calculate_line_score, drop_interval};
use crate::snapshot::GameSnapshot;
use crate::types::{GameAction, PieceKind, NEXT_PREVIEW, QUEUE_LOOKAHEAD, START_LEVEL};

/// Complete session state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState<R = SimpleRng> {
    rng: R,
    board: Board,
    active: ActivePiece,
    queue: PieceQueue,
    hold: Option<PieceKind>,
    can_hold: bool,
    score: u32,
    level: u32,
    lines: u32,
    paused: bool,
    game_over: bool,
}

impl GameState<SimpleRng> {
    /// Create a new game with the given LCG seed
    pub fn with_seed(seed: u32) -> Self {
        Self::new(SimpleRng::new(seed))
    }
}

impl Default for GameState<SimpleRng> {
    fn default() -> Self {
        Self::with_seed(1)
    }
}

impl<R: RandomSource + Clone> GameState<R> {
    /// A fresh, paused session drawing its pieces from `rng`
    pub fn new(mut rng: R) -> Self {
        let mut queue = PieceQueue::filled(&mut rng);
        let first = queue.take_next(&mut rng);
        queue.ensure_lookahead(&mut rng, QUEUE_LOOKAHEAD);

        Self {
            rng,
            board: Board::new(),
            active: spawn_piece(first),
            queue,
            hold: None,
            can_hold: true,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            paused: true,
            game_over: false,
        }
    }

    /// The state after `action`, or `None` if the action has no effect
    pub fn next_state(&self, action: GameAction) -> Option<Self> {
        match action {
            GameAction::Reset => Some(Self::new(self.rng.clone())),
            _ if self.game_over => None,
            GameAction::Start => self.paused.then(|| Self {
                paused: false,
                ..self.clone()
            }),
            GameAction::TogglePause => Some(Self {
                paused: !self.paused,
                ..self.clone()
            }),
            _ if self.paused => None,
            GameAction::Move { dx, dy } => {
                try_move(&self.board, &self.active, dx, dy).map(|active| self.with_active(active))
            }
            GameAction::Rotate(direction) => {
                try_rotate(&self.board, &self.active, direction).map(|active| self.with_active(active))
            }
            GameAction::SoftDrop => Some(self.step_down(true)),
            GameAction::Tick => Some(self.step_down(false)),
            GameAction::HardDrop => Some(self.hard_drop()),
            GameAction::Hold => self.hold(),
        }
    }

    /// Apply a game action, returning whether the state changed
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match self.next_state(action) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }

    fn with_active(&self, active: ActivePiece) -> Self {
        Self {
            active,
            ..self.clone()
        }
    }

    /// Shared by soft drop and gravity: fall one row, or lock when blocked
    fn step_down(&self, scored: bool) -> Self {
        match try_move(&self.board, &self.active, 0, 1) {
            Some(active) => {
                let mut next = self.with_active(active);
                if scored {
                    next.score = next.score.saturating_add(calculate_drop_score(1, false));
                }
                next
            }
            None => {
                let mut next = self.clone();
                next.lock_and_spawn();
                next
            }
        }
    }

    fn hard_drop(&self) -> Self {
        let (rest, rows) = drop_to_rest(&self.board, &self.active);
        let mut next = self.with_active(rest);
        next.score = next.score.saturating_add(calculate_drop_score(rows, true));
        next.lock_and_spawn();
        next
    }

    /// Store the active kind; bring in the held kind, or the next queued one
    fn hold(&self) -> Option<Self> {
        if !self.can_hold {
            return None;
        }

        let mut next = self.clone();
        let incoming = match self.hold {
            Some(held) => held,
            None => next.draw(),
        };
        next.hold = Some(self.active.kind);
        next.can_hold = false;
        next.spawn(incoming);
        Some(next)
    }

    /// Merge, clear, score, then bring in the next piece
    fn lock_and_spawn(&mut self) {
        let merged = self.board.merge(&self.active.cells());
        let (board, cleared) = merged.clear_lines();

        // Score with the level in effect before this clear.
        self.score = self
            .score
            .saturating_add(calculate_line_score(cleared, self.level));
        self.lines = self.lines.saturating_add(cleared as u32);
        self.level = calculate_level(self.lines).max(self.level);
        self.board = board;

        let kind = self.draw();
        self.can_hold = true;
        self.spawn(kind);
    }

    fn draw(&mut self) -> PieceKind {
        let kind = self.queue.take_next(&mut self.rng);
        self.queue.ensure_lookahead(&mut self.rng, QUEUE_LOOKAHEAD);
        kind
    }

    /// Make `kind` the active piece at spawn; a blocked spawn ends the game
    fn spawn(&mut self, kind: PieceKind) {
        self.active = spawn_piece(kind);
        if !can_place(&self.board, &self.active) {
            self.game_over = true;
            self.paused = true;
        }
    }
}

impl<R> GameState<R> {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &ActivePiece {
        &self.active
    }

    pub fn active_kind(&self) -> PieceKind {
        self.active.kind
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Neither paused nor over: the state in which gravity should run
    pub fn is_playing(&self) -> bool {
        !self.paused && !self.game_over
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Upcoming kinds for display (the first three)
    pub fn next_queue(&self) -> ArrayVec<PieceKind, NEXT_PREVIEW> {
        self.queue.preview().collect()
    }

    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    /// Locked cells with the active piece drawn on top (not merged)
    pub fn display_board(&self) -> Board {
        self.board.merge(&self.active.cells())
    }

    /// Where the active piece would come to rest
    pub fn ghost_cells(&self) -> ArrayVec<(i8, i8), MAX_PIECE_CELLS> {
        placement::ghost_cells(&self.board, &self.active)
    }

    /// Gravity interval the host should schedule ticks at
    pub fn drop_interval(&self) -> Duration {
        drop_interval(self.level)
    }

    /// Read-only projection for presentation
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.display_board(),
            ghost: if self.is_playing() {
                self.ghost_cells()
            } else {
                ArrayVec::new()
            },
            active_kind: self.active.kind,
            hold: self.hold,
            can_hold: self.can_hold,
            next_queue: self.next_queue(),
            score: self.score,
            level: self.level,
            lines: self.lines,
            paused: self.paused,
            game_over: self.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rotate_cw;
    use crate::types::{Rotation, RotationDirection};

    fn playing_with(kind: PieceKind, board: Board) -> GameState {
        let mut state = GameState::with_seed(12345);
        state.board = board;
        state.active = spawn_piece(kind);
        state.paused = false;
        state
    }

    /// Row 0 blocks every spawn but no row is full
    fn spawn_blocked_board() -> Board {
        let mut board = Board::new();
        for x in 3..7 {
            board.set(x, 0, Some(PieceKind::Z));
        }
        board
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::with_seed(12345);

        assert!(state.paused);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert!(state.hold.is_none());
        assert!(state.can_hold);
        assert!(state.queue.len() >= QUEUE_LOOKAHEAD);
        assert_eq!(state.next_queue().len(), NEXT_PREVIEW);
        assert_eq!((state.active.x, state.active.y), (3, -1));
        assert_eq!(state.board, Board::new());
    }

    #[test]
    fn same_seed_same_session() {
        let a = GameState::with_seed(99);
        let b = GameState::with_seed(99);
        assert_eq!(a, b);
    }

    #[test]
    fn mutating_actions_are_absorbed_while_paused() {
        let state = GameState::with_seed(1);
        for action in [
            GameAction::MOVE_LEFT,
            GameAction::Rotate(RotationDirection::Cw),
            GameAction::SoftDrop,
            GameAction::Tick,
            GameAction::HardDrop,
            GameAction::Hold,
        ] {
            assert!(state.next_state(action).is_none(), "{action:?}");
        }
    }

    #[test]
    fn start_unpauses_once() {
        let mut state = GameState::with_seed(1);
        assert!(state.apply_action(GameAction::Start));
        assert!(!state.paused);
        assert!(!state.apply_action(GameAction::Start));
    }

    #[test]
    fn toggle_pause_flips() {
        let mut state = GameState::with_seed(1);
        assert!(state.apply_action(GameAction::TogglePause));
        assert!(!state.paused);
        assert!(state.apply_action(GameAction::TogglePause));
        assert!(state.paused);
    }

    #[test]
    fn blocked_move_is_absorbed() {
        let mut state = playing_with(PieceKind::T, Board::new());
        for _ in 0..3 {
            assert!(state.apply_action(GameAction::MOVE_LEFT));
        }
        assert!(!state.apply_action(GameAction::MOVE_LEFT));
        assert_eq!(state.active.x, 0);
    }

    #[test]
    fn rotate_replaces_active() {
        let mut state = playing_with(PieceKind::T, Board::new());
        assert!(state.apply_action(GameAction::Rotate(RotationDirection::Cw)));
        assert_eq!(state.active.rotation, Rotation::East);
        assert_eq!(state.active.matrix, rotate_cw(&spawn_piece(PieceKind::T).matrix));
    }

    #[test]
    fn soft_drop_scores_and_tick_does_not() {
        let mut state = playing_with(PieceKind::T, Board::new());
        assert!(state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.score, 1);
        assert_eq!(state.active.y, 0);

        assert!(state.apply_action(GameAction::Tick));
        assert_eq!(state.score, 1);
        assert_eq!(state.active.y, 1);
    }

    #[test]
    fn hard_drop_i_on_empty_board() {
        let mut state = playing_with(PieceKind::I, Board::new());
        let expected_next = state.queue.iter().next();

        assert!(state.apply_action(GameAction::HardDrop));

        // 19 rows from y = -1 to y = 18, 2 points each.
        assert_eq!(state.score, 38);
        assert_eq!(state.lines, 0);
        assert_eq!(state.level, 1);
        for x in 0..10 {
            let expected = (3..7).contains(&x).then_some(PieceKind::I);
            assert_eq!(state.board.get(x, 19), Some(expected), "column {x}");
        }
        assert_eq!(state.board.cells().iter().filter(|c| c.is_some()).count(), 4);
        assert_eq!(Some(state.active.kind), expected_next);
        assert_eq!((state.active.x, state.active.y), (3, -1));
        assert!(!state.game_over);
    }

    /// Vertical I dropped into the single gap of an otherwise full bottom row
    fn drop_vertical_i_into_gap(state: &mut GameState) {
        assert!(state.apply_action(GameAction::Rotate(RotationDirection::Cw)));
        for _ in 0..5 {
            assert!(state.apply_action(GameAction::MOVE_LEFT));
        }
        assert!(!state.apply_action(GameAction::MOVE_LEFT));
        assert!(state.apply_action(GameAction::HardDrop));
    }

    #[test]
    fn vertical_i_completes_a_row() {
        let mut state = playing_with(PieceKind::I, Board::from_rows(&[".ZZZZZZZZZ"]));
        drop_vertical_i_into_gap(&mut state);

        // 17 rows of hard drop plus a single at level 1.
        assert_eq!(state.score, 34 + 100);
        assert_eq!(state.lines, 1);
        assert_eq!(state.level, 1);
        for y in 17..20 {
            assert_eq!(state.board.get(0, y), Some(Some(PieceKind::I)));
        }
        assert_eq!(state.board.cells().iter().filter(|c| c.is_some()).count(), 3);
    }

    #[test]
    fn clear_is_scored_at_level_before_level_up() {
        let mut state = playing_with(PieceKind::I, Board::from_rows(&[".ZZZZZZZZZ"]));
        state.lines = 19;
        state.level = 2;
        drop_vertical_i_into_gap(&mut state);

        assert_eq!(state.score, 34 + 200);
        assert_eq!(state.lines, 20);
        assert_eq!(state.level, 3);
    }

    #[test]
    fn soft_drop_on_resting_piece_locks_without_points() {
        let mut state = playing_with(PieceKind::O, Board::new());
        state.active = state.active.shifted(0, 19).unwrap();
        assert!(state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.score, 0);
        assert_eq!(state.board.get(4, 19), Some(Some(PieceKind::O)));
        assert_eq!(state.active.y, -1);
    }

    #[test]
    fn first_hold_draws_from_queue() {
        let mut state = playing_with(PieceKind::T, Board::new());
        let front = state.queue.iter().next();

        assert!(state.apply_action(GameAction::Hold));
        assert_eq!(state.hold, Some(PieceKind::T));
        assert_eq!(Some(state.active.kind), front);
        assert!(!state.can_hold);
        assert!(state.queue.len() >= QUEUE_LOOKAHEAD);
    }

    #[test]
    fn second_hold_before_lock_is_absorbed() {
        let mut state = playing_with(PieceKind::T, Board::new());
        assert!(state.apply_action(GameAction::Hold));
        let before = state.clone();
        assert!(!state.apply_action(GameAction::Hold));
        assert_eq!(state, before);
    }

    #[test]
    fn hold_swap_respawns_held_kind_and_keeps_queue() {
        let mut state = playing_with(PieceKind::T, Board::new());
        assert!(state.apply_action(GameAction::Hold));
        assert!(state.apply_action(GameAction::HardDrop));
        assert!(state.can_hold);

        let current = state.active.kind;
        assert!(state.apply_action(GameAction::MOVE_RIGHT));
        let queue_before = state.queue.clone();

        assert!(state.apply_action(GameAction::Hold));
        assert_eq!(state.active.kind, PieceKind::T);
        assert_eq!((state.active.x, state.active.y), (3, -1));
        assert_eq!(state.active.rotation, Rotation::North);
        assert_eq!(state.hold, Some(current));
        assert_eq!(state.queue, queue_before);
        assert!(!state.can_hold);
    }

    #[test]
    fn blocked_spawn_after_lock_ends_game() {
        let mut state = playing_with(PieceKind::O, spawn_blocked_board());
        state.active = state.active.shifted(-4, 18).unwrap();

        assert!(state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.score, 1);
        assert!(!state.game_over);

        assert!(state.apply_action(GameAction::Tick));
        assert!(state.game_over);
        assert!(state.paused);
        assert!(state.can_hold);

        for action in [
            GameAction::Start,
            GameAction::TogglePause,
            GameAction::MOVE_LEFT,
            GameAction::HardDrop,
            GameAction::Tick,
            GameAction::Hold,
        ] {
            assert!(state.next_state(action).is_none(), "{action:?}");
        }
        assert!(state.next_state(GameAction::Reset).is_some());
    }

    #[test]
    fn hold_into_blocked_spawn_ends_game() {
        let mut state = playing_with(PieceKind::O, spawn_blocked_board());
        state.active = state.active.shifted(-4, 10).unwrap();
        state.hold = Some(PieceKind::I);

        assert!(state.apply_action(GameAction::Hold));
        assert!(state.game_over);
        assert!(state.paused);
        assert_eq!(state.hold, Some(PieceKind::O));
        assert_eq!(state.active.kind, PieceKind::I);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = playing_with(PieceKind::I, Board::from_rows(&[".ZZZZZZZZZ"]));
        drop_vertical_i_into_gap(&mut state);
        assert!(state.apply_action(GameAction::Hold));
        state.game_over = true;

        assert!(state.apply_action(GameAction::Reset));
        assert!(state.paused);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert_eq!(state.hold, None);
        assert!(state.can_hold);
        assert_eq!(state.board, Board::new());
    }

    #[test]
    fn display_board_overlays_without_merging() {
        let mut state = playing_with(PieceKind::T, Board::new());
        state.active = state.active.shifted(0, 5).unwrap();

        let display = state.display_board();
        assert_eq!(display.get(4, 4), Some(Some(PieceKind::T)));
        assert_eq!(display.get(3, 5), Some(Some(PieceKind::T)));
        assert_eq!(state.board, Board::new());
    }

    #[test]
    fn ghost_query_leaves_state_untouched() {
        let state = playing_with(PieceKind::I, Board::new());
        let before = state.clone();
        let ghost = state.ghost_cells();
        assert_eq!(ghost.as_slice(), &[(3, 19), (4, 19), (5, 19), (6, 19)]);
        assert_eq!(state, before);
    }

    #[test]
    fn snapshot_hides_ghost_while_paused() {
        let state = GameState::with_seed(5);
        assert!(state.snapshot().ghost.is_empty());

        let mut playing = state.clone();
        playing.apply_action(GameAction::Start);
        let snap = playing.snapshot();
        assert_eq!(snap.ghost.len(), 4);
        assert_eq!(snap.next_queue, playing.next_queue());
        assert_eq!(snap.active_kind, playing.active_kind());
    }

    #[test]
    fn upward_moves_stop_at_coordinate_limit() {
        let mut state = playing_with(PieceKind::T, Board::new());
        let mut moved = 0;
        while state.apply_action(GameAction::Move { dx: 0, dy: -1 }) {
            moved += 1;
            assert!(moved < 200, "upward moves never stopped");
        }
        assert_eq!(state.active.y, i8::MIN);
        assert!(state.is_playing());
        assert!(state.apply_action(GameAction::HardDrop));
    }

    #[test]
    fn oversized_move_is_absorbed() {
        let mut state = GameState::with_seed(2);
        assert!(state.apply_action(GameAction::Start));
        let before = state.clone();

        for (dx, dy) in [(127, 0), (-128, 0), (0, 127), (0, -128)] {
            assert!(!state.apply_action(GameAction::Move { dx, dy }), "({dx}, {dy})");
        }
        assert_eq!(state, before);
    }

    #[test]
    fn drop_interval_follows_level() {
        let mut state = GameState::with_seed(1);
        assert_eq!(state.drop_interval(), Duration::from_millis(800));
        state.level = 3;
        assert_eq!(state.drop_interval(), Duration::from_millis(592));
    }
}
