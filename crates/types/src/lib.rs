//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the engine, the terminal view, the input mapping and the host alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn position**: (3, -1), one row above the visible board
//!
//! # Scoring Constants
//!
//! | Lines | Points (x level) |
//! |-------|------------------|
//! | 1 | 100 |
//! | 2 | 300 |
//! | 3 | 500 |
//! | 4 | 800 |
//!
//! Soft drop awards 1 point per row, hard drop 2 points per row.
//!
//! # Drop Interval
//!
//! `max(80ms, round(800ms * 0.86^(level - 1)))`, see `blockfall_core::scoring`.
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, Rotation, GameAction, RotationDirection, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(GameAction::Rotate(RotationDirection::Cw).as_str(), "rotateCw");
//! assert_eq!(BOARD_WIDTH, 10);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn row of a fresh piece's 4x4 matrix (one row above the visible board)
pub const SPAWN_Y: i8 = -1;

/// Level a new session starts at
pub const START_LEVEL: u32 = 1;

/// Lines needed per level increase
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear points before the level multiplier, indexed by lines cleared
pub const LINE_CLEAR_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per row descended with the soft drop action
pub const SOFT_DROP_POINTS_PER_CELL: u32 = 1;

/// Points per row descended during a hard drop
pub const HARD_DROP_POINTS_PER_CELL: u32 = 2;

/// Gravity interval at level 1 (milliseconds per row)
pub const BASE_DROP_MS: u32 = 800;

/// Per-level decay factor of the gravity interval
pub const DROP_DECAY: f64 = 0.86;

/// Fastest gravity interval (milliseconds)
pub const DROP_INTERVAL_MIN_MS: u32 = 80;

/// Minimum materialized queue length
pub const QUEUE_LOOKAHEAD: usize = 7;

/// Number of upcoming pieces exposed for display
pub const NEXT_PREVIEW: usize = 3;

/// The seven tetromino piece kinds
///
/// The declaration order (I, J, L, O, S, T, Z) is the order a fresh bag is
/// built in before shuffling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Number of piece kinds
    pub const LEN: usize = 7;

    /// All kinds in bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }

    /// Single uppercase letter, for compact displays
    pub fn letter(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North** (0): spawn orientation
/// - **East** (1): rotated 90° clockwise
/// - **South** (2): rotated 180°
/// - **West** (3): rotated 90° counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate one step in the given direction
    pub fn rotate(&self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Cw => self.rotate_cw(),
            RotationDirection::Ccw => self.rotate_ccw(),
        }
    }

    /// Numeric rotation state (0..=3)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation state from a number, taken modulo 4
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Direction of a single rotation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    /// Clockwise
    Cw,
    /// Counter-clockwise
    Ccw,
}

/// Actions accepted by the game state machine
///
/// These are the only mutation entry points of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Leave the paused/ready state
    Start,
    /// Flip the paused flag
    TogglePause,
    /// Reinitialize the whole session (accepted in any state)
    Reset,
    /// Translate the active piece
    Move { dx: i8, dy: i8 },
    /// Rotate the active piece with wall kicks
    Rotate(RotationDirection),
    /// Move down one row (scored), locking when blocked
    SoftDrop,
    /// Gravity step: move down one row (unscored), locking when blocked
    Tick,
    /// Drop to the resting position and lock
    HardDrop,
    /// Store or swap the active piece (once per piece)
    Hold,
}

impl GameAction {
    pub const MOVE_LEFT: GameAction = GameAction::Move { dx: -1, dy: 0 };
    pub const MOVE_RIGHT: GameAction = GameAction::Move { dx: 1, dy: 0 };

    /// camelCase name used by the action log
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Start => "start",
            GameAction::TogglePause => "togglePause",
            GameAction::Reset => "reset",
            GameAction::Move { .. } => "move",
            GameAction::Rotate(RotationDirection::Cw) => "rotateCw",
            GameAction::Rotate(RotationDirection::Ccw) => "rotateCcw",
            GameAction::SoftDrop => "softDrop",
            GameAction::Tick => "tick",
            GameAction::HardDrop => "hardDrop",
            GameAction::Hold => "hold",
        }
    }

    /// Whether the action is still applied while paused
    pub fn allowed_while_paused(&self) -> bool {
        matches!(
            self,
            GameAction::Start | GameAction::TogglePause | GameAction::Reset
        )
    }
}

/// A cell on the game board
///
/// - `None`: empty cell
/// - `Some(PieceKind)`: filled with the tag of the piece that locked there
pub type Cell = Option<PieceKind>;
