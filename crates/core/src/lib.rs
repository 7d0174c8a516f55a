//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains every game rule and the session state machine. It does
//! no I/O and reads no clock; randomness arrives through an injected
//! [`RandomSource`], so the same source always produces the same game.
//!
//! # Module Structure
//!
//! - [`geometry`]: shape matrices, matrix rotation and SRS kick tables
//! - [`board`]: 10x20 grid with collision, merge and line clearing
//! - [`placement`]: moving, rotating and dropping the active piece
//! - [`rng`]: the random source seam and a seeded LCG
//! - [`bag`]: 7-bag sequencing and the upcoming-piece queue
//! - [`scoring`]: line and drop points, levels and gravity interval
//! - [`game_state`]: the reducer over [`GameAction`](types::GameAction)
//! - [`snapshot`]: read-only projection for views
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every run of seven pieces contains each kind once
//! - **SRS Rotation**: five-step wall kicks, I pieces use their own table, O never rotates
//! - **Ghost Piece**: shows where the current piece will land
//! - **Hold**: store one piece for later use (once per lock)
//! - **Scoring**: 100/300/500/800 times level, plus 1 per soft-dropped and 2 per hard-dropped row
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::GameAction;
//!
//! let mut game = GameState::with_seed(12345);
//! assert!(game.paused());
//!
//! game.apply_action(GameAction::Start);
//! game.apply_action(GameAction::MOVE_RIGHT);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! Gravity is not driven from here. The host schedules a
//! [`GameAction::Tick`](types::GameAction::Tick) every
//! [`GameState::drop_interval`] while [`GameState::is_playing`] holds.

pub mod bag;
pub mod board;
pub mod game_state;
pub mod geometry;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use bag::{shuffled_bag, PieceQueue};
pub use board::{occupied_cells, Board, PlacedCell};
pub use game_state::GameState;
pub use geometry::ShapeMatrix;
pub use placement::{can_place, drop_to_rest, ghost_cells, try_move, try_rotate, ActivePiece};
pub use rng::{RandomSource, RngSource, SimpleRng};
pub use scoring::{calculate_drop_score, calculate_level, calculate_line_score, drop_interval};
pub use snapshot::GameSnapshot;
