//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It renders a
//! [`GameSnapshot`](core::GameSnapshot) into a plain framebuffer, which
//! [`TerminalRenderer`] flushes to the terminal with diffing.
//!
//! Board cells are drawn several columns wide (2 by default) to compensate
//! for the aspect ratio of terminal glyphs.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{piece_color, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
