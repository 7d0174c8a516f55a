//! Terminal input module (engine-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`], given the session flags that
//! decide whether piece controls apply.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit, KeyContext};
