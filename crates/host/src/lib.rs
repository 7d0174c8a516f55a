//! Host wiring for a blockfall session.
//!
//! The engine in `blockfall-core` is a pure reducer; this crate supplies what
//! a running game needs around it:
//!
//! - [`config`]: `BLOCKFALL_*` environment configuration
//! - [`scheduler`]: single in-flight gravity tick on the tokio timer
//! - [`runtime`]: the serialized event loop that owns the session
//! - [`action_log`]: optional JSON-lines record of accepted actions

pub mod action_log;
pub mod config;
pub mod runtime;
pub mod scheduler;

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_types as types;

pub use action_log::{ActionLog, ActionRecord};
pub use config::HostConfig;
pub use runtime::{Flow, Host, HostEvent};
pub use scheduler::TickScheduler;
