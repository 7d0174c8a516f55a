//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates as `blockfall::{core,host,input,term,types}`;
//! the implementation lives in dedicated crates under `crates/`.

pub use blockfall_core as core;
pub use blockfall_host as host;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;
