//! Host configuration from environment variables.

use std::path::PathBuf;

use rand::Rng as _;

pub const DEFAULT_CELL_WIDTH: u16 = 2;
pub const MAX_CELL_WIDTH: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Sequencer seed; `None` means draw one at startup
    pub seed: Option<u32>,
    /// Terminal columns per board cell (1..=4)
    pub cell_width: u16,
    /// Append-only JSON-lines log of accepted actions
    pub action_log: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            seed: None,
            cell_width: DEFAULT_CELL_WIDTH,
            action_log: None,
        }
    }
}

impl HostConfig {
    /// Create from `BLOCKFALL_*` environment variables
    ///
    /// Unparsable or out-of-range values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("BLOCKFALL_SEED").and_then(|s| s.trim().parse().ok());

        let cell_width = lookup("BLOCKFALL_CELL_WIDTH")
            .and_then(|s| s.trim().parse().ok())
            .filter(|w| (1..=MAX_CELL_WIDTH).contains(w))
            .unwrap_or(DEFAULT_CELL_WIDTH);

        let action_log = lookup("BLOCKFALL_ACTION_LOG")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            seed,
            cell_width,
            action_log,
        }
    }

    /// The configured seed, or a fresh one from the thread RNG
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}
