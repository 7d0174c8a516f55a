//! JSON-lines log of accepted actions.
//!
//! Records are handed to a background tokio task over an unbounded channel,
//! so the event loop never waits on the file.

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::GameState;
use crate::types::GameAction;

/// One accepted action and the session counters right after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub seq: u64,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dx: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dy: Option<i8>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl ActionRecord {
    pub fn new<R>(seq: u64, action: GameAction, state: &GameState<R>) -> Self {
        let (dx, dy) = match action {
            GameAction::Move { dx, dy } => (Some(dx), Some(dy)),
            _ => (None, None),
        };
        Self {
            seq,
            action: action.as_str(),
            dx,
            dy,
            score: state.score(),
            level: state.level(),
            lines: state.lines(),
            paused: state.paused(),
            game_over: state.game_over(),
        }
    }
}

/// Handle to the background writer
pub struct ActionLog {
    tx: mpsc::UnboundedSender<ActionRecord>,
    task: JoinHandle<()>,
}

impl ActionLog {
    /// Open `path` for appending and start the writer task
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("cannot open action log {}", path.display()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(write_records(file, rx));
        Ok(Self { tx, task })
    }

    /// Queue a record; dropped silently if the writer has stopped
    pub fn record(&self, record: ActionRecord) {
        let _ = self.tx.send(record);
    }

    /// Flush everything queued so far and stop the writer
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

async fn write_records(mut file: File, mut rx: mpsc::UnboundedReceiver<ActionRecord>) {
    let mut buf: Vec<u8> = Vec::with_capacity(256);
    while let Some(record) = rx.recv().await {
        buf.clear();
        if serde_json::to_writer(&mut buf, &record).is_err() {
            continue;
        }
        buf.push(b'\n');
        if file.write_all(&buf).await.is_err() {
            break;
        }
    }

    let _ = file.flush().await;
}
