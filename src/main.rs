//! Terminal blockfall runner (default binary).
//!
//! Keyboard input is read on a dedicated thread and posted, together with the
//! scheduler's gravity ticks, onto the host's event channel. Frames are drawn
//! with the framebuffer renderer after every visible change.

use std::thread;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;

use blockfall::core::{GameSnapshot, GameState};
use blockfall::host::{ActionLog, Host, HostConfig, HostEvent};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

#[tokio::main]
async fn main() -> Result<()> {
    let config = HostConfig::from_env();
    let seed = config.resolve_seed();
    eprintln!("[Host] seed {seed}");

    let log = match &config.action_log {
        Some(path) => match ActionLog::open(path).await {
            Ok(log) => {
                eprintln!("[Host] logging actions to {}", path.display());
                Some(log)
            }
            Err(e) => {
                eprintln!("[Host] {e:#}; continuing without action log");
                None
            }
        },
        None => None,
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&config, seed, log, &mut term).await;

    // Always try to restore terminal state.
    let _ = term.exit();

    let last = result?;
    eprintln!(
        "[Host] final score {} (level {}, {} lines)",
        last.score, last.level, last.lines
    );
    Ok(())
}

async fn run(
    config: &HostConfig,
    seed: u32,
    log: Option<ActionLog>,
    term: &mut TerminalRenderer,
) -> Result<GameSnapshot> {
    let (tx, rx) = mpsc::unbounded_channel();
    spawn_input_thread(tx.clone());

    let mut host = Host::new(GameState::with_seed(seed), tx);
    if let Some(log) = log {
        host = host.with_action_log(log);
    }

    let view = GameView::new(config.cell_width);
    let mut fb = FrameBuffer::new(0, 0);
    host.run(rx, |snap| {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(snap, Viewport::new(w, h), &mut fb);
        term.draw(&fb)
    })
    .await
}

/// Forward terminal events until the receiver goes away or input fails
fn spawn_input_thread(tx: mpsc::UnboundedSender<HostEvent>) {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => HostEvent::Key(key),
            Ok(Event::Resize(..)) => HostEvent::Resize,
            Ok(_) => continue,
            Err(_) => HostEvent::Quit,
        };
        let quit = event == HostEvent::Quit;
        if tx.send(event).is_err() || quit {
            break;
        }
    });
}
