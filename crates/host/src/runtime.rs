//! Host runtime: owns the session and serializes every event through it.
//!
//! Keyboard input and gravity ticks arrive on one channel and are handled in
//! order, each to completion. After every event the tick scheduler is synced
//! with the session, so no tick is pending while paused or over.

use anyhow::Result;
use crossterm::event::KeyEvent;
use tokio::sync::mpsc;

use crate::action_log::{ActionLog, ActionRecord};
use crate::core::{GameSnapshot, GameState, RandomSource, SimpleRng};
use crate::input::{handle_key_event, should_quit, KeyContext};
use crate::scheduler::TickScheduler;
use crate::types::GameAction;

/// Everything the host loop reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Raw key press from the terminal
    Key(KeyEvent),
    /// An already-mapped action
    Action(GameAction),
    /// Gravity tick posted by the scheduler
    Tick { generation: u64 },
    /// Terminal size changed
    Resize,
    Quit,
}

/// What the loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going; `redraw` is set when the view is out of date
    Continue { redraw: bool },
    Quit,
}

pub struct Host<R = SimpleRng> {
    state: GameState<R>,
    scheduler: TickScheduler,
    log: Option<ActionLog>,
    seq: u64,
}

impl<R: RandomSource + Clone> Host<R> {
    /// `events` is the sender half of the channel the loop reads from
    pub fn new(state: GameState<R>, events: mpsc::UnboundedSender<HostEvent>) -> Self {
        Self {
            state,
            scheduler: TickScheduler::new(events),
            log: None,
            seq: 0,
        }
    }

    pub fn with_action_log(mut self, log: ActionLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            paused: self.state.paused(),
            game_over: self.state.game_over(),
        }
    }

    /// Process one event to completion
    pub fn handle(&mut self, event: HostEvent) -> Flow {
        let flow = match event {
            HostEvent::Key(key) if should_quit(key) => Flow::Quit,
            HostEvent::Key(key) => {
                let redraw = handle_key_event(key, self.key_context())
                    .is_some_and(|action| self.dispatch(action));
                Flow::Continue { redraw }
            }
            HostEvent::Action(action) => Flow::Continue {
                redraw: self.dispatch(action),
            },
            HostEvent::Tick { generation } => Flow::Continue {
                redraw: self.scheduler.accept(generation) && self.dispatch(GameAction::Tick),
            },
            HostEvent::Resize => Flow::Continue { redraw: true },
            HostEvent::Quit => Flow::Quit,
        };

        if flow == Flow::Quit {
            self.scheduler.cancel();
        } else {
            self.scheduler
                .sync(self.state.is_playing(), self.state.drop_interval());
        }
        flow
    }

    fn dispatch(&mut self, action: GameAction) -> bool {
        if !self.state.apply_action(action) {
            return false;
        }
        if action == GameAction::Reset {
            self.scheduler.cancel();
        }

        self.seq += 1;
        if let Some(log) = &self.log {
            log.record(ActionRecord::new(self.seq, action, &self.state));
        }
        true
    }

    /// Run until a quit key or [`HostEvent::Quit`] arrives
    ///
    /// The scheduler holds a sender of its own, so the channel does not close
    /// while the host is alive.
    ///
    /// `draw` is called once up front and after every event that changes
    /// what is on screen.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<HostEvent>,
        mut draw: impl FnMut(&GameSnapshot) -> Result<()>,
    ) -> Result<GameSnapshot> {
        draw(&self.state.snapshot())?;

        while let Some(event) = events.recv().await {
            match self.handle(event) {
                Flow::Quit => break,
                Flow::Continue { redraw: true } => draw(&self.state.snapshot())?,
                Flow::Continue { redraw: false } => {}
            }
        }

        self.scheduler.cancel();
        if let Some(log) = self.log.take() {
            log.close().await;
        }
        Ok(self.state.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::time::Duration;

    fn host(seed: u32) -> (Host, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Host::new(GameState::with_seed(seed), tx), rx)
    }

    fn key(code: KeyCode) -> HostEvent {
        HostEvent::Key(KeyEvent::from(code))
    }

    #[tokio::test(start_paused = true)]
    async fn start_schedules_and_pause_cancels() {
        let (mut host, _rx) = host(1);
        assert!(!host.scheduler().is_pending());

        assert_eq!(host.handle(key(KeyCode::Enter)), Flow::Continue { redraw: true });
        assert!(host.state().is_playing());
        assert!(host.scheduler().is_pending());

        host.handle(key(KeyCode::Char('p')));
        assert!(host.state().paused());
        assert!(!host.scheduler().is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_tick_applies_gravity_and_reschedules() {
        let (mut host, mut rx) = host(1);
        host.handle(HostEvent::Action(GameAction::Start));
        let y = host.state().active().y;

        let event = rx.recv().await;
        assert_eq!(event, Some(HostEvent::Tick { generation: 1 }));
        assert_eq!(host.handle(HostEvent::Tick { generation: 1 }), Flow::Continue { redraw: true });
        assert_eq!(host.state().active().y, y + 1);
        assert_eq!(host.state().score(), 0);
        assert!(host.scheduler().is_pending());
        assert_eq!(host.scheduler().generation(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tick_is_ignored() {
        let (mut host, _rx) = host(1);
        host.handle(HostEvent::Action(GameAction::Start));
        let before = host.state().clone();

        assert_eq!(host.handle(HostEvent::Tick { generation: 99 }), Flow::Continue { redraw: false });
        assert_eq!(host.state(), &before);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_after_pause_is_dropped() {
        let (mut host, mut rx) = host(1);
        host.handle(HostEvent::Action(GameAction::Start));
        let fired = rx.recv().await;
        host.handle(HostEvent::Action(GameAction::TogglePause));
        let before = host.state().clone();

        if let Some(event) = fired {
            host.handle(event);
        }
        assert_eq!(host.state(), &before);
        assert!(tokio::time::timeout(Duration::from_secs(10), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_tick() {
        let (mut host, _rx) = host(1);
        host.handle(HostEvent::Action(GameAction::Start));
        host.handle(key(KeyCode::Char(' ')));
        assert!(host.scheduler().is_pending());

        host.handle(HostEvent::Action(GameAction::Reset));
        assert!(host.state().paused());
        assert_eq!(host.state().score(), 0);
        assert!(!host.scheduler().is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn piece_keys_do_nothing_while_paused() {
        let (mut host, _rx) = host(1);
        let before = host.state().clone();
        for code in [KeyCode::Left, KeyCode::Char(' '), KeyCode::Char('c')] {
            assert_eq!(host.handle(key(code)), Flow::Continue { redraw: false });
        }
        assert_eq!(host.state(), &before);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_keys_stop_the_loop() {
        let (mut host, _rx) = host(1);
        host.handle(HostEvent::Action(GameAction::Start));
        assert_eq!(host.handle(key(KeyCode::Esc)), Flow::Quit);
        assert!(!host.scheduler().is_pending());

        let ctrl_c = HostEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(host.handle(ctrl_c), Flow::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn run_draws_and_returns_final_snapshot() {
        let (tx, rx) = mpsc::unbounded_channel();
        let host = Host::new(GameState::with_seed(4), tx.clone());

        tx.send(HostEvent::Action(GameAction::Start)).unwrap();
        tx.send(key(KeyCode::Char(' '))).unwrap();
        tx.send(key(KeyCode::Left)).unwrap();
        tx.send(HostEvent::Quit).unwrap();

        let mut frames = 0;
        let last = host
            .run(rx, |_| {
                frames += 1;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(frames, 4);
        assert!(last.score > 0);
        assert!(!last.paused);
    }
}
