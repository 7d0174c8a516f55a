//! Gravity tick scheduling.
//!
//! At most one tick is in flight. Each scheduled tick is a tokio task that
//! sleeps for the drop interval and then posts [`HostEvent::Tick`] with its
//! generation number. Rescheduling or cancelling aborts the task, and a tick
//! whose generation is no longer current is refused by [`TickScheduler::accept`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::runtime::HostEvent;

#[derive(Debug)]
struct Pending {
    generation: u64,
    interval: Duration,
    task: JoinHandle<()>,
}

#[derive(Debug)]
pub struct TickScheduler {
    events: mpsc::UnboundedSender<HostEvent>,
    generation: u64,
    pending: Option<Pending>,
}

impl TickScheduler {
    pub fn new(events: mpsc::UnboundedSender<HostEvent>) -> Self {
        Self {
            events,
            generation: 0,
            pending: None,
        }
    }

    /// Bring the pending tick in line with the session
    ///
    /// Not playing: cancel. Playing: keep a pending tick with the same
    /// interval, otherwise schedule a fresh one.
    pub fn sync(&mut self, playing: bool, interval: Duration) {
        if !playing {
            self.cancel();
            return;
        }
        if self.pending.as_ref().is_some_and(|p| p.interval == interval) {
            return;
        }
        self.schedule(interval);
    }

    fn schedule(&mut self, interval: Duration) {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = events.send(HostEvent::Tick { generation });
        });

        self.pending = Some(Pending {
            generation,
            interval,
            task,
        });
    }

    /// Drop the pending tick, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }

    /// Claim a fired tick. Returns false for stale generations.
    pub fn accept(&mut self, generation: u64) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.generation == generation) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Generation of the most recently scheduled tick
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Instant};

    const LONG: Duration = Duration::from_secs(60);

    async fn next_tick(rx: &mut mpsc::UnboundedReceiver<HostEvent>) -> Option<u64> {
        match timeout(LONG, rx.recv()).await {
            Ok(Some(HostEvent::Tick { generation })) => Some(generation),
            _ => None,
        }
    }

    fn assert_elapsed(start: Instant, ms: u64) {
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(ms), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(ms + 2), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TickScheduler::new(tx);

        let start = Instant::now();
        scheduler.sync(true, Duration::from_millis(800));
        assert_eq!(next_tick(&mut rx).await, Some(1));
        assert_elapsed(start, 800);

        assert!(scheduler.accept(1));
        assert!(!scheduler.is_pending());
        assert_eq!(next_tick(&mut rx).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn same_interval_keeps_pending_tick() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = TickScheduler::new(tx);

        scheduler.sync(true, Duration::from_millis(800));
        scheduler.sync(true, Duration::from_millis(800));
        assert_eq!(scheduler.generation(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_change_replaces_pending_tick() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TickScheduler::new(tx);

        scheduler.sync(true, Duration::from_millis(800));
        scheduler.sync(true, Duration::from_millis(688));

        let start = Instant::now();
        assert_eq!(next_tick(&mut rx).await, Some(2));
        assert_elapsed(start, 688);
        assert!(!scheduler.accept(1));
        assert!(scheduler.accept(2));
        assert_eq!(next_tick(&mut rx).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn not_playing_cancels() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TickScheduler::new(tx);

        scheduler.sync(true, Duration::from_millis(80));
        scheduler.sync(false, Duration::from_millis(80));
        assert!(!scheduler.is_pending());
        assert_eq!(next_tick(&mut rx).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_fired_before_cancel_is_refused() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TickScheduler::new(tx);

        scheduler.sync(true, Duration::from_millis(80));
        let generation = next_tick(&mut rx).await;
        scheduler.cancel();
        assert_eq!(generation, Some(1));
        assert!(!scheduler.accept(1));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_tick() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let keep_open = tx.clone();
        let mut scheduler = TickScheduler::new(tx);
        scheduler.sync(true, Duration::from_millis(80));
        drop(scheduler);

        assert_eq!(next_tick(&mut rx).await, None);
        drop(keep_open);
    }
}
