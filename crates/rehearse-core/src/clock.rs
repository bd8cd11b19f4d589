//! Interview elapsed-time clock.
//!
//! `SessionClock` is the source of truth: monotonic elapsed time that can be
//! frozen and re-armed without losing the count. `ClockTicker` is the
//! periodic one-second task that publishes `TimerTick` events while the
//! clock runs; it is cancelled on drop so no tick task outlives the state
//! that started it.

use std::time::Duration;

use rehearse_types::event::ControllerEvent;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::event::EventBus;

const TICK: Duration = Duration::from_secs(1);

/// Format whole seconds as `mm:ss`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero and start running.
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    /// Freeze the elapsed count.
    pub fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    /// Re-arm from the frozen count. No-op while running.
    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Stop and zero the clock.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = None;
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    /// Elapsed time as `mm:ss`.
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed_secs())
    }
}

/// Background task publishing a `TimerTick` every second.
#[derive(Debug)]
pub struct ClockTicker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ClockTicker {
    /// Spawn a ticker continuing from the clock's current elapsed value.
    ///
    /// Returns `None` outside a tokio runtime; the clock itself still works.
    pub fn spawn(clock: &SessionClock, bus: EventBus) -> Option<Self> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let base = clock.elapsed();
        let armed_at = Instant::now();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(armed_at + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let elapsed = base + armed_at.elapsed();
                        bus.publish(ControllerEvent::TimerTick {
                            elapsed_secs: elapsed.as_secs(),
                        });
                    }
                }
            }
            debug!("Clock ticker stopped");
        });

        Some(Self { cancel, handle })
    }

    /// Stop publishing ticks.
    pub fn stop(self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(312), "05:12");
        assert_eq!(format_elapsed(3600), "60:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_counts_while_running() {
        let mut clock = SessionClock::new();
        clock.start();
        tokio::time::advance(Duration::from_secs(65)).await;
        assert_eq!(clock.elapsed_secs(), 65);
        assert_eq!(clock.display(), "01:05");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_and_resume_continues() {
        let mut clock = SessionClock::new();
        clock.start();
        tokio::time::advance(Duration::from_secs(10)).await;
        clock.stop();

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(clock.elapsed_secs(), 10);
        assert!(!clock.is_running());

        clock.resume();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(clock.elapsed_secs(), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_while_running_is_noop() {
        let mut clock = SessionClock::new();
        clock.start();
        tokio::time::advance(Duration::from_secs(4)).await;
        clock.resume();
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(clock.elapsed_secs(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_zeroes() {
        let mut clock = SessionClock::new();
        clock.start();
        tokio::time::advance(Duration::from_secs(4)).await;
        clock.reset();
        assert_eq!(clock.elapsed_secs(), 0);
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_publishes_and_stops() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let mut clock = SessionClock::new();
        clock.start();

        let ticker = ClockTicker::spawn(&clock, bus.clone()).unwrap();
        let first = rx.recv().await.unwrap();
        assert_eq!(first, ControllerEvent::TimerTick { elapsed_secs: 1 });

        ticker.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        // Only ticks published before cancellation may remain.
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(event, ControllerEvent::TimerTick { elapsed_secs } if elapsed_secs <= 2));
        }
    }

    #[test]
    fn test_ticker_outside_runtime_is_none() {
        let clock = SessionClock::new();
        assert!(ClockTicker::spawn(&clock, EventBus::new(4)).is_none());
    }
}
