//! Cancellable periodic timer on the tokio clock.
//!
//! Runs on tokio time, so tests drive it with a paused clock
//! (`#[tokio::test(start_paused = true)]`) instead of waiting.
//! Missed fires are skipped, not replayed.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Default)]
pub struct IntervalTimer {
    handle: Option<JoinHandle<()>>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `callback` every `period`, first after one full period.
    /// Replaces any schedule already running. Must be called within a
    /// tokio runtime.
    pub fn start<F>(&mut self, period: Duration, mut callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.cancel();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                callback();
            }
        });
        self.handle = Some(handle);
    }

    /// Stop firing. Returns whether a schedule was running.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
