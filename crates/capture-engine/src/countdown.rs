//! Cancellable one-second countdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_secs(1);

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Completed,
    Cancelled,
}

/// A countdown ready to run.
#[derive(Debug)]
pub struct Countdown {
    secs: u32,
    signal: Arc<CancelSignal>,
}

/// Cancels the paired countdown when told to or when dropped.
#[derive(Debug)]
pub struct CountdownHandle {
    signal: Arc<CancelSignal>,
}

#[derive(Debug, Default)]
struct CancelSignal {
    cancelled: AtomicBool,
    notify: Notify,
}

impl Countdown {
    /// Create a countdown of `secs` seconds and its cancellation handle.
    pub fn start(secs: u32) -> (Self, CountdownHandle) {
        let signal = Arc::new(CancelSignal::default());
        (
            Self {
                secs,
                signal: signal.clone(),
            },
            CountdownHandle { signal },
        )
    }

    /// Run to completion or cancellation.
    ///
    /// `display` receives `Some(n)` whenever the visible counter changes and
    /// `None` once it is hidden. A zero-second countdown completes at once
    /// without showing anything.
    pub async fn run(self, mut display: impl FnMut(Option<u32>) + Send) -> CountdownOutcome {
        if self.secs == 0 {
            return self.finish(CountdownOutcome::Completed);
        }

        let mut remaining = self.secs;
        display(Some(remaining));

        let mut ticker = interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        while remaining > 0 {
            if self.signal.is_cancelled() {
                display(None);
                return CountdownOutcome::Cancelled;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.signal.notify.notified() => {
                    display(None);
                    return CountdownOutcome::Cancelled;
                }
            }
            remaining -= 1;
            if remaining > 0 {
                display(Some(remaining));
            }
        }

        display(None);
        self.finish(CountdownOutcome::Completed)
    }

    fn finish(&self, outcome: CountdownOutcome) -> CountdownOutcome {
        // A cancel that raced the final tick still wins.
        if self.signal.is_cancelled() {
            CountdownOutcome::Cancelled
        } else {
            outcome
        }
    }
}

impl CountdownHandle {
    pub fn cancel(&self) {
        if !self.signal.cancelled.swap(true, Ordering::SeqCst) {
            self.signal.notify.notify_one();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl CancelSignal {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
