//! Repeating refresh timer with a manual trigger.

use super::runner::{CycleOutcome, CycleRunner};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Default refresh period in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
/// Longest accepted refresh period in seconds (one day).
pub const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Drives `CycleRunner::run_cycle` on a timer.
///
/// The first cycle runs immediately on start. Dropping the scheduler ends the
/// loop as well, since its stop channel closes.
pub struct RefreshScheduler {
    manual_tx: mpsc::Sender<()>,
    interval_tx: watch::Sender<Duration>,
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    pub fn start(runner: Arc<CycleRunner>, period: Duration) -> Self {
        let period = clamp_period(period);
        let (manual_tx, mut manual_rx) = mpsc::channel::<()>(1);
        let (interval_tx, mut interval_rx) = watch::channel(period);
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        spawn_cycle(&runner, "timer");
                    }
                    Some(()) = manual_rx.recv() => {
                        spawn_cycle(&runner, "manual");
                    }
                    Ok(()) = interval_rx.changed() => {
                        let period = *interval_rx.borrow_and_update();
                        debug!("Refresh interval changed to {:?}", period);
                        ticker = interval_at(Instant::now() + period, period);
                        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    }
                    _ = stop_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            manual_tx,
            interval_tx,
            stop_tx,
            handle,
        }
    }

    /// Requests an immediate cycle. A request already queued absorbs this one.
    pub fn trigger(&self) {
        if self.manual_tx.try_send(()).is_err() {
            debug!("Manual refresh already pending");
        }
    }

    /// Restarts the timer with a new period; the next tick is one full
    /// period from now.
    pub fn set_interval(&self, period: Duration) {
        self.interval_tx.send_replace(clamp_period(period));
    }

    pub fn interval(&self) -> Duration {
        *self.interval_tx.borrow()
    }

    /// Stops the timer. A cycle already running finishes on its own.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(()).await;
        let _ = self.handle.await;
    }
}

// tokio intervals panic on a zero period, and `Instant + period` must not
// overflow when the timer is restarted
fn clamp_period(period: Duration) -> Duration {
    period.clamp(Duration::from_millis(1), Duration::from_secs(MAX_INTERVAL_SECS))
}

fn spawn_cycle(runner: &Arc<CycleRunner>, source: &'static str) {
    let runner = Arc::clone(runner);
    tokio::spawn(async move {
        if runner.run_cycle().await == CycleOutcome::Skipped {
            debug!("Skipped {} refresh", source);
        }
    });
}

#[cfg(test)]
#[path = "tests/scheduler_tests.rs"]
mod tests;
