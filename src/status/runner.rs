//! The refresh cycle and the state holder it writes to.
//!
//! `CycleRunner::run_cycle` is the only entry point; timer ticks and manual
//! refreshes both go through it. The displayed `StatusView` lives in a watch
//! channel whose single sender is owned by the runner, so readers only ever
//! see the complete result of a finished cycle.

use crate::presentation::{present, DisplayPrefs, DisplayZone, StatusKind, StatusView};
use crate::usage::{fetch, normalize, CredentialLocator, UsageApi};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

/// Sender for status updates
pub type StatusSender = watch::Sender<StatusView>;
/// Receiver for status updates
pub type StatusReceiver = watch::Receiver<StatusView>;

/// Create a watch channel holding the "loading" view
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    watch::channel(StatusView::loading())
}

/// Display settings that can change between cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub currency_symbol: String,
    pub zone: DisplayZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran and replaced the displayed view
    Published(StatusKind),
    /// Another cycle was already in flight; nothing was done
    Skipped,
}

pub struct CycleRunner {
    locator: CredentialLocator,
    api: Arc<dyn UsageApi>,
    display: RwLock<DisplaySettings>,
    status_tx: StatusSender,
    in_flight: AtomicBool,
}

impl CycleRunner {
    pub fn new(
        locator: CredentialLocator,
        api: Arc<dyn UsageApi>,
        display: DisplaySettings,
        status_tx: StatusSender,
    ) -> Self {
        Self {
            locator,
            api,
            display: RwLock::new(display),
            status_tx,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Applies new display settings from the next cycle on.
    pub async fn set_display(&self, display: DisplaySettings) {
        *self.display.write().await = display;
    }

    /// Runs one locate → fetch → normalize → present cycle and publishes the
    /// result. Returns `Skipped` if a cycle is already running.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Refresh already in flight, skipping trigger");
            return CycleOutcome::Skipped;
        };

        let view = self.evaluate().await;
        let kind = view.kind;
        self.status_tx.send_replace(view);
        CycleOutcome::Published(kind)
    }

    async fn evaluate(&self) -> StatusView {
        let creds = self.locator.locate().await;
        let result = fetch(Arc::clone(&self.api), creds).await;
        let now = Utc::now();

        match result {
            Ok(None) => {
                debug!("No Claude credentials available");
                StatusView::no_credentials(now)
            }
            Ok(Some(raw)) => {
                if raw.profile.is_none() {
                    debug!("Rendering usage without plan label");
                }
                let snapshot = normalize(&raw.usage, raw.profile.as_deref());
                let display = self.display.read().await.clone();
                let prefs = DisplayPrefs {
                    currency_symbol: display.currency_symbol,
                    zone: display.zone,
                    now,
                };
                let view = present(&snapshot, &prefs);
                info!("Usage refreshed: {}", view.label);
                view
            }
            Err(e) => {
                warn!("Usage refresh failed: {}", e);
                StatusView::error(&e.to_string(), now)
            }
        }
    }
}

/// Clears the in-flight flag when the cycle ends, including on panic.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
