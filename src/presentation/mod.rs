//! Turns a `UsageSnapshot` into the status-line label, tooltip and warning
//! flag, plus the fixed views for missing credentials and failed cycles.

pub mod currency;
pub mod reset_time;

use crate::usage::types::{UsageLimit, UsageSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use currency::resolve_currency_symbol;
pub use reset_time::{format_reset, DisplayZone};

const ICON: &str = "$(cloud)";
const TITLE: &str = "Claude Code Plan Usage";
const CALL_TO_ACTION: &str = "Click to refresh";
const SEGMENT_SEPARATOR: &str = " | ";

/// Utilization at or above which the status is flagged.
pub const WARN_THRESHOLD: f64 = 80.0;

/// Caller-supplied rendering preferences.
#[derive(Debug, Clone)]
pub struct DisplayPrefs {
    pub currency_symbol: String,
    pub zone: DisplayZone,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Loading,
    Ready,
    NoCredentials,
    Error,
}

/// What the status-line widget shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub kind: StatusKind,
    pub label: String,
    pub tooltip: String,
    pub warn: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StatusView {
    /// Shown before the first cycle completes.
    pub fn loading() -> Self {
        Self {
            kind: StatusKind::Loading,
            label: format!("{} Claude Code: loading...", ICON),
            tooltip: String::new(),
            warn: false,
            updated_at: None,
        }
    }

    pub fn no_credentials(now: DateTime<Utc>) -> Self {
        Self {
            kind: StatusKind::NoCredentials,
            label: format!("{} Claude: no auth", ICON),
            tooltip: "Could not read Claude Code credentials from Keychain".to_string(),
            warn: false,
            updated_at: Some(now),
        }
    }

    pub fn error(message: &str, now: DateTime<Utc>) -> Self {
        Self {
            kind: StatusKind::Error,
            label: format!("{} Claude: error", ICON),
            tooltip: format!("Error: {}", message),
            warn: false,
            updated_at: Some(now),
        }
    }
}

/// One quota window as it appears in the label and tooltip.
struct WindowRow<'a> {
    tag: &'static str,
    title: &'static str,
    limit: &'a UsageLimit,
}

fn present_windows(snapshot: &UsageSnapshot) -> Vec<WindowRow<'_>> {
    [
        ("S", "Session (5h)", snapshot.session.as_ref()),
        ("W", "Weekly All models", snapshot.weekly.as_ref()),
        ("Son", "Weekly Sonnet", snapshot.weekly_sonnet.as_ref()),
    ]
    .into_iter()
    .filter_map(|(tag, title, limit)| limit.map(|limit| WindowRow { tag, title, limit }))
    .collect()
}

fn rounded_percent(utilization: f64) -> i64 {
    utilization.round() as i64
}

/// Renders a snapshot.
pub fn present(snapshot: &UsageSnapshot, prefs: &DisplayPrefs) -> StatusView {
    let windows = present_windows(snapshot);

    StatusView {
        kind: StatusKind::Ready,
        label: build_label(&windows),
        tooltip: build_tooltip(snapshot, &windows, prefs),
        warn: should_warn(snapshot),
        updated_at: Some(prefs.now),
    }
}

fn build_label(windows: &[WindowRow<'_>]) -> String {
    if windows.is_empty() {
        return format!("{} Claude: no data", ICON);
    }

    let segments: Vec<String> = windows
        .iter()
        .map(|w| format!("{}:{}%", w.tag, rounded_percent(w.limit.utilization)))
        .collect();
    format!("{} Claude {}", ICON, segments.join(SEGMENT_SEPARATOR))
}

fn build_tooltip(snapshot: &UsageSnapshot, windows: &[WindowRow<'_>], prefs: &DisplayPrefs) -> String {
    let mut lines = Vec::with_capacity(windows.len() + 4);

    lines.push(match &snapshot.plan_label {
        Some(plan) => format!("{} ({})", TITLE, plan),
        None => TITLE.to_string(),
    });

    for window in windows {
        let reset = window
            .limit
            .resets_at
            .as_deref()
            .and_then(|iso| format_reset(iso, prefs.zone))
            .map(|when| format!(" — resets {}", when))
            .unwrap_or_default();
        lines.push(format!(
            "{}: {}%{}",
            window.title,
            rounded_percent(window.limit.utilization),
            reset
        ));
    }

    if let Some(extra) = snapshot.extra_usage.as_ref().filter(|e| e.enabled) {
        let symbol = &prefs.currency_symbol;
        lines.push(format!(
            "Extra usage: {}{:.2} / {}{:.2}",
            symbol,
            extra.used_credits_dollars.unwrap_or(0.0),
            symbol,
            extra.monthly_limit_dollars.unwrap_or(0.0)
        ));
    }

    lines.push(String::new());
    lines.push(CALL_TO_ACTION.to_string());
    lines.join("\n")
}

/// Missing session or weekly data counts as 0% here, unlike in the label and
/// tooltip where a missing window is simply not shown.
pub fn should_warn(snapshot: &UsageSnapshot) -> bool {
    let utilization = |limit: &Option<UsageLimit>| limit.as_ref().map_or(0.0, |l| l.utilization);
    utilization(&snapshot.session) >= WARN_THRESHOLD || utilization(&snapshot.weekly) >= WARN_THRESHOLD
}

#[cfg(test)]
#[path = "tests/presentation_tests.rs"]
mod tests;
