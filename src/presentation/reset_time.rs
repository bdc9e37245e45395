//! Local rendering of quota reset timestamps, e.g. "Tue 3 PM".

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

/// Time zone reset times are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The system's local time zone
    #[default]
    Local,
    Named(chrono_tz::Tz),
}

impl DisplayZone {
    fn to_wall_clock(self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            DisplayZone::Local => instant.with_timezone(&chrono::Local).naive_local(),
            DisplayZone::Named(tz) => instant.with_timezone(&tz).naive_local(),
        }
    }
}

/// Formats an ISO-8601 reset timestamp as `<Ddd> <h>[:<mm>] <AM|PM>`.
///
/// Minutes are only shown when non-zero. Returns `None` for timestamps that
/// do not parse.
pub fn format_reset(iso: &str, zone: DisplayZone) -> Option<String> {
    let instant = DateTime::parse_from_rfc3339(iso).ok()?.with_timezone(&Utc);
    Some(format_wall_clock(zone.to_wall_clock(instant)))
}

fn format_wall_clock(local: NaiveDateTime) -> String {
    let hour = local.hour();
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    let minutes = match local.minute() {
        0 => String::new(),
        m => format!(":{:02}", m),
    };
    format!("{} {}{} {}", local.format("%a"), hour12, minutes, meridiem)
}

#[cfg(test)]
#[path = "tests/reset_time_tests.rs"]
mod tests;
