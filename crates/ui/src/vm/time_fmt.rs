use chrono::{DateTime, Utc};

/// The countdown turns red below this many seconds.
pub const LOW_TIME_SECS: u64 = 300;

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// `MM:SS`, or `HH:MM:SS` once an hour or more is left.
#[must_use]
pub fn format_countdown(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Compact `1h 2m 3s` form, dropping leading zero units.
#[must_use]
pub fn format_span(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[must_use]
pub fn is_low_time(seconds: u64) -> bool {
    seconds < LOW_TIME_SECS
}
