//! Time and timestamp helpers.
//!
//! Scheduled times are expressed on the process's local wall clock, so every
//! timestamp in the system is a [`Local`] date-time.

use chrono::{DateTime, Local};

/// Local wall-clock timestamp used for `fire_at`, `created_at`, event times, etc.
pub type Timestamp = DateTime<Local>;

/// Return the current local time.
#[must_use]
pub fn now() -> Timestamp {
    Local::now()
}

/// Render a timestamp as a 12-hour clock time, e.g. `06:10 PM`.
#[must_use]
pub fn format_clock_time(ts: &Timestamp) -> String {
    ts.format("%I:%M %p").to_string()
}
