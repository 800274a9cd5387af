//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for log entries and device action history.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Format a timestamp at second resolution, the way it appears in log
/// rows and device action summaries.
#[must_use]
pub fn format_seconds(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
