//! Time-related utilities.

use chrono::{Local, TimeZone, Utc};

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to UTC RFC 3339 format
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => dt.to_rfc3339(),
        None => timestamp_millis.to_string(),
    }
}

/// Format Unix timestamp (milliseconds) as local wall-clock time `HH:MM:SS`
pub fn timestamp_to_local_clock(timestamp_millis: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Milliseconds elapsed since `since_millis`, clamped at zero
pub fn elapsed_millis(since_millis: i64) -> i64 {
    (now_millis() - since_millis).max(0)
}
