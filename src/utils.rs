//! Utility functions for common operations.

use std::time::Duration;

use chrono::{Local, TimeZone};

/// Format duration as MM:SS
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Format a countdown in whole seconds as MM:SS
pub fn format_seconds(seconds: u32) -> String {
    format_duration(Duration::from_secs(seconds as u64))
}

/// Local wall-clock time (HH:MM:SS) of a Unix-millisecond timestamp
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}
