//! Report output formats

pub mod json;
pub mod table;

use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Render a signal timestamp in local time with millisecond precision
pub fn format_timestamp(timestamp: SystemTime) -> String {
    DateTime::<Local>::from(timestamp)
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}
