//! Leaderboard reporting
//!
//! After every aggregate update a consumer hands the triggering signal and
//! the fresh ranking to a [`Reporter`]. Only the order and the
//! (identifier, total) content of the ranking matter; the layout belongs to
//! each format.

pub mod formats;

use crate::sensor::Signal;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use formats::json::JsonReporter;
pub use formats::table::TableReporter;

/// Receives the ranking after each aggregate update
pub trait Reporter: Send + Sync {
    fn report(&self, signal: &Signal, ranking: &[(String, u64)]);
}

/// Writes the ranking through the `log` facade at debug level
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, signal: &Signal, ranking: &[(String, u64)]) {
        let rows: Vec<String> = ranking
            .iter()
            .map(|(id, total)| format!("{}={}", id, total))
            .collect();
        log::debug!(
            "{} +{} -> [{}]",
            signal.source_id(),
            signal.count(),
            rows.join(", ")
        );
    }
}

/// Discards every report
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _signal: &Signal, _ranking: &[(String, u64)]) {}
}

/// Selectable report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Log,
    None,
}

impl ReportFormat {
    pub const NAMES: [&'static str; 4] = ["table", "json", "log", "none"];

    /// Build the reporter for this format
    pub fn reporter(self, color_enabled: bool) -> Arc<dyn Reporter> {
        match self {
            ReportFormat::Table => Arc::new(TableReporter::new(color_enabled)),
            ReportFormat::Json => Arc::new(JsonReporter),
            ReportFormat::Log => Arc::new(LogReporter),
            ReportFormat::None => Arc::new(NullReporter),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "log" => Ok(ReportFormat::Log),
            "none" | "off" => Ok(ReportFormat::None),
            other => Err(format!(
                "unknown report format '{}' (expected one of: {})",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Table => "table",
            ReportFormat::Json => "json",
            ReportFormat::Log => "log",
            ReportFormat::None => "none",
        };
        f.write_str(name)
    }
}
