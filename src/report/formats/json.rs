//! JSON-lines output

use super::format_timestamp;
use crate::ranking::LeaderboardEntry;
use crate::report::Reporter;
use crate::sensor::Signal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ReportLine<'a> {
    timestamp: String,
    source_id: &'a str,
    count: u64,
    ranking: Vec<LeaderboardEntry>,
}

/// Prints one compact JSON object per update
#[derive(Debug, Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn render(&self, signal: &Signal, ranking: &[(String, u64)]) -> serde_json::Result<String> {
        serde_json::to_string(&ReportLine {
            timestamp: format_timestamp(signal.timestamp()),
            source_id: signal.source_id(),
            count: signal.count(),
            ranking: LeaderboardEntry::from_ranking(ranking),
        })
    }
}

impl Reporter for JsonReporter {
    fn report(&self, signal: &Signal, ranking: &[(String, u64)]) {
        match self.render(signal, ranking) {
            Ok(line) => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                if let Err(e) = writeln!(out, "{}", line) {
                    log::debug!("Could not write report: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize report: {}", e),
        }
    }
}
