//! Console table output

use super::format_timestamp;
use crate::report::Reporter;
use crate::sensor::Signal;
use colored::Colorize;
use prettytable::{format, row, Table};
use std::io::Write;

/// Prints a boxed leaderboard to stdout after every update
#[derive(Debug, Default)]
pub struct TableReporter {
    color_enabled: bool,
}

impl TableReporter {
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Build the headline and table for one update
    pub fn render(&self, signal: &Signal, ranking: &[(String, u64)]) -> String {
        let headline = format!(
            "[{}] {} +{}",
            format_timestamp(signal.timestamp()),
            signal.source_id(),
            signal.count()
        );
        let headline = if self.color_enabled {
            headline.bold().to_string()
        } else {
            headline
        };

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Rank", "Location", "Total"]);
        for (index, (source_id, total)) in ranking.iter().enumerate() {
            if self.color_enabled && source_id == signal.source_id() {
                table.add_row(row![index + 1, Fg->source_id, r->total]);
            } else {
                table.add_row(row![index + 1, source_id, r->total]);
            }
        }

        format!("{}\n{}", headline, table)
    }
}

impl Reporter for TableReporter {
    fn report(&self, signal: &Signal, ranking: &[(String, u64)]) {
        let rendered = self.render(signal, ranking);
        // One write under the stdout lock keeps concurrent consumers from interleaving
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = writeln!(out, "{}", rendered) {
            log::debug!("Could not write report: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_sources_in_ranking_order() {
        let reporter = TableReporter::new(false);
        let signal = Signal::new("TrafficLight2", 9);
        let ranking = vec![
            ("TrafficLight2".to_string(), 30),
            ("TrafficLight1".to_string(), 12),
        ];

        let output = reporter.render(&signal, &ranking);

        assert!(output.contains("TrafficLight2 +9"), "got: {}", output);
        assert!(output.contains("Location"));
        let first = output.rfind("TrafficLight2").unwrap();
        let second = output.find("TrafficLight1").unwrap();
        assert!(first < second, "ranking order lost: {}", output);
        assert!(output.contains("30"));
        assert!(output.contains("12"));
    }
}
