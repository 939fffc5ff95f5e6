//! Command-line arguments
//!
//! Every simulation and logging setting can also come from the TOML
//! configuration file; values given here take precedence.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "signalrank")]
#[command(about = "Traffic sensor network simulation with a live busiest-location leaderboard")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Channel capacity (default: 10)
    #[arg(short = 'b', long = "capacity", value_name = "COUNT", allow_negative_numbers = true)]
    pub capacity: Option<i64>,

    /// Number of producer workers (default: 5)
    #[arg(short = 'p', long = "producers", value_name = "COUNT", allow_negative_numbers = true)]
    pub producers: Option<i64>,

    /// Number of consumer workers (default: 2)
    #[arg(short = 'n', long = "consumers", value_name = "COUNT", allow_negative_numbers = true)]
    pub consumers: Option<i64>,

    /// Pause between readings of one producer, in milliseconds (default: 1000)
    #[arg(short = 'i', long = "interval-ms", value_name = "MILLIS")]
    pub interval_ms: Option<u64>,

    /// Largest count a single reading can carry (default: 100)
    #[arg(long = "max-count", value_name = "COUNT")]
    pub max_count: Option<u64>,

    /// Stop each producer after this many readings, then drain and exit
    #[arg(short = 'm', long = "max-signals", value_name = "COUNT")]
    pub max_signals: Option<u64>,

    /// Stop the whole run after this many seconds
    #[arg(short = 'd', long = "duration", value_name = "SECONDS")]
    pub duration: Option<u64>,

    /// Seed for reproducible readings (producer n uses seed + n)
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Prefix for location identifiers (default: TrafficLight)
    #[arg(long = "source-prefix", value_name = "PREFIX")]
    pub source_prefix: Option<String>,

    /// Leaderboard output after each update
    #[arg(short = 'r', long = "report", value_name = "FORMAT", value_parser = ["table", "json", "log", "none"])]
    pub report: Option<String>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (logs go to stderr when unset)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored output
    #[arg(short = 'g', long = "color", action = ArgAction::SetTrue, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,
}

impl Args {
    /// Explicit color choice: `Some(true)` for --color, `Some(false)` for --no-color
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
