//! Command-line argument parsing tests

use clap::Parser;
use signalrank::app::cli::Args;
use signalrank::app::config::AppConfig;
use signalrank::report::ReportFormat;
use std::time::Duration;

#[test]
fn test_short_and_long_flags_agree() {
    let short = Args::try_parse_from(["signalrank", "-b", "6", "-p", "4", "-n", "3", "-i", "20"]).unwrap();
    let long = Args::try_parse_from([
        "signalrank",
        "--capacity",
        "6",
        "--producers",
        "4",
        "--consumers",
        "3",
        "--interval-ms",
        "20",
    ])
    .unwrap();

    assert_eq!(short.capacity, long.capacity);
    assert_eq!(short.producers, long.producers);
    assert_eq!(short.consumers, long.consumers);
    assert_eq!(short.interval_ms, long.interval_ms);
}

#[test]
fn test_cli_values_reach_simulation_config() {
    let args = Args::try_parse_from([
        "signalrank",
        "--capacity",
        "3",
        "--max-signals",
        "12",
        "--duration",
        "2",
        "--report",
        "none",
        "--source-prefix",
        "Junction",
        "--seed",
        "99",
    ])
    .unwrap();

    let config = AppConfig::load(&args).unwrap();
    let sim = &config.simulation;

    assert_eq!(sim.capacity, 3);
    assert_eq!(sim.max_signals, Some(12));
    assert_eq!(sim.duration, Some(Duration::from_secs(2)));
    assert_eq!(sim.report, ReportFormat::None);
    assert_eq!(sim.source_prefix, "Junction");
    assert_eq!(sim.seed, Some(99));
}

#[test]
fn test_invalid_log_format_is_rejected() {
    assert!(Args::try_parse_from(["signalrank", "--log-format", "xml"]).is_err());
    assert!(Args::try_parse_from(["signalrank", "--log-format", "ext"]).is_ok());
}

#[test]
fn test_non_numeric_capacity_is_rejected() {
    assert!(Args::try_parse_from(["signalrank", "--capacity", "ten"]).is_err());
}

#[test]
fn test_version_flag_exits_early() {
    let err = Args::try_parse_from(["signalrank", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
}
