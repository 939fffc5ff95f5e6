//! Runs stopped by cancelling the root token

use crate::common::bounded_config;
use signalrank::app::config::SimulationConfig;
use signalrank::app::simulation::Simulation;
use signalrank::report::NullReporter;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_cancel_during_bounded_run_returns_promptly() {
    let mut config = bounded_config(3, 1, 1_000);
    config.interval = Duration::from_millis(50);
    let simulation = Simulation::start(&config, Arc::new(NullReporter)).unwrap();
    let token = simulation.token().clone();

    let started = Instant::now();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(120));
        token.cancel();
    });
    let report = simulation.run_to_completion(true, Duration::from_secs(30));
    canceller.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(report.producers.iter().all(|p| p.cancelled));
    assert!(report.signals_produced() < 3_000);
    assert_eq!(report.grand_total, report.consumed_total());
}

#[test]
fn test_join_without_explicit_shutdown_stops_workers() {
    let config = SimulationConfig {
        interval: Duration::from_millis(1),
        ..Default::default()
    };
    let simulation = Simulation::start(&config, Arc::new(NullReporter)).unwrap();
    thread::sleep(Duration::from_millis(30));

    let report = simulation.join();

    assert_eq!(report.producers.len(), 5);
    assert_eq!(report.consumers.len(), 2);
    assert!(report.panicked.is_empty());
}
