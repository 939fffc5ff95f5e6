//! Runs that stop once every producer reached its signal limit

use crate::common::{bounded_config, ObservingReporter};
use signalrank::app::config::SimulationConfig;
use signalrank::app::simulation::Simulation;
use signalrank::report::NullReporter;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

#[test]
fn test_default_topology_grand_total_matches_production() {
    // 5 producers x 100 signals through capacity 10 with 2 consumers
    let config = bounded_config(5, 2, 100);
    assert_eq!(config.capacity, 10);

    let report = Simulation::start(&config, Arc::new(NullReporter))
        .unwrap()
        .run_to_completion(true, Duration::from_secs(30));

    assert_eq!(report.signals_produced(), 500);
    assert_eq!(report.signals_consumed(), 500);
    assert_eq!(report.grand_total, report.produced_total());
    assert_eq!(
        report.leaderboard.iter().map(|e| e.total).sum::<u64>(),
        report.grand_total
    );
}

#[test]
fn test_leaderboard_matches_observed_stream() {
    let config = bounded_config(4, 3, 30);
    let reporter = Arc::new(ObservingReporter::default());

    let report = Simulation::start(&config, reporter.clone())
        .unwrap()
        .run_to_completion(true, Duration::from_secs(30));

    let observed = reporter.per_source.lock().unwrap();
    assert_eq!(observed.len(), report.leaderboard.len());
    for entry in &report.leaderboard {
        assert_eq!(observed.get(&entry.source_id), Some(&entry.total));
    }

    for pair in report.leaderboard.windows(2) {
        assert!(
            pair[0].total > pair[1].total
                || (pair[0].total == pair[1].total && pair[0].source_id < pair[1].source_id)
        );
    }
}

#[test]
fn test_every_report_is_ranked() {
    let config = bounded_config(3, 2, 25);
    let reporter = Arc::new(ObservingReporter::default());

    Simulation::start(&config, reporter.clone())
        .unwrap()
        .run_to_completion(true, Duration::from_secs(30));

    let rankings = reporter.rankings.lock().unwrap();
    assert_eq!(rankings.len(), 75);
    for ranking in rankings.iter() {
        assert!(ranking.windows(2).all(|p| p[0].1 >= p[1].1));
    }
}

#[test]
fn test_source_prefix_names_locations() {
    let mut config = bounded_config(2, 1, 3);
    config.source_prefix = "Junction".to_string();

    let report = Simulation::start(&config, Arc::new(NullReporter))
        .unwrap()
        .run_to_completion(true, Duration::from_secs(30));

    let mut names: Vec<_> = report.leaderboard.iter().map(|e| e.source_id.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Junction1", "Junction2"]);
}

#[test]
fn test_run_without_consumers_stops_after_drain_timeout() {
    // The single producer fills the channel and then blocks on its second put
    let config = SimulationConfig {
        capacity: 1,
        producers: 1,
        consumers: 0,
        interval: Duration::ZERO,
        max_signals: Some(3),
        ..Default::default()
    };
    let simulation = Simulation::start(&config, Arc::new(NullReporter)).unwrap();

    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        let report = simulation.run_to_completion(true, Duration::from_millis(200));
        let _ = done_tx.send(report);
    });

    let report = done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("bounded run without consumers should stop after the drain timeout");
    assert_eq!(report.signals_produced(), 1);
    assert!(report.producers[0].cancelled);
    assert_eq!(report.updates, 0);
}

#[test]
fn test_run_without_consumers_finishes_when_channel_has_room() {
    let config = SimulationConfig {
        capacity: 8,
        producers: 2,
        consumers: 0,
        interval: Duration::ZERO,
        max_signals: Some(3),
        ..Default::default()
    };

    let report = Simulation::start(&config, Arc::new(NullReporter))
        .unwrap()
        .run_to_completion(true, Duration::from_secs(5));

    assert_eq!(report.signals_produced(), 6);
    assert!(report.producers.iter().all(|p| !p.cancelled));
}
