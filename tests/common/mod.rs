//! Shared helpers for simulation tests

use signalrank::app::config::SimulationConfig;
use signalrank::report::Reporter;
use signalrank::sensor::Signal;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Fast bounded configuration with reproducible readings
pub fn bounded_config(producers: usize, consumers: usize, max_signals: u64) -> SimulationConfig {
    SimulationConfig {
        producers,
        consumers,
        interval: Duration::ZERO,
        max_signals: Some(max_signals),
        seed: Some(2024),
        ..Default::default()
    }
}

/// Reporter that replays the signal stream it observed
#[derive(Default)]
pub struct ObservingReporter {
    pub per_source: Mutex<HashMap<String, u64>>,
    pub rankings: Mutex<Vec<Vec<(String, u64)>>>,
}

impl Reporter for ObservingReporter {
    fn report(&self, signal: &Signal, ranking: &[(String, u64)]) {
        *self
            .per_source
            .lock()
            .unwrap()
            .entry(signal.source_id().to_string())
            .or_default() += signal.count();
        self.rankings.lock().unwrap().push(ranking.to_vec());
    }
}
