//! Test modules for the sensor workers


use crate::report::Reporter;
use crate::sensor::Signal;
use std::sync::Mutex;

/// Reporter that keeps every ranking it receives
#[derive(Default)]
pub(super) struct RecordingReporter {
    pub reports: Mutex<Vec<(String, Vec<(String, u64)>)>>,
}

impl Reporter for RecordingReporter {
    fn report(&self, signal: &Signal, ranking: &[(String, u64)]) {
        self.reports
            .lock()
            .unwrap()
            .push((signal.source_id().to_string(), ranking.to_vec()));
    }
}
