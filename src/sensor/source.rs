//! Signal sources: the clock and RNG collaborators behind each producer

use crate::sensor::signal::Signal;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the next reading for a producer
///
/// Any `FnMut() -> Signal` closure is a source, which keeps scripted
/// sources in tests short.
pub trait SignalSource: Send {
    fn next_signal(&mut self) -> Signal;
}

impl<F> SignalSource for F
where
    F: FnMut() -> Signal + Send,
{
    fn next_signal(&mut self) -> Signal {
        self()
    }
}

/// Readings for one fixed location with counts drawn uniformly from `0..=max_count`
#[derive(Debug)]
pub struct RandomSignalSource {
    source_id: String,
    max_count: u64,
    rng: StdRng,
}

impl RandomSignalSource {
    pub fn new(source_id: impl Into<String>, max_count: u64) -> Self {
        Self {
            source_id: source_id.into(),
            max_count,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for reproducible runs
    pub fn with_seed(source_id: impl Into<String>, max_count: u64, seed: u64) -> Self {
        Self {
            source_id: source_id.into(),
            max_count,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

impl SignalSource for RandomSignalSource {
    fn next_signal(&mut self) -> Signal {
        let count = self.rng.gen_range(0..=self.max_count);
        Signal::new(self.source_id.clone(), count)
    }
}

/// Identifier for the `index`-th producer (1-based), e.g. `TrafficLight3`
pub fn source_name(prefix: &str, index: usize) -> String {
    format!("{}{}", prefix, index)
}
