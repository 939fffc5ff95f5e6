//! Simulation orchestration
//!
//! A [`Simulation`] owns the shared channel and aggregate and one OS thread
//! per worker. Tokens form a small tree:
//!
//! ```text
//! root
//! ├── producer-1 .. producer-N
//! └── consumers
//!     └── consumer-1 .. consumer-M
//! ```
//!
//! Cancelling the root stops everything at once; cancelling the consumer
//! branch alone is how a bounded run stops after the channel has drained.

use crate::app::config::SimulationConfig;
use crate::channel::api::{BoundedChannel, CancellationToken};
use crate::core::error::{SimulationError, SimulationResult};
use crate::ranking::{LeaderboardEntry, RankedAggregate};
use crate::report::Reporter;
use crate::sensor::{
    source_name, Consumer, ConsumerStats, Producer, ProducerSettings, ProducerStats,
    RandomSignalSource, Signal, SignalSource,
};
use std::any::Any;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often the drain loop looks at the channel
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

struct Worker<T> {
    name: String,
    handle: JoinHandle<T>,
}

/// Outcome of a finished run
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    pub producers: Vec<ProducerStats>,
    pub consumers: Vec<ConsumerStats>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub grand_total: u64,
    pub updates: u64,
    /// Names of workers that panicked instead of returning
    pub panicked: Vec<String>,
    pub elapsed: Duration,
}

impl SimulationReport {
    /// Sum of the counts handed to the channel
    pub fn produced_total(&self) -> u64 {
        self.producers.iter().map(|p| p.total_count).sum()
    }

    /// Sum of the counts folded into the aggregate
    pub fn consumed_total(&self) -> u64 {
        self.consumers.iter().map(|c| c.total_count).sum()
    }

    pub fn signals_produced(&self) -> u64 {
        self.producers.iter().map(|p| p.produced).sum()
    }

    pub fn signals_consumed(&self) -> u64 {
        self.consumers.iter().map(|c| c.consumed).sum()
    }
}

pub struct Simulation {
    channel: BoundedChannel<Signal>,
    aggregate: Arc<RankedAggregate>,
    root: CancellationToken,
    consumer_branch: CancellationToken,
    producers: Vec<Worker<ProducerStats>>,
    consumers: Vec<Worker<ConsumerStats>>,
    producer_stats: Vec<ProducerStats>,
    panicked: Vec<String>,
    started_at: Instant,
}

impl Simulation {
    /// Start producers fed by random readings
    ///
    /// Producer `n` reports as `<source_prefix><n>`; with a seed configured it
    /// draws from `seed + n`.
    pub fn start(config: &SimulationConfig, reporter: Arc<dyn Reporter>) -> SimulationResult<Self> {
        let prefix = config.source_prefix.clone();
        let max_count = config.max_count;
        let seed = config.seed;

        Self::start_with_sources(config, reporter, move |index| {
            let source_id = source_name(&prefix, index);
            match seed {
                Some(seed) => {
                    RandomSignalSource::with_seed(source_id, max_count, seed.wrapping_add(index as u64))
                }
                None => RandomSignalSource::new(source_id, max_count),
            }
        })
    }

    /// Start with a caller-supplied source for each producer (1-based index)
    pub fn start_with_sources<S, F>(
        config: &SimulationConfig,
        reporter: Arc<dyn Reporter>,
        mut make_source: F,
    ) -> SimulationResult<Self>
    where
        S: SignalSource + 'static,
        F: FnMut(usize) -> S,
    {
        config.validate()?;
        let channel = BoundedChannel::new(config.capacity)?;

        if config.producers == 0 {
            log::warn!("No producers configured; nothing will be sent");
        }
        if config.consumers == 0 {
            log::warn!("No consumers configured; producers will block once the channel fills");
        }

        let root = CancellationToken::new();
        let mut simulation = Self {
            channel,
            aggregate: Arc::new(RankedAggregate::new()),
            consumer_branch: root.child(),
            root,
            producers: Vec::with_capacity(config.producers),
            consumers: Vec::with_capacity(config.consumers),
            producer_stats: Vec::new(),
            panicked: Vec::new(),
            started_at: Instant::now(),
        };

        let settings = ProducerSettings {
            interval: config.interval,
            max_signals: config.max_signals,
        };

        for index in 1..=config.consumers {
            let name = format!("consumer-{}", index);
            let consumer = Consumer::new(
                name.clone(),
                simulation.channel.clone(),
                Arc::clone(&simulation.aggregate),
                Arc::clone(&reporter),
            );
            let token = simulation.consumer_branch.child();
            let handle = simulation.spawn(&name, move || consumer.run(&token))?;
            simulation.consumers.push(Worker { name, handle });
        }

        for index in 1..=config.producers {
            let name = format!("producer-{}", index);
            let mut producer = Producer::new(
                name.clone(),
                simulation.channel.clone(),
                make_source(index),
                settings.clone(),
            );
            let token = simulation.root.child();
            let handle = simulation.spawn(&name, move || producer.run(&token))?;
            simulation.producers.push(Worker { name, handle });
        }

        log::info!(
            "Simulation started: {} producers, {} consumers, capacity {}",
            config.producers,
            config.consumers,
            config.capacity
        );
        Ok(simulation)
    }

    fn spawn<T, F>(&self, name: &str, body: F) -> SimulationResult<JoinHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        thread::Builder::new()
            .name(name.to_string())
            .spawn(body)
            .map_err(|source| {
                // Whatever already runs must not outlive the failed start
                self.root.cancel();
                SimulationError::Spawn {
                    name: name.to_string(),
                    source,
                }
            })
    }

    pub fn channel(&self) -> &BoundedChannel<Signal> {
        &self.channel
    }

    pub fn aggregate(&self) -> &Arc<RankedAggregate> {
        &self.aggregate
    }

    /// The root token; cancelling it stops every worker
    pub fn token(&self) -> &CancellationToken {
        &self.root
    }

    pub fn shutdown(&self) {
        log::debug!("Cancelling all workers");
        self.root.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Block until every producer has returned
    ///
    /// Producers only return on their own in a bounded run; otherwise this
    /// waits for [`shutdown`](Self::shutdown).
    pub fn wait_producers(&mut self) -> &[ProducerStats] {
        for worker in std::mem::take(&mut self.producers) {
            match worker.handle.join() {
                Ok(stats) => self.producer_stats.push(stats),
                Err(payload) => self.record_panic(worker.name, payload),
            }
        }
        &self.producer_stats
    }

    /// Wait for the channel to empty, then stop the consumers
    ///
    /// Returns `false` if signals were still queued when `timeout` elapsed or
    /// the run was cancelled first.
    pub fn drain_and_stop(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut drained = self.channel.is_empty();

        while !drained && Instant::now() < deadline {
            if self.root.sleep(DRAIN_POLL_INTERVAL) {
                break;
            }
            drained = self.channel.is_empty();
        }

        if !drained {
            log::warn!(
                "Stopping consumers with {} signals still queued",
                self.channel.len()
            );
        }
        self.consumer_branch.cancel();
        drained
    }

    /// Cancel whatever is still running and collect the results
    pub fn join(mut self) -> SimulationReport {
        self.root.cancel();
        self.wait_producers();

        let mut consumer_stats = Vec::with_capacity(self.consumers.len());
        for worker in std::mem::take(&mut self.consumers) {
            match worker.handle.join() {
                Ok(stats) => consumer_stats.push(stats),
                Err(payload) => self.record_panic(worker.name, payload),
            }
        }

        let report = SimulationReport {
            producers: std::mem::take(&mut self.producer_stats),
            consumers: consumer_stats,
            leaderboard: self.aggregate.leaderboard(),
            grand_total: self.aggregate.grand_total(),
            updates: self.aggregate.update_count(),
            panicked: std::mem::take(&mut self.panicked),
            elapsed: self.started_at.elapsed(),
        };
        log::debug!(
            "Simulation joined after {:.2?}: {} signals produced, {} consumed",
            report.elapsed,
            report.signals_produced(),
            report.signals_consumed()
        );
        report
    }

    /// Bounded runs stop on their own once every producer reached its limit
    /// and the channel is drained; unbounded runs wait for cancellation.
    ///
    /// Without consumers nothing can empty the channel, so producers still
    /// blocked in `put` after `drain_timeout` are cancelled.
    pub fn run_to_completion(mut self, bounded: bool, drain_timeout: Duration) -> SimulationReport {
        if bounded {
            if self.consumers.is_empty() {
                self.stop_stalled_producers(drain_timeout);
            }
            self.wait_producers();
            if self.consumers.is_empty() {
                if !self.channel.is_empty() {
                    log::warn!("{} signals left in the channel with no consumers", self.channel.len());
                }
            } else if !self.root.is_cancelled() {
                self.drain_and_stop(drain_timeout);
            }
        } else {
            while !self.root.sleep(Duration::from_secs(3600)) {}
        }
        self.join()
    }

    fn producers_finished(&self) -> bool {
        self.producers.iter().all(|worker| worker.handle.is_finished())
    }

    fn stop_stalled_producers(&self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while !self.producers_finished() && Instant::now() < deadline {
            if self.root.sleep(DRAIN_POLL_INTERVAL) {
                return;
            }
        }
        if !self.producers_finished() {
            log::warn!(
                "No consumers to empty the channel; stopping producers after {:?}",
                timeout
            );
            self.root.cancel();
        }
    }

    fn record_panic(&mut self, name: String, payload: Box<dyn Any + Send>) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        log::error!("{} panicked: {}", name, message);
        self.panicked.push(name);
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        // Dropping without join detaches the threads; make sure they stop
        self.root.cancel();
    }
}
