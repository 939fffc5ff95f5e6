//! Producer driver
//!
//! Pulls readings from a [`SignalSource`] and pushes them into the shared
//! channel at a fixed interval until cancelled or until its signal limit is
//! reached.

use crate::channel::api::{BoundedChannel, CancellationToken, ChannelError};
use crate::sensor::signal::Signal;
use crate::sensor::source::SignalSource;
use std::time::Duration;

/// Producer pacing and limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerSettings {
    /// Pause between two readings
    pub interval: Duration,
    /// Stop after this many readings; `None` runs until cancelled
    pub max_signals: Option<u64>,
}

impl Default for ProducerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_signals: None,
        }
    }
}

/// What a producer did before it stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerStats {
    pub name: String,
    /// Signals successfully handed to the channel
    pub produced: u64,
    /// Sum of the counts of those signals
    pub total_count: u64,
    /// True when the run ended through cancellation rather than the limit
    pub cancelled: bool,
}

pub struct Producer<S: SignalSource> {
    name: String,
    channel: BoundedChannel<Signal>,
    source: S,
    settings: ProducerSettings,
}

impl<S: SignalSource> Producer<S> {
    pub fn new(
        name: impl Into<String>,
        channel: BoundedChannel<Signal>,
        source: S,
        settings: ProducerSettings,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            source,
            settings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn limit_reached(&self, produced: u64) -> bool {
        self.settings.max_signals.is_some_and(|max| produced >= max)
    }

    /// Run until cancelled or until the configured limit is reached
    pub fn run(&mut self, token: &CancellationToken) -> ProducerStats {
        let mut stats = ProducerStats {
            name: self.name.clone(),
            ..Default::default()
        };
        log::info!("{} started", self.name);

        while !self.limit_reached(stats.produced) {
            let signal = self.source.next_signal();
            let count = signal.count();
            let source_id = signal.source_id().to_string();

            match self.channel.put(signal, token) {
                Ok(()) => {
                    stats.produced += 1;
                    stats.total_count += count;
                    log::trace!("{} sent {}={}", self.name, source_id, count);
                }
                Err(ChannelError::Cancelled) => {
                    stats.cancelled = true;
                    break;
                }
            }

            if self.limit_reached(stats.produced) {
                break;
            }
            if token.sleep(self.settings.interval) {
                stats.cancelled = true;
                break;
            }
        }

        if stats.cancelled {
            log::debug!("{} cancelled after {} signals", self.name, stats.produced);
        } else {
            log::info!("{} finished after {} signals", self.name, stats.produced);
        }
        stats
    }
}
