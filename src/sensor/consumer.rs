//! Consumer driver
//!
//! Pulls readings from the shared channel, folds each into the shared
//! [`RankedAggregate`] and hands the fresh ranking to a [`Reporter`].

use crate::channel::api::{BoundedChannel, CancellationToken, ChannelError};
use crate::ranking::RankedAggregate;
use crate::report::Reporter;
use crate::sensor::signal::Signal;
use std::sync::Arc;

/// What a consumer did before it stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    pub name: String,
    /// Signals taken from the channel and folded into the aggregate
    pub consumed: u64,
    /// Sum of the counts of those signals
    pub total_count: u64,
}

pub struct Consumer {
    name: String,
    channel: BoundedChannel<Signal>,
    aggregate: Arc<RankedAggregate>,
    reporter: Arc<dyn Reporter>,
}

impl Consumer {
    pub fn new(
        name: impl Into<String>,
        channel: BoundedChannel<Signal>,
        aggregate: Arc<RankedAggregate>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            aggregate,
            reporter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run until the token is cancelled
    pub fn run(&self, token: &CancellationToken) -> ConsumerStats {
        let mut stats = ConsumerStats {
            name: self.name.clone(),
            ..Default::default()
        };
        log::info!("{} started", self.name);

        loop {
            let signal = match self.channel.get(token) {
                Ok(signal) => signal,
                Err(ChannelError::Cancelled) => break,
            };

            self.aggregate.update(signal.source_id(), signal.count());
            stats.consumed += 1;
            stats.total_count += signal.count();
            log::trace!(
                "{} folded {}={}",
                self.name,
                signal.source_id(),
                signal.count()
            );

            self.reporter.report(&signal, &self.aggregate.snapshot());
        }

        log::debug!("{} cancelled after {} signals", self.name, stats.consumed);
        stats
    }
}
