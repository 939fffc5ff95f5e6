//! Sensor network workers
//!
//! [`Producer`]s turn readings from a [`SignalSource`] into channel puts;
//! [`Consumer`]s turn channel gets into aggregate updates and reports. Both
//! are plain structs driven on their own OS thread, each with its own
//! cancellation token.

mod consumer;
mod producer;
mod signal;
mod source;

pub use consumer::{Consumer, ConsumerStats};
pub use producer::{Producer, ProducerSettings, ProducerStats};
pub use signal::Signal;
pub use source::{source_name, RandomSignalSource, SignalSource};

#[cfg(test)]
mod tests;
