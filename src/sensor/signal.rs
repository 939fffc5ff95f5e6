//! Signal value type

use std::time::SystemTime;

/// One timestamped count reading from one source
///
/// Immutable once created; it moves from producer to channel to consumer.
///
/// # Example
///
/// ```rust
/// use signalrank::sensor::Signal;
///
/// let signal = Signal::new("TrafficLight1", 42);
/// assert_eq!(signal.source_id(), "TrafficLight1");
/// assert_eq!(signal.count(), 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    timestamp: SystemTime,
    source_id: String,
    count: u64,
}

impl Signal {
    /// Create a reading stamped with the current system time
    pub fn new(source_id: impl Into<String>, count: u64) -> Self {
        Self::with_timestamp(SystemTime::now(), source_id, count)
    }

    pub fn with_timestamp(timestamp: SystemTime, source_id: impl Into<String>, count: u64) -> Self {
        Self {
            timestamp,
            source_id: source_id.into(),
            count,
        }
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}
