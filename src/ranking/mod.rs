//! Ranked Aggregate
//!
//! Concurrently-updated cumulative counts per source, exposed as a ranking
//! by total descending. Equal totals are ordered by source identifier in
//! ascending byte order, so the ranking is a pure function of the totals and
//! never depends on update order or sort stability.

mod aggregate;
mod entry;

pub use aggregate::RankedAggregate;
pub use entry::LeaderboardEntry;
