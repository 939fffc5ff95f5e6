//! RankedAggregate implementation
//!
//! Source counts are expected to stay in the tens, so the standings are a
//! single vector: a linear scan finds or inserts the source, then the whole
//! vector is re-sorted before the lock is released. Readers therefore only
//! ever see a fully sorted ranking.

use crate::core::sync::recover_poison;
use crate::ranking::entry::LeaderboardEntry;
use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Standings {
    /// Sorted by total descending, then source id ascending
    ranking: Vec<(String, u64)>,
    grand_total: u64,
    updates: u64,
}

/// Shared, linearizable per-source totals with a ranked view
///
/// Consumers hold it behind an `Arc` and call [`update`](Self::update)
/// concurrently; every call is serialized by one internal lock.
///
/// # Example
///
/// ```rust
/// use signalrank::ranking::RankedAggregate;
///
/// let aggregate = RankedAggregate::new();
/// aggregate.update("X", 3);
/// aggregate.update("Y", 5);
/// aggregate.update("X", 2);
///
/// assert_eq!(
///     aggregate.snapshot(),
///     vec![("X".to_string(), 5), ("Y".to_string(), 5)]
/// );
/// ```
#[derive(Debug, Default)]
pub struct RankedAggregate {
    standings: Mutex<Standings>,
}

/// Ranking order: higher total first, then identifier ascending
fn rank_order(a: &(String, u64), b: &(String, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

impl RankedAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Standings> {
        recover_poison(self.standings.lock(), "ranked aggregate")
    }

    /// Add `count` to the total for `source_id`, inserting it if new
    ///
    /// Identifiers are matched exactly (case-sensitive).
    pub fn update(&self, source_id: &str, count: u64) {
        let mut guard = self.lock();
        let standings = &mut *guard;

        match standings
            .ranking
            .iter_mut()
            .find(|(id, _)| id.as_str() == source_id)
        {
            Some((_, total)) => *total += count,
            None => {
                log::debug!("New source '{}' joined the ranking", source_id);
                standings.ranking.push((source_id.to_string(), count));
            }
        }
        standings.grand_total += count;
        standings.updates += 1;

        // Identifiers are unique, so the order is total and stability is moot
        standings.ranking.sort_unstable_by(rank_order);
    }

    /// Current ranking, sorted by total descending
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.lock().ranking.clone()
    }

    /// The first `n` rows of the ranking
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        self.lock().ranking.iter().take(n).cloned().collect()
    }

    /// Numbered ranking rows for reporting
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        LeaderboardEntry::from_ranking(&self.lock().ranking)
    }

    pub fn total_for(&self, source_id: &str) -> Option<u64> {
        self.lock()
            .ranking
            .iter()
            .find(|(id, _)| id.as_str() == source_id)
            .map(|(_, total)| *total)
    }

    /// Sum of every count ever folded in
    pub fn grand_total(&self) -> u64 {
        self.lock().grand_total
    }

    /// Number of `update` calls applied so far
    pub fn update_count(&self) -> u64 {
        self.lock().updates
    }

    /// Number of distinct sources
    pub fn len(&self) -> usize {
        self.lock().ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().ranking.is_empty()
    }
}
