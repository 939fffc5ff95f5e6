//! Leaderboard rows handed to reporters

use serde::Serialize;

/// One ranked row: 1-based position, source identifier and cumulative total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub source_id: String,
    pub total: u64,
}

impl LeaderboardEntry {
    /// Number a ranking as produced by [`RankedAggregate::snapshot`](super::RankedAggregate::snapshot)
    pub fn from_ranking(ranking: &[(String, u64)]) -> Vec<Self> {
        ranking
            .iter()
            .enumerate()
            .map(|(index, (source_id, total))| Self {
                rank: index + 1,
                source_id: source_id.clone(),
                total: *total,
            })
            .collect()
    }
}
