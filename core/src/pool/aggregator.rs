//! Run summaries aggregated from per-user counters

use std::time::Duration;

use crate::user::UserStats;

/// Aggregated counters for a whole pool run
#[derive(Debug, Clone, Default)]
pub struct PoolSummary {
    /// Users whose final counters were collected
    pub users: usize,

    /// Total successful executions
    pub completed: usize,

    /// Total failed executions
    pub failed: usize,

    /// Longest single-user elapsed time
    pub duration: Duration,

    /// Overall execution throughput across the population
    pub requests_per_second: f64,
}

impl PoolSummary {
    /// Total number of executions (completed + failed)
    pub fn total_requests(&self) -> usize {
        self.completed + self.failed
    }

    /// Success rate as a fraction (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            self.completed as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Failure rate as a fraction (0.0 - 1.0)
    pub fn failure_rate(&self) -> f64 {
        1.0 - self.success_rate()
    }
}

/// Merge per-user counters into one summary
pub fn aggregate_user_stats(stats: &[UserStats]) -> PoolSummary {
    if stats.is_empty() {
        return PoolSummary::default();
    }

    let completed: usize = stats.iter().map(|s| s.completed).sum();
    let failed: usize = stats.iter().map(|s| s.failed).sum();

    // The run lasted as long as its longest-lived user.
    let duration = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    let secs = duration.as_secs_f64();
    let requests_per_second = if secs > 0.0 {
        (completed + failed) as f64 / secs
    } else {
        0.0
    };

    PoolSummary {
        users: stats.len(),
        completed,
        failed,
        duration,
        requests_per_second,
    }
}
