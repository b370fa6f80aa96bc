//! Per-user statistics tracking

use std::time::Instant;

/// Counters tracked by each virtual user
#[derive(Debug, Default, Clone)]
pub struct UserStats {
    /// Number of successfully completed executions
    pub completed: usize,

    /// Number of failed executions
    pub failed: usize,

    /// Loop start time
    pub started_at: Option<Instant>,

    /// Loop end time
    pub ended_at: Option<Instant>,
}

impl UserStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Total number of executions (completed + failed)
    pub fn total_requests(&self) -> usize {
        self.completed + self.failed
    }

    /// Success rate as a fraction (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_requests() == 0 {
            0.0
        } else {
            self.completed as f64 / self.total_requests() as f64
        }
    }

    /// Failure rate as a fraction (0.0 - 1.0)
    pub fn failure_rate(&self) -> f64 {
        1.0 - self.success_rate()
    }

    /// Elapsed time since start
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Executions per second over the tracked window
    pub fn requests_per_second(&self) -> f64 {
        self.elapsed()
            .map(|d| {
                let secs = d.as_secs_f64();
                if secs > 0.0 {
                    self.total_requests() as f64 / secs
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0)
    }

    /// Record a successful execution
    pub fn record_success(&mut self) {
        self.completed += 1;
    }

    /// Record a failed execution
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Merge counters from another user
    pub fn merge(&mut self, other: &UserStats) {
        self.completed += other.completed;
        self.failed += other.failed;
    }
}
