//! Per-request outcome records handed to the sink

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a single task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The action completed without error.
    Success,
    /// The target answered with a 4xx status.
    ClientError,
    /// The target answered with a 5xx status.
    ServerError,
    /// Connection-level failure before a response was obtained.
    TransportError,
    /// The request exceeded its deadline.
    Timeout,
}

impl OutcomeKind {
    /// Whether this outcome counts as a success.
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeKind::Success)
    }
}

/// One task execution, timed and classified.
///
/// Produced by a virtual user for every request and handed straight to the
/// [`OutcomeSink`](crate::traits::OutcomeSink); the engine never retains
/// these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Name of the executed task.
    pub task: String,

    /// Id of the virtual user that ran it.
    pub user: usize,

    /// Wall-clock time the execution started.
    pub started_at: DateTime<Utc>,

    /// How long the execution took.
    pub duration: Duration,

    /// Result classification.
    pub outcome: OutcomeKind,
}

impl OutcomeRecord {
    /// Whether the execution succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
