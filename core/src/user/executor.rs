//! Virtual user execution loop

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::rngs::SmallRng;
use tokio::sync::watch;

use crate::error::Result;
use crate::outcome::{OutcomeKind, OutcomeRecord};
use crate::taskset::TaskSet;
use crate::traits::OutcomeSink;

use super::rate_limiter::RateLimiter;
use super::stats::UserStats;

/// One simulated client.
///
/// A virtual user repeatedly waits on its rate limiter, draws a weighted
/// task, executes it, and reports the classified outcome to the sink.
/// The limiter, rng, and counters are owned outright; the task set and sink
/// are shared read-only, so the loop takes no locks.
pub struct VirtualUser {
    id: usize,
    tasks: Arc<TaskSet>,
    sink: Arc<dyn OutcomeSink>,
    limiter: RateLimiter,
    rng: SmallRng,
    stats: UserStats,
}

impl VirtualUser {
    pub(crate) fn new(
        id: usize,
        tasks: Arc<TaskSet>,
        sink: Arc<dyn OutcomeSink>,
        limiter: RateLimiter,
        rng: SmallRng,
    ) -> Self {
        Self {
            id,
            tasks,
            sink,
            limiter,
            rng,
            stats: UserStats::new(),
        }
    }

    /// Unique id of this user.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Run the request loop until `stop` flips to true.
    ///
    /// A failing task action is classified, recorded, and survived; it never
    /// terminates the user. A task selection failure is unrecoverable and
    /// ends this user's loop with an error, which the pool reaps without
    /// disturbing other users. The stop flag is observed while waiting on
    /// the limiter and again after every execution, so at most one in-flight
    /// task delays exit.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> Result<UserStats> {
        self.stats.start();
        tracing::debug!(user_id = self.id, "virtual user started");

        loop {
            tokio::select! {
                biased;
                _ = stop.wait_for(|stopped| *stopped) => break,
                _ = self.limiter.acquire() => {}
            }

            let task = match self.tasks.select(&mut self.rng) {
                Ok(task) => task,
                Err(err) => {
                    self.stats.stop();
                    tracing::error!(
                        user_id = self.id,
                        error = %err,
                        "task selection failed, terminating user"
                    );
                    return Err(err);
                }
            };

            let started_at = Utc::now();
            let started = Instant::now();
            let outcome = match task.invoke().await {
                Ok(()) => OutcomeKind::Success,
                Err(err) => {
                    tracing::warn!(
                        user_id = self.id,
                        task = task.name(),
                        error = %err,
                        "task execution failed"
                    );
                    err.kind()
                }
            };
            let duration = started.elapsed();

            if outcome.is_success() {
                self.stats.record_success();
            } else {
                self.stats.record_failure();
            }
            self.sink.record(OutcomeRecord {
                task: task.name().to_string(),
                user: self.id,
                started_at,
                duration,
                outcome,
            });

            if *stop.borrow() {
                break;
            }
        }

        self.stats.stop();
        tracing::debug!(
            user_id = self.id,
            completed = self.stats.completed,
            failed = self.stats.failed,
            "virtual user stopped"
        );
        Ok(self.stats)
    }
}

impl fmt::Debug for VirtualUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualUser")
            .field("id", &self.id)
            .field("tasks", &self.tasks.len())
            .field("limiter", &self.limiter)
            .finish()
    }
}
