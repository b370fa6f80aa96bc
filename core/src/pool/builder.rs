//! Builder pattern for pool construction

use std::sync::Arc;
use std::time::Duration;

use crate::config::{PoolConfig, RampStrategy};
use crate::error::{Error, Result};
use crate::taskset::TaskSet;
use crate::traits::OutcomeSink;

use super::executor::UserPool;

/// Builder for creating a [`UserPool`] with proper configuration
///
/// # Example
///
/// ```ignore
/// let mut pool = PoolBuilder::new()
///     .users(500)
///     .user_rate(Some(0.1))
///     .grace(Duration::from_secs(5))
///     .tasks(tasks)
///     .sink(sink)
///     .build()?;
/// ```
pub struct PoolBuilder {
    config: PoolConfig,
    tasks: Option<Arc<TaskSet>>,
    sink: Option<Arc<dyn OutcomeSink>>,
}

impl PoolBuilder {
    /// Create a new pool builder with default configuration
    pub fn new() -> Self {
        Self {
            config: PoolConfig::default(),
            tasks: None,
            sink: None,
        }
    }

    /// Set the full pool configuration
    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the target user count
    pub fn users(mut self, users: usize) -> Self {
        self.config.users = users;
        self
    }

    /// Set the per-user request rate (requests per second)
    pub fn user_rate(mut self, rate: Option<f64>) -> Self {
        self.config.user_rate = rate;
        self
    }

    /// Set the ramp strategy
    pub fn ramp(mut self, ramp: RampStrategy) -> Self {
        self.config.ramp = ramp;
        self
    }

    /// Set the shutdown grace timeout
    pub fn grace(mut self, grace: Duration) -> Self {
        self.config.grace = grace;
        self
    }

    /// Set the weighted task set
    pub fn tasks(mut self, tasks: TaskSet) -> Self {
        self.tasks = Some(Arc::new(tasks));
        self
    }

    /// Set the outcome sink
    pub fn sink(mut self, sink: Arc<dyn OutcomeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the pool
    ///
    /// Semantic configuration validation happens in
    /// [`UserPool::start`](super::UserPool::start), which surfaces a fatal
    /// `ConfigError` and moves the pool to `Stopped`.
    ///
    /// # Errors
    /// Returns an error if the task set or the sink was never provided.
    pub fn build(self) -> Result<UserPool> {
        let tasks = self.tasks.ok_or(Error::MissingField("tasks"))?;
        let sink = self.sink.ok_or(Error::MissingField("sink"))?;

        Ok(UserPool::new(self.config, tasks, sink))
    }
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
