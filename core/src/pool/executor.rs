//! Pool execution logic

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Instant};

use crate::config::{ConfigError, PoolConfig, RampStrategy};
use crate::error::{Error, Result};
use crate::taskset::TaskSet;
use crate::traits::OutcomeSink;
use crate::user::{UserBuilder, UserStats};

use super::aggregator::{aggregate_user_stats, PoolSummary};

/// Lifecycle states of a [`UserPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Built but not started
    Idle,
    /// Spawning users toward the target population
    Ramping,
    /// Full population running
    Steady,
    /// Stop signalled, waiting for users to exit
    Draining,
    /// All users joined or abandoned
    Stopped,
}

struct UserHandle {
    id: usize,
    stop: watch::Sender<bool>,
    join: JoinHandle<Result<UserStats>>,
}

/// Manages the lifecycle of the virtual-user population.
///
/// Responsible for ramp-up, steady-state supervision, runtime resizing, and
/// grace-bounded drain on stop. Each user gets its own stop flag so the
/// pool can address individuals (resize) or everyone (stop) without
/// touching the rate behavior of users it leaves running.
pub struct UserPool {
    config: PoolConfig,
    tasks: Arc<TaskSet>,
    sink: Arc<dyn OutcomeSink>,
    users: Vec<UserHandle>,
    retired: Vec<UserStats>,
    state: PoolState,
    next_id: usize,
}

impl UserPool {
    /// Create a new pool.
    ///
    /// Use [`PoolBuilder`](super::PoolBuilder) for a more ergonomic
    /// construction.
    pub fn new(config: PoolConfig, tasks: Arc<TaskSet>, sink: Arc<dyn OutcomeSink>) -> Self {
        Self {
            config,
            tasks,
            sink,
            users: Vec::new(),
            retired: Vec::new(),
            state: PoolState::Idle,
            next_id: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PoolState {
        self.state
    }

    /// Number of currently live users.
    pub fn population(&self) -> usize {
        self.users.len()
    }

    /// Pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Launch the configured population.
    ///
    /// Moves `Idle -> Ramping -> Steady`. With a staggered ramp the call
    /// returns once the full population is live. A configuration error
    /// stops the pool and is surfaced to the caller.
    pub async fn start(&mut self) -> Result<()> {
        if self.state != PoolState::Idle {
            return Err(Error::pool(format!(
                "start requires an idle pool, state is {:?}",
                self.state
            )));
        }

        if let Err(err) = self.config.validate() {
            self.state = PoolState::Stopped;
            tracing::error!(error = %err, "refusing to start with invalid configuration");
            return Err(err.into());
        }

        self.state = PoolState::Ramping;
        tracing::info!(
            users = self.config.users,
            user_rate = ?self.config.user_rate,
            ramp = ?self.config.ramp,
            "starting user pool"
        );

        for spawned in 0..self.config.users {
            self.spawn_user()?;
            if let RampStrategy::Staggered { spawn_interval } = self.config.ramp {
                if spawned + 1 < self.config.users {
                    tokio::time::sleep(spawn_interval).await;
                }
            }
        }

        self.state = PoolState::Steady;
        tracing::info!(population = self.users.len(), "user pool steady");
        Ok(())
    }

    /// Grow or shrink the live population.
    ///
    /// Extra users are spawned immediately; surplus users (most recently
    /// spawned first) are drained with the same grace bound as [`stop`].
    /// Surviving users are never touched, so their pacing is undisturbed.
    ///
    /// [`stop`]: UserPool::stop
    pub async fn resize(&mut self, new_count: usize) -> Result<()> {
        if self.state != PoolState::Steady {
            return Err(Error::pool(format!(
                "resize requires a steady pool, state is {:?}",
                self.state
            )));
        }
        if new_count == 0 {
            return Err(Error::Config(ConfigError::InvalidUserCount(
                "cannot resize to zero users".into(),
            )));
        }

        self.reap().await;

        let current = self.users.len();
        tracing::info!(from = current, to = new_count, "resizing user pool");

        if new_count > current {
            for _ in current..new_count {
                self.spawn_user()?;
            }
        } else {
            let surplus = self.users.split_off(new_count);
            self.drain(surplus).await;
        }

        self.config.users = new_count;
        Ok(())
    }

    /// Drain the whole population and return the aggregated run summary.
    ///
    /// Moves `-> Draining -> Stopped` and always attempts the clean drain
    /// first: every user is signalled, then joined against the grace
    /// deadline. Users still running when the deadline passes are aborted
    /// and their in-flight work discarded, keeping shutdown latency bounded
    /// by roughly one task duration plus the grace timeout.
    pub async fn stop(&mut self) -> Result<PoolSummary> {
        match self.state {
            PoolState::Ramping | PoolState::Steady => {}
            state => {
                return Err(Error::pool(format!(
                    "stop requires a running pool, state is {state:?}"
                )));
            }
        }

        self.state = PoolState::Draining;
        tracing::info!(population = self.users.len(), "draining user pool");

        let handles = std::mem::take(&mut self.users);
        let abandoned = self.drain(handles).await;

        self.state = PoolState::Stopped;
        let summary = aggregate_user_stats(&self.retired);
        tracing::info!(
            users = summary.users,
            completed = summary.completed,
            failed = summary.failed,
            abandoned,
            "user pool stopped"
        );
        Ok(summary)
    }

    /// Collect users whose loops already exited on their own.
    ///
    /// A user terminates early only on an unrecoverable scheduling error or
    /// a panic; both are logged here and the rest of the population keeps
    /// running. Returns how many users were collected.
    pub async fn reap(&mut self) -> usize {
        let mut live = Vec::with_capacity(self.users.len());
        let mut reaped = 0;

        for mut handle in std::mem::take(&mut self.users) {
            if !handle.join.is_finished() {
                live.push(handle);
                continue;
            }

            reaped += 1;
            match (&mut handle.join).await {
                Ok(Ok(stats)) => {
                    tracing::debug!(user_id = handle.id, "collected exited user");
                    self.retired.push(stats);
                }
                Ok(Err(err)) => {
                    tracing::error!(user_id = handle.id, error = %err, "virtual user failed");
                }
                Err(join_err) => {
                    tracing::error!(
                        user_id = handle.id,
                        error = %join_err,
                        "virtual user task panicked"
                    );
                }
            }
        }

        self.users = live;
        reaped
    }

    fn spawn_user(&mut self) -> Result<()> {
        let id = self.next_id;
        self.next_id += 1;

        let user = UserBuilder::new(id)
            .tasks(Arc::clone(&self.tasks))
            .sink(Arc::clone(&self.sink))
            .rate(self.config.user_rate)
            .build()?;

        let (stop, stop_rx) = watch::channel(false);
        let join = tokio::spawn(user.run(stop_rx));
        self.users.push(UserHandle { id, stop, join });
        tracing::debug!(user_id = id, "spawned virtual user");
        Ok(())
    }

    /// Signal the given users and join them against the grace deadline.
    /// Returns how many had to be abandoned.
    async fn drain(&mut self, handles: Vec<UserHandle>) -> usize {
        for handle in &handles {
            let _ = handle.stop.send(true);
        }

        let deadline = Instant::now() + self.config.grace;
        let mut abandoned = 0;

        for mut handle in handles {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match timeout(remaining, &mut handle.join).await {
                Ok(Ok(Ok(stats))) => {
                    self.retired.push(stats);
                }
                Ok(Ok(Err(err))) => {
                    tracing::error!(user_id = handle.id, error = %err, "virtual user failed");
                }
                Ok(Err(join_err)) => {
                    tracing::error!(
                        user_id = handle.id,
                        error = %join_err,
                        "virtual user task panicked"
                    );
                }
                Err(_) => {
                    handle.join.abort();
                    abandoned += 1;
                    tracing::warn!(
                        user_id = handle.id,
                        "grace timeout expired, abandoning in-flight task"
                    );
                }
            }
        }

        abandoned
    }
}

impl fmt::Debug for UserPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPool")
            .field("state", &self.state)
            .field("population", &self.users.len())
            .field("config", &self.config)
            .finish()
    }
}
