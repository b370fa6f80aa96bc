//! loadswarm-core: scheduling and pacing engine for the loadswarm load
//! generator
//!
//! This crate simulates a population of concurrent virtual users, each
//! repeatedly drawing a weighted-random task and executing it at a
//! controlled per-user request rate, while handing raw outcome records to
//! an external aggregator.
//!
//! The main building blocks are:
//!
//! - [`TaskSet`]: an immutable, weighted catalog of task definitions with a
//!   precomputed cumulative weight table for unbiased selection.
//! - [`RateLimiter`](user::RateLimiter): per-user constant-throughput
//!   pacing on a self-correcting absolute schedule.
//! - [`VirtualUser`](user::VirtualUser): one simulated client running the
//!   pace -> select -> execute -> report loop.
//! - [`UserPool`](pool::UserPool): lifecycle management for the whole
//!   population, from ramp-up through steady state and runtime resizing to
//!   the grace-bounded drain.
//! - [`OutcomeSink`](traits::OutcomeSink): the collaborator contract that
//!   receives per-request outcome records; reporting and aggregation live
//!   behind it, outside this crate.
//!
//! Control flow is one-directional: the pool spawns users, users execute
//! tasks, and only outcome records flow back up. Task bodies, transports,
//! and fixture data are all pluggable collaborators; see the
//! `loadswarm-transport` crate for the HTTP client tasks typically capture.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use loadswarm_core::{ChannelConfig, ChannelSink, PoolBuilder, Task, TaskSet};
//!
//! let tasks = TaskSet::build(vec![
//!     Task::new("get_by_id", 100, { let c = client.clone(); move || {
//!         let c = c.clone();
//!         async move { c.get("/items/10", &[]).await }
//!     }}),
//!     Task::new("search_by_name", 200, { let c = client.clone(); move || {
//!         let c = c.clone();
//!         async move { c.get("/items", &[("name", "widget")]).await }
//!     }}),
//! ])?;
//!
//! let (sink, mut outcomes) = ChannelSink::channel(&ChannelConfig::default());
//! tokio::spawn(async move {
//!     while let Some(record) = outcomes.recv().await {
//!         // hand off to the aggregator of your choice
//!     }
//! });
//!
//! let mut pool = PoolBuilder::new()
//!     .users(500)
//!     .user_rate(Some(0.1))
//!     .grace(Duration::from_secs(5))
//!     .tasks(tasks)
//!     .sink(Arc::new(sink))
//!     .build()?;
//!
//! pool.start().await?;
//! tokio::time::sleep(Duration::from_secs(60)).await;
//! let summary = pool.stop().await?;
//! println!("total: {}", summary.total_requests());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod error;
pub mod outcome;
pub mod pool;
pub mod sink;
pub mod taskset;
pub mod traits;
pub mod user;

pub use channel::ChannelConfig;
pub use config::{ConfigError, PoolConfig, RampStrategy};
pub use error::{Error, Result};
pub use outcome::{OutcomeKind, OutcomeRecord};
pub use pool::{aggregate_user_stats, PoolBuilder, PoolState, PoolSummary, UserPool};
pub use sink::{ChannelSink, NullSink};
pub use taskset::{ActionFuture, Task, TaskSet};
pub use traits::{ActionError, OutcomeSink};
pub use user::{RateLimiter, UserBuilder, UserStats, VirtualUser};
