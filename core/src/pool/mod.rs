//! User pool lifecycle management
//!
//! The pool owns the virtual-user population: it ramps users up according
//! to the configured strategy, keeps them running, resizes the population
//! at runtime, and drains everyone on stop with a bounded grace timeout.
//!
//! Lifecycle: `Idle -> Ramping -> Steady -> Draining -> Stopped`. A
//! user-initiated stop always attempts a clean drain first; users still
//! running when the grace timeout expires are abandoned so shutdown latency
//! stays bounded. The pool is the engine's only synchronization point and
//! is touched during start/stop/resize only, never on the per-request path.
//!
//! # Example
//!
//! ```ignore
//! use loadswarm_core::{ChannelConfig, ChannelSink, PoolBuilder};
//!
//! let (sink, outcomes) = ChannelSink::channel(&ChannelConfig::default());
//! let mut pool = PoolBuilder::new()
//!     .users(500)
//!     .user_rate(Some(0.1))
//!     .tasks(tasks)
//!     .sink(Arc::new(sink))
//!     .build()?;
//!
//! pool.start().await?;
//! tokio::time::sleep(Duration::from_secs(60)).await;
//! let summary = pool.stop().await?;
//! println!("completed: {}", summary.completed);
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_user_stats, PoolSummary};
pub use builder::PoolBuilder;
pub use executor::{PoolState, UserPool};

#[cfg(test)]
mod tests;
