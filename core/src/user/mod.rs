//! Virtual user module
//!
//! The virtual user is the core execution unit in loadswarm, responsible
//! for the simple but critical loop: **pace -> select -> execute -> report
//! -> repeat**.
//!
//! Each user is one tokio task that:
//!
//! 1. Waits on its own [`RateLimiter`] for the next permitted slot
//! 2. Draws a task from the shared weighted [`TaskSet`](crate::TaskSet)
//! 3. Executes the task action, timing it
//! 4. Classifies the result and hands an outcome record to the sink
//! 5. Repeats until its stop flag flips
//!
//! Users own their limiter, rng, and counters outright and share the task
//! set and sink read-only, so nothing on the per-request path takes a lock
//! and nothing one user does can stall another.
//!
//! # Example
//!
//! ```ignore
//! use loadswarm_core::{Task, TaskSet, UserBuilder};
//!
//! let tasks = TaskSet::build(vec![Task::new("ping", 1, || async { Ok(()) })])?;
//! let user = UserBuilder::new(0)
//!     .tasks(Arc::new(tasks))
//!     .sink(sink)
//!     .rate(Some(0.1))
//!     .build()?;
//!
//! let stats = user.run(stop_rx).await?;
//! println!("completed: {}", stats.completed);
//! ```

mod builder;
mod executor;
mod rate_limiter;
mod stats;

pub use builder::UserBuilder;
pub use executor::VirtualUser;
pub use rate_limiter::RateLimiter;
pub use stats::UserStats;
