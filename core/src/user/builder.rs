//! Builder pattern for virtual user construction

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::taskset::TaskSet;
use crate::traits::OutcomeSink;

use super::executor::VirtualUser;
use super::rate_limiter::RateLimiter;

/// Builder for [`VirtualUser`] instances
///
/// # Example
/// ```ignore
/// let user = UserBuilder::new(0)
///     .tasks(tasks)
///     .sink(sink)
///     .rate(Some(0.1))
///     .build()?;
/// ```
pub struct UserBuilder {
    id: usize,
    tasks: Option<Arc<TaskSet>>,
    sink: Option<Arc<dyn OutcomeSink>>,
    rate: Option<f64>,
}

impl UserBuilder {
    /// Create a new builder for the user with the given id
    pub fn new(id: usize) -> Self {
        Self {
            id,
            tasks: None,
            sink: None,
            rate: None,
        }
    }

    /// Set the shared task set
    pub fn tasks(mut self, tasks: Arc<TaskSet>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Set the shared outcome sink
    pub fn sink(mut self, sink: Arc<dyn OutcomeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the target request rate (requests per second)
    pub fn rate(mut self, rate: Option<f64>) -> Self {
        self.rate = rate;
        self
    }

    /// Build the virtual user
    ///
    /// # Errors
    /// Returns an error if the task set or the sink was never provided.
    pub fn build(self) -> Result<VirtualUser> {
        let tasks = self.tasks.ok_or(Error::MissingField("tasks"))?;
        let sink = self.sink.ok_or(Error::MissingField("sink"))?;

        Ok(VirtualUser::new(
            self.id,
            tasks,
            sink,
            RateLimiter::new(self.rate),
            SmallRng::from_entropy(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NullSink;
    use crate::taskset::Task;

    fn task_set() -> Arc<TaskSet> {
        Arc::new(TaskSet::build(vec![Task::new("noop", 1, || async { Ok(()) })]).unwrap())
    }

    #[test]
    fn test_builder_missing_tasks() {
        let result = UserBuilder::new(0).sink(Arc::new(NullSink)).build();
        assert!(matches!(result, Err(Error::MissingField("tasks"))));
    }

    #[test]
    fn test_builder_missing_sink() {
        let result = UserBuilder::new(0).tasks(task_set()).build();
        assert!(matches!(result, Err(Error::MissingField("sink"))));
    }

    #[test]
    fn test_builder_complete() {
        let user = UserBuilder::new(3)
            .tasks(task_set())
            .sink(Arc::new(NullSink))
            .rate(Some(10.0))
            .build()
            .unwrap();

        assert_eq!(user.id(), 3);
    }
}
