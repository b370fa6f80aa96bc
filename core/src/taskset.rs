//! Weighted task catalog and selection

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use rand::Rng;

use crate::config::ConfigError;
use crate::error::{Error, Result};
use crate::traits::ActionError;

/// Boxed future returned by a task action.
pub type ActionFuture = BoxFuture<'static, std::result::Result<(), ActionError>>;

type ActionFn = dyn Fn() -> ActionFuture + Send + Sync;

/// One weighted task definition.
///
/// The action is an arbitrary async closure; the engine is agnostic to what
/// it does beyond timing the execution and classifying its result. Anything
/// the action needs (an HTTP client, fixture data) is captured by the
/// closure. Clone heavy objects in; never construct them per call.
///
/// # Examples
///
/// ```ignore
/// let client = HttpClient::new(&HttpConfig::default())?;
/// let task = Task::new("get_item", 100, move || {
///     let client = client.clone();
///     async move { client.get("/items/10", &[]).await }
/// });
/// ```
#[derive(Clone)]
pub struct Task {
    name: String,
    weight: u32,
    action: Arc<ActionFn>,
}

impl Task {
    /// Create a task from a name, a relative weight, and an async action.
    pub fn new<F, Fut>(name: impl Into<String>, weight: u32, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), ActionError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            weight,
            action: Arc::new(move || Box::pin(action()) as ActionFuture),
        }
    }

    /// Task name, used as the task id on outcome records.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative probability mass of this task.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Start one execution of the action.
    pub fn invoke(&self) -> ActionFuture {
        (self.action)()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// Immutable, weighted catalog of tasks.
///
/// Carries a precomputed cumulative weight table so a draw is a uniform
/// random value in `[0, total_weight)` plus one binary search. Built once at
/// startup, then shared read-only across all virtual users via `Arc`;
/// selection takes no locks.
#[derive(Debug, Clone)]
pub struct TaskSet {
    tasks: Vec<Task>,
    cumulative: Vec<u64>,
    total: u64,
}

impl TaskSet {
    /// Build a task set, validating every weight.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyTaskSet`] for an empty list and
    /// [`ConfigError::InvalidWeight`] for any zero weight; no task set is
    /// produced in either case.
    pub fn build(tasks: Vec<Task>) -> std::result::Result<Self, ConfigError> {
        if tasks.is_empty() {
            return Err(ConfigError::EmptyTaskSet);
        }

        let mut cumulative = Vec::with_capacity(tasks.len());
        let mut total: u64 = 0;
        for task in &tasks {
            if task.weight == 0 {
                return Err(ConfigError::InvalidWeight(task.name.clone()));
            }
            total += u64::from(task.weight);
            cumulative.push(total);
        }

        Ok(Self {
            tasks,
            cumulative,
            total,
        })
    }

    /// Number of tasks in the set.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the set holds no tasks. Never true for a built set.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sum of all task weights.
    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// The tasks in declaration order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Draw one task with probability proportional to its weight.
    ///
    /// # Errors
    ///
    /// Returns a scheduling error if the cumulative table no longer matches
    /// the task list. That is fatal to the calling user only; the pool keeps
    /// running unaffected users.
    pub fn select<R: Rng>(&self, rng: &mut R) -> Result<&Task> {
        if self.total == 0 || self.cumulative.len() != self.tasks.len() {
            return Err(Error::scheduling(
                "cumulative weight table out of sync with task list",
            ));
        }

        let draw = rng.gen_range(0..self.total);
        let idx = self.cumulative.partition_point(|&bound| bound <= draw);
        self.tasks
            .get(idx)
            .ok_or_else(|| Error::scheduling(format!("weighted draw {draw} has no matching task")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn noop_task(name: &str, weight: u32) -> Task {
        Task::new(name, weight, || async { Ok(()) })
    }

    #[test]
    fn test_build_empty_fails() {
        let result = TaskSet::build(vec![]);
        assert!(matches!(result, Err(ConfigError::EmptyTaskSet)));
    }

    #[test]
    fn test_build_zero_weight_fails() {
        let result = TaskSet::build(vec![noop_task("ok", 10), noop_task("broken", 0)]);
        match result {
            Err(ConfigError::InvalidWeight(name)) => assert_eq!(name, "broken"),
            other => panic!("expected InvalidWeight, got {other:?}"),
        }
    }

    #[test]
    fn test_build_cumulative_table() {
        let set = TaskSet::build(vec![
            noop_task("a", 100),
            noop_task("b", 200),
            noop_task("c", 150),
        ])
        .unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.total_weight(), 450);
        assert_eq!(set.tasks()[1].name(), "b");
        assert_eq!(set.tasks()[1].weight(), 200);
    }

    #[test]
    fn test_single_task_always_selected() {
        let set = TaskSet::build(vec![noop_task("only", 7)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(set.select(&mut rng).unwrap().name(), "only");
        }
    }

    #[test]
    fn test_selection_frequency_matches_weights() {
        let set = TaskSet::build(vec![
            noop_task("a", 100),
            noop_task("b", 200),
            noop_task("c", 150),
        ])
        .unwrap();

        let draws = 100_000;
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            match set.select(&mut rng).unwrap().name() {
                "a" => counts[0] += 1,
                "b" => counts[1] += 1,
                "c" => counts[2] += 1,
                other => panic!("unexpected task {other}"),
            }
        }

        let total = set.total_weight() as f64;
        for (count, weight) in counts.iter().zip([100u32, 200, 150]) {
            let observed = *count as f64 / draws as f64;
            let expected = f64::from(weight) / total;
            assert!(
                (observed - expected).abs() < 0.02,
                "observed {observed:.4}, expected {expected:.4}"
            );
        }
    }

    #[test]
    fn test_select_detects_corrupted_table() {
        // Construct an inconsistent set directly; `build` can never produce
        // one, but selection must still refuse to operate on it.
        let set = TaskSet {
            tasks: vec![noop_task("a", 1)],
            cumulative: vec![],
            total: 0,
        };

        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(set.select(&mut rng), Err(Error::Scheduling(_))));
    }

    #[tokio::test]
    async fn test_invoke_runs_action() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let task = Task::new("count", 1, move || {
            let counted = Arc::clone(&counted);
            async move {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        task.invoke().await.unwrap();
        task.invoke().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
