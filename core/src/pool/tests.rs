//! Tests for the pool module

use super::*;
use crate::config::{ConfigError, RampStrategy};
use crate::error::Error;
use crate::outcome::OutcomeRecord;
use crate::sink::NullSink;
use crate::taskset::{Task, TaskSet};
use crate::traits::{ActionError, OutcomeSink};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

// ============================================================================
// Helpers
// ============================================================================

fn ok_task(name: &str, weight: u32) -> Task {
    Task::new(name, weight, || async { Ok(()) })
}

fn failing_task(name: &str, weight: u32) -> Task {
    Task::new(name, weight, || async { Err(ActionError::Server(500)) })
}

fn hanging_task(name: &str, weight: u32) -> Task {
    Task::new(name, weight, || async {
        futures::future::pending::<()>().await;
        Ok(())
    })
}

fn single_task_set() -> TaskSet {
    TaskSet::build(vec![ok_task("ping", 1)]).unwrap()
}

/// Sink recording, per user, when each outcome arrived on the tokio clock.
#[derive(Default)]
struct InstantSink {
    hits: Mutex<HashMap<usize, Vec<Instant>>>,
}

impl InstantSink {
    fn hits_for(&self, user: usize) -> Vec<Instant> {
        self.hits
            .lock()
            .unwrap()
            .get(&user)
            .cloned()
            .unwrap_or_default()
    }
}

impl OutcomeSink for InstantSink {
    fn record(&self, record: OutcomeRecord) {
        self.hits
            .lock()
            .unwrap()
            .entry(record.user)
            .or_default()
            .push(Instant::now());
    }
}

// ============================================================================
// Builder tests
// ============================================================================

#[test]
fn test_builder_missing_tasks() {
    let result = PoolBuilder::new().sink(Arc::new(NullSink)).build();
    assert!(matches!(result, Err(Error::MissingField("tasks"))));
}

#[test]
fn test_builder_missing_sink() {
    let result = PoolBuilder::new().tasks(single_task_set()).build();
    assert!(matches!(result, Err(Error::MissingField("sink"))));
}

#[test]
fn test_builder_defaults() {
    let pool = PoolBuilder::new()
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    assert_eq!(pool.state(), PoolState::Idle);
    assert_eq!(pool.population(), 0);
    assert_eq!(pool.config().users, 1);
}

// ============================================================================
// State machine tests
// ============================================================================

#[tokio::test]
async fn test_invalid_config_stops_pool_on_start() {
    let mut pool = PoolBuilder::new()
        .users(0)
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    let result = pool.start().await;
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidUserCount(_)))
    ));
    assert_eq!(pool.state(), PoolState::Stopped);
}

#[tokio::test]
async fn test_stop_before_start_rejected() {
    let mut pool = PoolBuilder::new()
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    assert!(matches!(pool.stop().await, Err(Error::Pool(_))));
    assert_eq!(pool.state(), PoolState::Idle);
}

#[tokio::test]
async fn test_resize_before_start_rejected() {
    let mut pool = PoolBuilder::new()
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    assert!(matches!(pool.resize(5).await, Err(Error::Pool(_))));
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_rejected() {
    let mut pool = PoolBuilder::new()
        .users(2)
        .user_rate(Some(10.0))
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    pool.start().await.unwrap();
    assert_eq!(pool.state(), PoolState::Steady);
    assert!(matches!(pool.start().await, Err(Error::Pool(_))));

    pool.stop().await.unwrap();
    assert_eq!(pool.state(), PoolState::Stopped);
    assert!(matches!(pool.start().await, Err(Error::Pool(_))));
}

// ============================================================================
// Lifecycle tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_start_then_stop_joins_all_users() {
    let mut pool = PoolBuilder::new()
        .users(500)
        .user_rate(Some(10.0))
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    pool.start().await.unwrap();
    assert_eq!(pool.state(), PoolState::Steady);
    assert_eq!(pool.population(), 500);

    tokio::time::sleep(Duration::from_millis(120)).await;

    let summary = pool.stop().await.unwrap();
    assert_eq!(pool.state(), PoolState::Stopped);
    assert_eq!(pool.population(), 0);

    // Every user joined cleanly within the grace timeout.
    assert_eq!(summary.users, 500);
    assert!(summary.completed >= 500);
}

#[tokio::test(start_paused = true)]
async fn test_staggered_ramp_spaces_spawns() {
    let mut pool = PoolBuilder::new()
        .users(3)
        .user_rate(Some(10.0))
        .ramp(RampStrategy::Staggered {
            spawn_interval: Duration::from_millis(50),
        })
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    let started = Instant::now();
    pool.start().await.unwrap();

    // Two inter-spawn pauses for three users.
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(pool.population(), 3);

    pool.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_stop_abandons_hung_users_after_grace() {
    let mut pool = PoolBuilder::new()
        .users(2)
        .grace(Duration::from_millis(100))
        .tasks(TaskSet::build(vec![hanging_task("hang", 1)]).unwrap())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    pool.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let started = Instant::now();
    let summary = pool.stop().await.unwrap();

    assert_eq!(pool.state(), PoolState::Stopped);
    // Hung users never reported final counters.
    assert_eq!(summary.users, 0);
    // Shutdown latency stayed bounded by the grace timeout.
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert!(started.elapsed() < Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_failing_users_still_produce_load() {
    let mut pool = PoolBuilder::new()
        .users(3)
        .user_rate(Some(20.0))
        .tasks(TaskSet::build(vec![failing_task("broken", 1)]).unwrap())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    pool.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    let summary = pool.stop().await.unwrap();

    // A run whose every request fails keeps producing load and statistics.
    assert_eq!(summary.users, 3);
    assert_eq!(summary.completed, 0);
    assert!(summary.failed >= 3);
    assert_eq!(summary.success_rate(), 0.0);
}

// ============================================================================
// Resize tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_resize_grows_population() {
    let mut pool = PoolBuilder::new()
        .users(2)
        .user_rate(Some(10.0))
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    pool.start().await.unwrap();
    pool.resize(5).await.unwrap();

    assert_eq!(pool.population(), 5);
    assert_eq!(pool.config().users, 5);

    let summary = pool.stop().await.unwrap();
    assert_eq!(summary.users, 5);
}

#[tokio::test(start_paused = true)]
async fn test_resize_to_zero_rejected() {
    let mut pool = PoolBuilder::new()
        .users(2)
        .user_rate(Some(10.0))
        .tasks(single_task_set())
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();

    pool.start().await.unwrap();
    assert!(matches!(pool.resize(0).await, Err(Error::Config(_))));
    assert_eq!(pool.population(), 2);

    pool.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_resize_down_keeps_survivor_pacing() {
    let sink = Arc::new(InstantSink::default());
    let mut pool = PoolBuilder::new()
        .users(3)
        .user_rate(Some(10.0))
        .tasks(single_task_set())
        .sink(Arc::clone(&sink))
        .build()
        .unwrap();

    pool.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;

    pool.resize(1).await.unwrap();
    assert_eq!(pool.population(), 1);

    tokio::time::sleep(Duration::from_millis(250)).await;
    let summary = pool.stop().await.unwrap();

    // Users 1 and 2 were drained by the resize but their counters survive.
    assert_eq!(summary.users, 3);

    // The surviving user's inter-request spacing is unchanged across the
    // resize: one hit per 100ms slot, before and after.
    let hits = sink.hits_for(0);
    assert!(hits.len() >= 5, "expected ~6 paced hits, got {}", hits.len());
    for pair in hits.windows(2) {
        let gap = pair[1].duration_since(pair[0]);
        assert!(
            gap >= Duration::from_millis(100) && gap < Duration::from_millis(110),
            "survivor pacing disturbed, gap {gap:?}"
        );
    }
}
