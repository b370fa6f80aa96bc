//! Constant-throughput pacing for a single virtual user

use std::time::Duration;

use tokio::time::Instant;

/// Holds one virtual user at a fixed target request rate.
///
/// The schedule is absolute: each permitted slot is `interval` after the
/// previous slot, not `interval` after whenever the caller showed up, so a
/// slow request that eats part of the interval does not push the whole
/// schedule later and the limiter corrects back toward the target rate. A
/// caller that arrives past its slot gets exactly one immediate permit and
/// the schedule re-anchors at the current time; missed slots are never
/// replayed as a catch-up burst, so an overloaded target degrades
/// throughput gracefully instead of triggering runaway load.
///
/// Owned by exactly one virtual user. There is no cross-user coordination:
/// aggregate throughput is the emergent sum of independent per-user rates.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Option<Duration>,
    next_slot: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter for `rate` requests per second.
    ///
    /// `None`, zero, or negative rates disable pacing. Fractional rates are
    /// first-class: `0.1` paces one request every ten seconds.
    pub fn new(rate: Option<f64>) -> Self {
        let interval = rate.and_then(|rps| {
            if !rps.is_finite() || rps <= 0.0 {
                return None;
            }
            Some(Duration::from_secs_f64(1.0 / rps))
        });

        Self {
            interval,
            next_slot: None,
        }
    }

    /// Create a limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Whether pacing is active.
    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    /// Target spacing between permits, if pacing is active.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Wait until the next permitted slot.
    ///
    /// Returns immediately when pacing is disabled, on the first call, and
    /// when the caller has already fallen past its slot.
    pub async fn acquire(&mut self) {
        let Some(interval) = self.interval else {
            return;
        };

        let now = Instant::now();
        match self.next_slot {
            Some(slot) if slot > now => {
                tokio::time::sleep_until(slot).await;
                self.next_slot = Some(slot + interval);
            }
            _ => {
                // First call, or the caller fell behind its slot: permit
                // immediately and re-anchor instead of replaying missed
                // slots.
                self.next_slot = Some(now + interval);
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(None)
    }
}
