//! Load-profile configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How new virtual users are brought online by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampStrategy {
    /// Spawn the whole population at once.
    #[default]
    Immediate,

    /// Stagger spawns over time.
    Staggered {
        /// Pause between consecutive user spawns.
        spawn_interval: Duration,
    },
}

fn default_grace() -> Duration {
    Duration::from_secs(10)
}

/// Pool configuration
///
/// Defines the shape of the generated load: population size, per-user
/// pacing, ramp-up policy, and shutdown grace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of concurrent virtual users.
    pub users: usize,

    /// Per-user request rate in requests per second. `None` disables pacing.
    ///
    /// Fractional rates below one request per second are supported; `0.1`
    /// means one request every ten seconds per user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_rate: Option<f64>,

    /// How the population is brought online.
    #[serde(default)]
    pub ramp: RampStrategy,

    /// How long `stop()` waits for users to drain before abandoning their
    /// in-flight work.
    #[serde(default = "default_grace")]
    pub grace: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            users: 1,
            user_rate: None,
            ramp: RampStrategy::default(),
            grace: default_grace(),
        }
    }
}

impl PoolConfig {
    /// Create a new config with the given user count
    pub fn new(users: usize) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    /// Set the per-user request rate
    pub fn with_user_rate(mut self, rate: f64) -> Self {
        self.user_rate = Some(rate);
        self
    }

    /// Set the ramp strategy
    pub fn with_ramp(mut self, ramp: RampStrategy) -> Self {
        self.ramp = ramp;
        self
    }

    /// Set the shutdown grace timeout
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.users == 0 {
            return Err(ConfigError::InvalidUserCount(
                "user count must be at least 1".into(),
            ));
        }

        if let Some(rate) = self.user_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::InvalidRate(
                    "per-user rate must be positive and finite".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid user count
    #[error("invalid user count: {0}")]
    InvalidUserCount(String),

    /// Invalid pacing rate
    #[error("invalid pacing rate: {0}")]
    InvalidRate(String),

    /// The task list was empty
    #[error("task set is empty")]
    EmptyTaskSet,

    /// A task carried a non-positive weight
    #[error("invalid weight for task `{0}`: weight must be positive")]
    InvalidWeight(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.users, 1);
        assert!(config.user_rate.is_none());
        assert_eq!(config.ramp, RampStrategy::Immediate);
        assert_eq!(config.grace, Duration::from_secs(10));
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = PoolConfig::new(500)
            .with_user_rate(0.1)
            .with_ramp(RampStrategy::Staggered {
                spawn_interval: Duration::from_millis(50),
            })
            .with_grace(Duration::from_secs(5));

        assert_eq!(config.users, 500);
        assert_eq!(config.user_rate, Some(0.1));
        assert!(matches!(config.ramp, RampStrategy::Staggered { .. }));
        assert_eq!(config.grace, Duration::from_secs(5));
    }

    #[test]
    fn test_config_validation_valid() {
        let config = PoolConfig::new(10).with_user_rate(100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_users() {
        let config = PoolConfig::new(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUserCount(_))
        ));
    }

    #[test]
    fn test_config_validation_zero_rate() {
        let config = PoolConfig::new(1).with_user_rate(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRate(_))));
    }

    #[test]
    fn test_config_validation_negative_rate() {
        let config = PoolConfig::new(1).with_user_rate(-10.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_non_finite_rate() {
        let config = PoolConfig::new(1).with_user_rate(f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = PoolConfig::new(5).with_user_rate(0.5);

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PoolConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.users, 5);
        assert_eq!(deserialized.user_rate, Some(0.5));
    }

    #[test]
    fn test_ramp_defaults_to_immediate_when_absent() {
        let deserialized: PoolConfig = serde_json::from_str(r#"{"users": 3}"#).unwrap();
        assert_eq!(deserialized.ramp, RampStrategy::Immediate);
        assert_eq!(deserialized.grace, Duration::from_secs(10));
    }
}
