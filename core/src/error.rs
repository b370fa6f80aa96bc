//! Error types for loadswarm-core

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Startup configuration was rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A required builder field was never set
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Task selection state was found corrupted at runtime
    #[error("scheduling error: {0}")]
    Scheduling(String),

    /// Invalid pool lifecycle transition
    #[error("pool error: {0}")]
    Pool(String),
}

impl Error {
    pub(crate) fn scheduling(msg: impl Into<String>) -> Self {
        Error::Scheduling(msg.into())
    }

    pub(crate) fn pool(msg: impl Into<String>) -> Self {
        Error::Pool(msg.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
