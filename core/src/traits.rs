//! Core traits and the task-level error type
//!
//! These are defined in core so collaborator crates (transports, sinks,
//! reporters) can implement them without circular dependencies.

use std::time::Duration;

use crate::outcome::{OutcomeKind, OutcomeRecord};

/// Receives per-request outcome records from every virtual user.
///
/// A sink sits on the hot path of every user loop and receives concurrent
/// submissions from all of them, so implementations must accept records
/// without blocking; batching and forwarding to reporting systems are the
/// sink's own concern.
pub trait OutcomeSink: Send + Sync {
    /// Accept one outcome record.
    fn record(&self, record: OutcomeRecord);
}

/// Failure of a single task execution.
///
/// Recoverable by construction: the user loop classifies the failure into an
/// [`OutcomeKind`], records it, and keeps going. It never terminates a user.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// HTTP/network error from the transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The target answered with a 4xx status
    #[error("client error: status {0}")]
    Client(u16),

    /// The target answered with a 5xx status
    #[error("server error: status {0}")]
    Server(u16),

    /// The request exceeded its deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Any other transport-level failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl ActionError {
    /// Classify this failure for the outcome record.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ActionError::Http(err) if err.is_timeout() => OutcomeKind::Timeout,
            ActionError::Http(err) => match err.status() {
                Some(status) if status.is_client_error() => OutcomeKind::ClientError,
                Some(status) if status.is_server_error() => OutcomeKind::ServerError,
                _ => OutcomeKind::TransportError,
            },
            ActionError::Client(_) => OutcomeKind::ClientError,
            ActionError::Server(_) => OutcomeKind::ServerError,
            ActionError::Timeout(_) => OutcomeKind::Timeout,
            ActionError::Transport(_) => OutcomeKind::TransportError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_classification() {
        assert_eq!(ActionError::Client(404).kind(), OutcomeKind::ClientError);
        assert_eq!(ActionError::Server(503).kind(), OutcomeKind::ServerError);
        assert_eq!(
            ActionError::Timeout(Duration::from_secs(30)).kind(),
            OutcomeKind::Timeout
        );
        assert_eq!(
            ActionError::Transport("connection refused".into()).kind(),
            OutcomeKind::TransportError
        );
    }

    #[test]
    fn test_action_error_display() {
        let err = ActionError::Server(500);
        assert_eq!(err.to_string(), "server error: status 500");

        let err = ActionError::Transport("connection reset".into());
        assert_eq!(err.to_string(), "transport error: connection reset");
    }
}
