//! Channel configuration for outcome delivery

/// Buffer sizing for the outcome channel (users -> external aggregator)
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Outcome channel buffer size
    pub outcome_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            outcome_buffer: 10_000,
        }
    }
}

impl ChannelConfig {
    /// Create a new channel config with a custom buffer size
    pub fn with_outcome_buffer(mut self, size: usize) -> Self {
        self.outcome_buffer = size;
        self
    }
}
