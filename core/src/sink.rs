//! Outcome sink implementations
//!
//! Every virtual user hands each [`OutcomeRecord`] to the shared sink on its
//! hot path, so the shipped sinks never block: the channel sink drops on
//! overflow and counts what it dropped instead of stalling user loops.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use crate::channel::ChannelConfig;
use crate::outcome::OutcomeRecord;
use crate::traits::OutcomeSink;

/// Sink that forwards records into a bounded mpsc channel.
///
/// The receiving half belongs to the external aggregator. When it falls
/// behind and the buffer fills, records are dropped and counted; the drop
/// counter makes that degradation observable.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<OutcomeRecord>,
    dropped: AtomicU64,
}

impl ChannelSink {
    /// Create a sink and its receiving half.
    pub fn channel(config: &ChannelConfig) -> (Self, mpsc::Receiver<OutcomeRecord>) {
        let (tx, rx) = mpsc::channel(config.outcome_buffer);
        (
            Self {
                tx,
                dropped: AtomicU64::new(0),
            },
            rx,
        )
    }

    /// Records dropped so far because the buffer was full or the receiver
    /// was gone.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl OutcomeSink for ChannelSink {
    fn record(&self, record: OutcomeRecord) {
        if let Err(err) = self.tx.try_send(record) {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            match err {
                mpsc::error::TrySendError::Full(_) => {
                    tracing::warn!(dropped, "outcome buffer full, dropping record");
                }
                mpsc::error::TrySendError::Closed(_) => {
                    tracing::debug!(dropped, "outcome receiver gone, dropping record");
                }
            }
        }
    }
}

/// Sink that discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutcomeSink for NullSink {
    fn record(&self, _record: OutcomeRecord) {}
}
