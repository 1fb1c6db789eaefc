//! Tuning knobs for a dispatch run.
//!
//! The named presets replace what used to be separately-maintained "fast"
//! and "ultra" variants of every tool, which differed only in these
//! numbers.

use std::time::Duration;

/// Bounded-retry behaviour for a single work item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per item, counting the first.
    pub max_attempts: u32,
    /// Fixed pause before retrying after a transport-level fault.
    pub network_retry_delay: Duration,
    /// Upper bound when honouring a server-supplied rate-limit hint.
    pub rate_limit_cap: Duration,
}

/// How a run is carved into concurrently-dispatched batches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchingPolicy {
    /// Maximum items in flight at once.
    pub batch_size: usize,
    /// Pause between consecutive batches. Not applied after the last.
    pub inter_batch_delay: Duration,
    /// Above this many items, per-item diagnostics are suppressed so a
    /// large run doesn't drown the terminal.
    pub silence_threshold: usize,
}

/// A named pairing of batching and retry behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub batching: BatchingPolicy,
    pub retry: RetryPolicy,
}

impl DispatchPolicy {
    /// Small batches with generous pauses, for guilds already near their
    /// rate limit.
    pub fn conservative() -> Self {
        DispatchPolicy {
            batching: BatchingPolicy {
                batch_size: 10,
                inter_batch_delay: Duration::from_millis(500),
                silence_threshold: 20,
            },
            retry: RetryPolicy {
                max_attempts: 3,
                network_retry_delay: Duration::from_millis(1000),
                rate_limit_cap: Duration::from_millis(5000),
            },
        }
    }

    /// The tuning the channel creator and interaction replayer shipped
    /// with.
    pub fn fast() -> Self {
        DispatchPolicy {
            batching: BatchingPolicy {
                batch_size: 50,
                inter_batch_delay: Duration::from_millis(50),
                silence_threshold: 20,
            },
            retry: RetryPolicy {
                max_attempts: 3,
                network_retry_delay: Duration::from_millis(1000),
                rate_limit_cap: Duration::from_millis(5000),
            },
        }
    }

    /// The tuning the channel deleter shipped with: bigger batches, fewer
    /// attempts, tighter caps.
    pub fn aggressive() -> Self {
        DispatchPolicy {
            batching: BatchingPolicy {
                batch_size: 100,
                inter_batch_delay: Duration::from_millis(10),
                silence_threshold: 10,
            },
            retry: RetryPolicy {
                max_attempts: 2,
                network_retry_delay: Duration::from_millis(500),
                rate_limit_cap: Duration::from_millis(2000),
            },
        }
    }
}
