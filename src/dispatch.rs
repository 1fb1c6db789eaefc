//! Batched concurrent dispatch of API work with rate-limit backoff.
//!
//! A run takes N logical work items, carves them into fixed-size batches,
//! fires every request in a batch at once, waits for the whole batch to
//! settle, pauses briefly, and moves on. Per-item retry behaviour lives in
//! [executor]; batch sequencing in [runner]; tuning in [policy]; outcomes
//! and the closing statistics in [report].
//!
//! Batching is the backpressure mechanism: at most one batch of requests is
//! ever in flight, rather than all N.

pub mod executor;
pub mod policy;
pub mod report;
pub mod runner;
