//! Sequential batches of concurrent work.

use super::executor::{self, Operation};
use super::policy::DispatchPolicy;
use super::report::{Outcome, RunReport, RunSummary};
use futures::future;
use std::cmp;
use std::ops::Range;
use std::time::{Duration, Instant};
use tracing::info;

/// Split `total` items into ordered index ranges of at most `batch_size`.
/// All but the last range have exactly `batch_size` items.
fn batch_ranges(total: usize, batch_size: usize) -> Vec<Range<usize>> {
    // A zero batch size would never make progress.
    let batch_size = cmp::max(batch_size, 1);

    let mut ranges = Vec::with_capacity(total.div_ceil(batch_size));
    let mut start = 0;

    while start < total {
        let end = cmp::min(start + batch_size, total);
        ranges.push(start..end);
        start = end;
    }

    ranges
}

/// Dispatch every item through `op`, one batch at a time.
///
/// Batches run strictly in sequence; items within a batch are all in flight
/// at once, and the batch settles fully before the next one starts. A
/// failed item never aborts its batch or the run: the report always covers
/// all of `items`, with outcomes in original item order.
pub async fn run<O: Operation>(
    op: &O,
    items: &[O::Item],
    policy: &DispatchPolicy,
) -> RunReport<O::Output> {
    if items.is_empty() {
        return RunReport {
            outcomes: Vec::new(),
            summary: RunSummary {
                total: 0,
                succeeded: 0,
                elapsed: Duration::ZERO,
            },
        };
    }

    let batching = &policy.batching;
    let silent = items.len() > batching.silence_threshold;
    let started = Instant::now();

    let ranges = batch_ranges(items.len(), batching.batch_size);
    let total_batches = ranges.len();

    let mut outcomes: Vec<Outcome<O::Output>> = Vec::with_capacity(items.len());

    for (i, range) in ranges.iter().enumerate() {
        if !silent {
            info!("Batch {}/{}: {} items", i + 1, total_batches, range.len());
        }

        let batch = items[range.clone()]
            .iter()
            .map(|item| executor::execute(op, item, &policy.retry, silent));

        // Settle-all: every item runs to its own conclusion, no
        // short-circuit on first failure.
        outcomes.extend(future::join_all(batch).await);

        if i + 1 < total_batches {
            tokio::time::sleep(batching.inter_batch_delay).await;
        }
    }

    let summary = RunSummary {
        total: items.len(),
        succeeded: outcomes.iter().filter(|o| o.is_success()).count(),
        elapsed: started.elapsed(),
    };

    RunReport { outcomes, summary }
}
