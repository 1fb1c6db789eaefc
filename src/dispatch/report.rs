//! Per-item outcomes and the closing run summary.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Why an item ultimately failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// A terminal response status outside the 2xx range (and not 429).
    /// Never retried.
    HttpStatus(u16),
    /// A transport fault no retry can fix, e.g. a request that could not
    /// even be constructed.
    Network(String),
    /// The attempt budget was consumed by rate limiting or transient
    /// transport faults.
    RetriesExhausted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::HttpStatus(status) => write!(f, "HTTP {}", status),
            FailureReason::Network(e) => write!(f, "network error: {}", e),
            FailureReason::RetriesExhausted => write!(f, "retries exhausted"),
        }
    }
}

/// The recorded result of processing one work item. Never mutated once
/// produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(FailureReason),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Aggregate statistics over all outcomes for a run. Computed once, at the
/// end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    /// Items per second over the whole run.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.total as f64 / secs
    }

    /// Wall-clock time per item. Batching makes this far lower than any
    /// single round trip.
    pub fn mean_latency(&self) -> Duration {
        if self.total == 0 {
            return Duration::ZERO;
        }
        self.elapsed / self.total as u32
    }
}

/// Everything a run produced: outcomes in original item order, plus the
/// summary.
pub struct RunReport<T> {
    pub outcomes: Vec<Outcome<T>>,
    pub summary: RunSummary,
}

impl<T> RunReport<T> {
    /// Failure counts keyed by rendered reason. Distinct causes are kept
    /// distinct rather than collapsed into one generic diagnostic.
    pub fn failure_tally(&self) -> BTreeMap<String, usize> {
        let mut tally = BTreeMap::new();

        for outcome in &self.outcomes {
            if let Outcome::Failure(reason) = outcome {
                *tally.entry(reason.to_string()).or_insert(0) += 1;
            }
        }

        tally
    }

    /// Render the closing summary block. `noun` names the kind of item,
    /// e.g. "channels".
    pub fn render(&self, noun: &str) -> String {
        let s = &self.summary;
        let rule = "─".repeat(40);

        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("Time taken: {:.3}s\n", s.elapsed.as_secs_f64()));
        out.push_str(&format!("Succeeded: {}/{} {}\n", s.succeeded, s.total, noun));
        out.push_str(&format!(
            "Average: {}ms per item\n",
            s.mean_latency().as_millis()
        ));
        out.push_str(&format!("Speed: {:.1} {}/second\n", s.throughput(), noun));

        let tally = self.failure_tally();
        if !tally.is_empty() {
            out.push_str("Failures:\n");
            for (reason, count) in &tally {
                out.push_str(&format!("  {}: {}\n", reason, count));
            }
        }

        out.push_str(&rule);
        out
    }
}
