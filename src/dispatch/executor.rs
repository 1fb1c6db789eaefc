//! Per-item request execution with bounded retries.
//!
//! Only two failure classes are retried: HTTP 429, honouring the
//! server-supplied hint clamped to the policy cap, and transient transport
//! faults, after a short fixed pause. Every other rejection is terminal for
//! its item. This asymmetry is deliberate: a 403 will still be a 403 on the
//! second try.

use super::policy::RetryPolicy;
use super::report::{FailureReason, Outcome};
use async_trait::async_trait;
use std::cmp;
use std::time::Duration;
use tracing::{info, warn};

/// The classified result of one HTTP attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    /// A 2xx response, with the decoded payload.
    Completed(T),
    /// HTTP 429. `retry_after` is the server's hint, unclamped.
    RateLimited { retry_after: Duration },
    /// Any other status. `message` carries the API's diagnostic when one
    /// could be parsed from the body.
    Rejected { status: u16, message: Option<String> },
}

/// A transport-level fault, already split by whether retrying can help.
#[derive(Debug)]
pub enum TransportFault {
    /// Connection reset, timeout, DNS failure. Worth a retry.
    Retryable(String),
    /// The request can never succeed, e.g. it could not be constructed.
    Fatal(String),
}

impl From<reqwest::Error> for TransportFault {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            TransportFault::Fatal(e.to_string())
        } else {
            TransportFault::Retryable(e.to_string())
        }
    }
}

/// One kind of API call the dispatcher can drive in bulk.
#[async_trait]
pub trait Operation: Send + Sync {
    type Item: Send + Sync;
    type Output;

    /// Issue a single network call for one item. Anything that produced an
    /// HTTP response is an [Attempt]; transport faults surface as `Err`.
    async fn attempt(&self, item: &Self::Item) -> Result<Attempt<Self::Output>, TransportFault>;

    /// Short human label for diagnostics, e.g. `create ultra-17`.
    fn describe(&self, item: &Self::Item) -> String;
}

/// Run one item to completion under `policy`.
///
/// `silent` suppresses the per-item diagnostic lines and nothing else;
/// control flow is identical either way.
pub async fn execute<O: Operation>(
    op: &O,
    item: &O::Item,
    policy: &RetryPolicy,
    silent: bool,
) -> Outcome<O::Output> {
    let mut attempts = 0;

    while attempts < policy.max_attempts {
        match op.attempt(item).await {
            Ok(Attempt::Completed(value)) => {
                if !silent {
                    info!("{}: done", op.describe(item));
                }
                return Outcome::Success(value);
            }
            Ok(Attempt::RateLimited { retry_after }) => {
                let wait = cmp::min(retry_after, policy.rate_limit_cap);
                if !silent {
                    warn!("{}: rate limited, waiting {}ms", op.describe(item), wait.as_millis());
                }
                tokio::time::sleep(wait).await;
                attempts += 1;
            }
            Ok(Attempt::Rejected { status, message }) => {
                if !silent {
                    warn!(
                        "{}: {}",
                        op.describe(item),
                        message.unwrap_or_else(|| format!("HTTP {}", status))
                    );
                }
                return Outcome::Failure(FailureReason::HttpStatus(status));
            }
            Err(TransportFault::Fatal(e)) => {
                if !silent {
                    warn!("{}: {}", op.describe(item), e);
                }
                return Outcome::Failure(FailureReason::Network(e));
            }
            Err(TransportFault::Retryable(e)) => {
                if !silent {
                    warn!("{}: network error: {}", op.describe(item), e);
                }
                attempts += 1;
                if attempts < policy.max_attempts {
                    tokio::time::sleep(policy.network_retry_delay).await;
                }
            }
        }
    }

    Outcome::Failure(FailureReason::RetriesExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Pops one scripted attempt result per call.
    struct Scripted {
        script: Mutex<Vec<Result<Attempt<u32>, TransportFault>>>,
    }

    impl Scripted {
        fn new(script: Vec<Result<Attempt<u32>, TransportFault>>) -> Self {
            Scripted {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl Operation for Scripted {
        type Item = ();
        type Output = u32;

        async fn attempt(&self, _: &()) -> Result<Attempt<u32>, TransportFault> {
            self.script.lock().unwrap().remove(0)
        }

        fn describe(&self, _: &()) -> String {
            "scripted".to_owned()
        }
    }

    fn policy(max_attempts: u32, cap_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            network_retry_delay: Duration::from_millis(1000),
            rate_limit_cap: Duration::from_millis(cap_ms),
        }
    }

    fn rate_limited(retry_after_ms: u64) -> Result<Attempt<u32>, TransportFault> {
        Ok(Attempt::RateLimited {
            retry_after: Duration::from_millis(retry_after_ms),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_hint_clamped_to_cap() {
        // Server asks for 10s; the 2s cap wins.
        let op = Scripted::new(vec![rate_limited(10_000), Ok(Attempt::Completed(7))]);
        let started = Instant::now();

        let outcome = execute(&op, &(), &policy(3, 2000), true).await;

        assert_eq!(outcome, Outcome::Success(7));
        assert_eq!(started.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_hint_under_cap_honoured_exactly() {
        let op = Scripted::new(vec![rate_limited(1000), Ok(Attempt::Completed(1))]);
        let started = Instant::now();

        let outcome = execute(&op, &(), &policy(3, 5000), true).await;

        assert_eq!(outcome, Outcome::Success(1));
        assert_eq!(started.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_tiny_hint_single_retry_sleep() {
        let op = Scripted::new(vec![rate_limited(10), Ok(Attempt::Completed(1))]);
        let started = Instant::now();

        let outcome = execute(&op, &(), &policy(3, 5000), true).await;

        assert_eq!(outcome, Outcome::Success(1));
        // Exactly one retry sleep of 10ms.
        assert_eq!(started.elapsed(), Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiting_exhausts_attempts() {
        let op = Scripted::new(vec![rate_limited(100), rate_limited(100), rate_limited(100)]);

        let outcome = execute(&op, &(), &policy(3, 5000), true).await;

        assert_eq!(outcome, Outcome::Failure(FailureReason::RetriesExhausted));
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_network_faults_exhaust_two_attempts() {
        let op = Scripted::new(vec![
            Err(TransportFault::Retryable("connection reset".to_owned())),
            Err(TransportFault::Retryable("connection reset".to_owned())),
        ]);
        let started = Instant::now();

        let outcome = execute(&op, &(), &policy(2, 5000), true).await;

        assert_eq!(outcome, Outcome::Failure(FailureReason::RetriesExhausted));
        // Only the first fault sleeps; the second consumed the budget.
        assert_eq!(started.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_fault_then_success() {
        let op = Scripted::new(vec![
            Err(TransportFault::Retryable("timed out".to_owned())),
            Ok(Attempt::Completed(9)),
        ]);
        let started = Instant::now();

        let outcome = execute(&op, &(), &policy(2, 5000), true).await;

        assert_eq!(outcome, Outcome::Success(9));
        assert_eq!(started.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_terminal_with_zero_retries() {
        // One scripted entry only: a second attempt would panic the fake.
        let op = Scripted::new(vec![Ok(Attempt::Rejected {
            status: 403,
            message: Some("Missing Permissions".to_owned()),
        })]);
        let started = Instant::now();

        let outcome = execute(&op, &(), &policy(3, 5000), true).await;

        assert_eq!(outcome, Outcome::Failure(FailureReason::HttpStatus(403)));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_fault_is_terminal() {
        let op = Scripted::new(vec![Err(TransportFault::Fatal("bad header".to_owned()))]);

        let outcome = execute(&op, &(), &policy(3, 5000), true).await;

        assert_eq!(
            outcome,
            Outcome::Failure(FailureReason::Network("bad header".to_owned()))
        );
    }
}
