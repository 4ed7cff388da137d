//! Request pacing and retry policy for model calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until};
use tracing::warn;

use crate::{Result, VertoError};

/// Default gap between consecutive model requests.
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_millis(200);

/// Fixed-interval scheduler: consecutive requests start at least `interval`
/// apart. The first request never waits.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    last_start: Option<Instant>,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_PACING_INTERVAL)
    }
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_start: None }
    }

    /// Waits until the next request may start, then records that start.
    ///
    /// Returns how long it actually waited.
    pub async fn ready(&mut self) -> Duration {
        let now = Instant::now();
        let waited = match self.last_start {
            Some(last) if last + self.interval > now => {
                let deadline = last + self.interval;
                sleep_until(deadline).await;
                deadline - now
            }
            _ => Duration::ZERO,
        };

        self.last_start = Some(Instant::now());
        waited
    }
}

/// Bounded retries with exponential backoff.
///
/// The default is a single attempt, i.e. no retries: a failed call fails the
/// job. Raising `max_attempts` lets transient failures (transport errors,
/// timeouts and 5xx answers) be retried after `initial_backoff`,
/// `initial_backoff * 2`, and so on, capped at `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 1, initial_backoff: Duration::from_millis(500), max_backoff: Duration::from_secs(8) }
    }
}

impl RetryPolicy {
    /// A policy with `max_attempts` attempts (at least one) and the default backoff.
    pub fn attempts(max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1), ..Self::default() }
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Delay before attempt `attempt + 1`, where `attempt` counts from 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }

    /// Runs `operation` until it succeeds, fails with a non-transient error,
    /// or the attempts run out. The last error is returned.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < max_attempts && is_transient(&err) => {
                    let delay = self.backoff(attempt);
                    warn!(attempt, max_attempts, ?delay, error = %err, "Model call failed, retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn is_transient(err: &VertoError) -> bool {
    match err {
        VertoError::HttpError(_) | VertoError::Timeout { .. } => true,
        VertoError::ModelStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_first_request_never_waits() {
        let mut pacer = Pacer::new(Duration::from_millis(200));
        assert_eq!(pacer.ready().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_requests_are_spaced() {
        let mut pacer = Pacer::new(Duration::from_millis(200));
        let start = Instant::now();

        pacer.ready().await;
        pacer.ready().await;
        pacer.ready().await;

        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_request_absorbs_interval() {
        let mut pacer = Pacer::new(Duration::from_millis(200));
        pacer.ready().await;
        sleep(Duration::from_millis(500)).await;
        assert_eq!(pacer.ready().await, Duration::ZERO);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::attempts(5).with_backoff(Duration::from_millis(100), Duration::from_millis(350));
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(350));
        assert_eq!(policy.backoff(40), Duration::from_millis(350));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_policy_makes_one_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = RetryPolicy::default()
            .run(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(VertoError::ModelStatus { status: 503, body: String::new() })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = RetryPolicy::attempts(3)
            .run(move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(VertoError::ModelStatus { status: 502, body: "busy".to_string() })
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = RetryPolicy::attempts(3)
            .run(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(VertoError::ModelStatus { status: 404, body: "model not found".to_string() })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
