//! Bounded retry with per-attempt timeout and exponential backoff.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::ports::AIError;

/// How collaborator calls are bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Limit for a single attempt.
    pub attempt_timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(30),
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempt_timeout: Duration, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            attempt_timeout,
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }

    /// Runs `op` until it succeeds, fails permanently, or retries run out.
    ///
    /// Each attempt is cut off after `attempt_timeout` and counted as a
    /// retryable timeout.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T, AIError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AIError>>,
    {
        let mut attempt = 0;
        loop {
            let result = match timeout(self.attempt_timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(AIError::timeout(self.attempt_timeout)),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "collaborator call failed; retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::warn!(operation, attempts = attempt + 1, error = %err, "collaborator call failed");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(50), max_retries, Duration::from_millis(1))
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::new(Duration::from_secs(1), 3, Duration::from_millis(100));
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
    }

    #[tokio::test]
    async fn returns_first_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let value = fast(3)
            .run("test", || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, AIError>(7)
                }
            })
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let value = fast(3)
            .run("test", || {
                let c = c.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(AIError::unavailable("busy"))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(value, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let err = fast(2)
            .run("test", || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(AIError::network("reset"))
                }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::Network(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let err = fast(5)
            .run("test", || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(AIError::AuthenticationFailed)
                }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::AuthenticationFailed));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_attempts_time_out() {
        let err = fast(1)
            .run("test", || async {
                sleep(Duration::from_secs(5)).await;
                Ok::<_, AIError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::Timeout { timeout_ms: 50 }));
        assert_eq!(err.to_string(), "request timed out after 50ms");
    }
}
