use std::future::Future;
use std::time::Duration;

use crate::error::StoreError;

/// Bounded exponential backoff for transient storage failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows the given attempt (1-based).
    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * self.multiplier.saturating_pow(attempt - 1)
    }
}

/// Run `op` until it succeeds, retrying transient errors per `policy`.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, what: &str, mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay(attempt);
                tracing::warn!(
                    "{what} failed (attempt {attempt}/{}), retrying in {delay:?}: {err}",
                    policy.max_attempts
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            multiplier: 2,
        }
    }

    fn transient() -> StoreError {
        StoreError::Remote {
            message: "service unavailable".to_string(),
            retryable: true,
        }
    }

    #[tokio::test]
    async fn transient_errors_are_retried_until_success() {
        let calls = Cell::new(0u32);
        let result = retry(fast_policy(), "op", || {
            let n = calls.get() + 1;
            calls.set(n);
            async move { if n < 3 { Err(transient()) } else { Ok(n) } }
        })
        .await
        .unwrap();
        assert_eq!(result, 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn permanent_errors_fail_immediately() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = retry(fast_policy(), "op", || {
            calls.set(calls.get() + 1);
            async {
                Err(StoreError::Remote {
                    message: "no such table".to_string(),
                    retryable: false,
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn attempts_are_bounded() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = retry(fast_policy(), "op", || {
            calls.set(calls.get() + 1);
            async { Err(transient()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn delays_double_per_attempt() {
        let policy = fast_policy();
        assert_eq!(policy.delay(1), Duration::from_millis(1));
        assert_eq!(policy.delay(2), Duration::from_millis(2));
        assert_eq!(policy.delay(3), Duration::from_millis(4));
    }
}
