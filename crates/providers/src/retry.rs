//! Bounded retry on transient provider overload.

use std::future::Future;

use tracing::warn;

use crate::transport::TransportError;

/// Retries an operation while it fails with HTTP 503, up to `max_retries` times.
///
/// Retries are immediate. Any other outcome, success or failure, is
/// returned as soon as it happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// A policy that makes exactly one attempt.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0)
    }

    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Run `attempt` until it returns something other than a 503, or until
    /// `max_retries + 1` attempts have been made.
    ///
    /// # Errors
    ///
    /// Returns the last `TransportError` produced by `attempt`.
    pub async fn run<F, Fut, T>(&self, mut attempt: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut retries = 0;

        loop {
            match attempt().await {
                Err(e) if e.is_service_unavailable() && retries < self.max_retries => {
                    retries += 1;
                    warn!(
                        retry = retries,
                        max_retries = self.max_retries,
                        "Provider unavailable, retrying"
                    );
                }
                outcome => return outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    async fn count_attempts(policy: RetryPolicy, status: u16) -> (u32, Result<(), TransportError>) {
        let attempts = AtomicU32::new(0);
        let result = policy
            .run(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move { Err::<(), _>(TransportError::status(status, "")) }
            })
            .await;
        (attempts.load(Ordering::SeqCst), result)
    }

    #[tokio::test]
    async fn test_retries_503_up_to_bound() {
        let (attempts, result) = count_attempts(RetryPolicy::new(2), 503).await;
        assert_eq!(attempts, 3);
        assert_eq!(result.err().and_then(|e| e.status_code()), Some(503));
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let (attempts, _) = count_attempts(RetryPolicy::none(), 503).await;
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_other_statuses_are_not_retried() {
        let (attempts, result) = count_attempts(RetryPolicy::new(5), 500).await;
        assert_eq!(attempts, 1);
        assert_eq!(result.err().and_then(|e| e.status_code()), Some(500));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let attempts = AtomicU32::new(0);
        let result = RetryPolicy::new(3)
            .run(|| {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(TransportError::status(503, ""))
                    } else {
                        Ok("body")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("body"));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
