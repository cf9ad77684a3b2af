//! Volare Fixed Retry
//! Copyright (c) 2026 Mamy Ratsimbazafy
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! volare-internals/fixed-retry
//! A fixed-attempt retry loop for external service calls.
//!
//! Unlike a backoff queue, every attempt is separated by the same pause
//! (zero by default) and there is no jitter.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time;

/// Custom error for the retry loop
#[derive(Debug, Error)]
pub enum RetryError {
    #[error("gave up after {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },
    #[error("no attempts configured")]
    NoAttempts,
}

/// Runs an operation up to `max_attempts` times.
///
/// # Examples
///
/// Two attempts, no pause between them:
/// ```ignore
/// let retry = FixedRetry::new(2);
/// let token = retry.run(|attempt| async move { fetch(attempt).await }).await?;
/// ```
#[derive(Clone, Debug)]
pub struct FixedRetry {
    max_attempts: u32,
    delay: Duration,
}

impl Default for FixedRetry {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::ZERO,
        }
    }
}

impl FixedRetry {
    /// Create a retry loop with `max_attempts` attempts and no pause
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Pause `delay` between two attempts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Execute `f` until it succeeds or the attempts are exhausted.
    ///
    /// `f` receives the 1-based attempt number. The error of the last
    /// attempt is kept as the source of [`RetryError::Exhausted`].
    pub async fn run<T, F, Fut>(&self, mut f: F) -> Result<T, RetryError>
    where
        F: FnMut(u32) -> Fut + Send,
        Fut: Future<Output = Result<T, anyhow::Error>> + Send,
    {
        if self.max_attempts == 0 {
            return Err(RetryError::NoAttempts);
        }

        let mut attempt = 1;
        loop {
            match f(attempt).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    if !self.delay.is_zero() {
                        time::sleep(self.delay).await;
                    }
                    attempt += 1;
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

    #[tokio::test]
    async fn test_first_success_stops_the_loop() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let out = FixedRetry::new(3)
            .run(move |_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, anyhow::Error>("ok")
                }
            })
            .await
            .unwrap();
        assert_eq!(out, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_on_second_attempt() {
        let out = FixedRetry::new(2)
            .run(|attempt| async move {
                if attempt == 1 {
                    anyhow::bail!("status 500");
                }
                Ok(attempt)
            })
            .await
            .unwrap();
        assert_eq!(out, 2);
    }

    #[tokio::test]
    async fn test_exhausted_keeps_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let err = FixedRetry::new(2)
            .run(move |attempt| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(anyhow::anyhow!("attempt {} failed", attempt))
                }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        match err {
            RetryError::Exhausted { attempts, source } => {
                assert_eq!(attempts, 2);
                assert_eq!(source.to_string(), "attempt 2 failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_attempts_never_calls() {
        let err = FixedRetry::new(0)
            .run(|_| async { Ok::<_, anyhow::Error>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, RetryError::NoAttempts));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts() {
        let start = time::Instant::now();
        let _ = FixedRetry::new(3)
            .with_delay(Duration::from_millis(200))
            .run(|_| async { Err::<(), _>(anyhow::anyhow!("down")) })
            .await;
        // Two pauses for three attempts, no pause after the last one.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(400), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(600), "{elapsed:?}");
    }
}
