//! Retry-with-fixed-delay around a fallible async operation.
//!
//! Used for the startup bootstrap/schema path and the per-request diagnostic
//! lookup. Attempts are bounded; failures short of the last attempt are logged
//! at warn level and followed by a fixed sleep.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Run `op` until it succeeds or `max_attempts` is reached, sleeping `delay`
/// between attempts. Returns the first success, or the last error once the
/// attempt budget is spent.
///
/// `max_attempts` of zero is treated as one attempt.
pub async fn with_fixed_delay<T, E, F, Fut>(
    what: &str,
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);

    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                tracing::warn!(
                    what,
                    attempt,
                    max_attempts,
                    error = %err,
                    "attempt failed, retrying after {:?}",
                    delay
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
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn first_success_needs_no_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> =
            with_fixed_delay("test", 5, Duration::from_millis(1), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_once_the_operation_starts_succeeding() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> =
            with_fixed_delay("test", 5, Duration::from_millis(1), || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err("not yet")
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_the_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> =
            with_fixed_delay("test", 4, Duration::from_millis(1), || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(format!("failure {}", n)) }
            })
            .await;

        assert_eq!(result, Err("failure 4".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> =
            with_fixed_delay("test", 0, Duration::from_millis(1), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("no") }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
