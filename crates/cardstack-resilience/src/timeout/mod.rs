//! Deadline wrapper for single async operations.

use cardstack_core::{CardstackError, CardstackResult};
use std::time::Duration;
use tokio::time::Instant;

/// Runs `f` once, abandoning it if `deadline` passes first.
pub async fn with_deadline<F, Fut, T>(deadline: Option<Instant>, f: F) -> CardstackResult<T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = CardstackResult<T>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, f())
            .await
            .map_err(|_| CardstackError::Timeout("call deadline elapsed".to_string()))?,
        None => f().await,
    }
}

/// Returns the instant `duration` from now.
#[must_use]
pub fn deadline_after(duration: Duration) -> Instant {
    Instant::now() + duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_success() {
        let deadline = Some(deadline_after(Duration::from_secs(1)));
        let result = with_deadline(deadline, || async { Ok::<_, CardstackError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let deadline = Some(deadline_after(Duration::from_millis(10)));
        let result = with_deadline(deadline, || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, CardstackError>(42)
        })
        .await;

        assert!(matches!(result, Err(CardstackError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_no_deadline_passes_error_through() {
        let result: CardstackResult<()> =
            with_deadline(None, || async { Err(CardstackError::persistence("0 rows")) }).await;
        assert!(matches!(result, Err(CardstackError::Persistence { .. })));
    }
}
