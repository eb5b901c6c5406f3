use std::future::Future;

use crate::repository::StorageError;

/// Maximum attempts for one optimistic read-modify-write.
pub(crate) const MAX_TXN_ATTEMPTS: u32 = 5;

/// Runs `op` until it stops returning `Conflict`, up to `max_attempts`.
///
/// Lost races are an expected part of optimistic concurrency and are not
/// surfaced per attempt. When every attempt loses, the failure is reported
/// as `Connection`, the same shape an unreachable store produces, so
/// callers handle one "temporarily unavailable" case.
pub(crate) async fn with_conflict_retry<T, F, Fut>(
    max_attempts: u32,
    mut op: F,
) -> Result<T, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorageError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(StorageError::Conflict) => {
                attempt += 1;
                if attempt >= max_attempts {
                    return Err(StorageError::Connection(format!(
                        "update conflict persisted after {max_attempts} attempts"
                    )));
                }
                log::debug!("storage conflict, retrying (attempt {attempt}/{max_attempts})");
            }
            other => return other,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_first_success() {
        let result: Result<u32, StorageError> =
            with_conflict_retry(3, || async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_retries_through_transient_conflicts() {
        let mut failures_left = 2;
        let result = with_conflict_retry(5, move || {
            let fail = failures_left > 0;
            failures_left -= i32::from(fail);
            async move {
                if fail {
                    Err(StorageError::Conflict)
                } else {
                    Ok("committed")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "committed");
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_as_connection_error() {
        let result: Result<(), StorageError> =
            with_conflict_retry(3, || async { Err(StorageError::Conflict) }).await;
        assert!(matches!(result.unwrap_err(), StorageError::Connection(_)));
    }

    #[tokio::test]
    async fn test_non_conflict_errors_pass_straight_through() {
        let mut calls = 0;
        let result: Result<(), StorageError> = with_conflict_retry(5, || {
            calls += 1;
            async { Err(StorageError::NotFound) }
        })
        .await;
        assert!(matches!(result.unwrap_err(), StorageError::NotFound));
        assert_eq!(calls, 1);
    }
}
