//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a deadline
//! - Turn an elapsed deadline into a distinct, transient error
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The deadline covers the whole call, body read included

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::upstream::{FetchError, UpstreamResult};

/// Run `fut`, failing with [`FetchError::Timeout`] if it outlives `limit`.
pub async fn with_timeout<T, Fut>(limit: Duration, fut: Fut) -> UpstreamResult<T>
where
    Fut: Future<Output = UpstreamResult<T>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_passes_through_result() {
        let ok = with_timeout(Duration::from_secs(1), async { Ok::<_, FetchError>(7) }).await;
        assert_eq!(ok, Ok(7));

        let err = with_timeout(Duration::from_secs(1), async {
            Err::<u8, _>(FetchError::Decode("bad".into()))
        })
        .await;
        assert_eq!(err, Err(FetchError::Decode("bad".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_deadline() {
        let result = with_timeout(Duration::from_secs(2), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, FetchError>(())
        })
        .await;
        assert_eq!(result, Err(FetchError::Timeout(Duration::from_secs(2))));
    }
}
