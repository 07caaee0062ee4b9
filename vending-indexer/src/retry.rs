use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::IndexerError;

/// Exponential backoff from 1s to 32s over five attempts (§6): 1, 2, 4, 8,
/// 16 seconds between the five calls, bailing out on the first
/// `IndexerError::Permanent` or once attempts are exhausted.
const MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(32);

pub async fn with_retry<T, Fut>(
    operation: &str,
    mut call: impl FnMut() -> Fut,
) -> Result<T, IndexerError>
where
    Fut: Future<Output = Result<T, IndexerError>>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                warn!(
                    operation,
                    attempt,
                    backoff_secs = backoff.as_secs(),
                    error = %err,
                    "retrying after transient indexer error"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            Err(err) => return Err(err),
        }
    }
}
