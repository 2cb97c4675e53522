//! Timeout wrapper for async operations.

use pantry_core::PantryError;
use std::future::Future;
use std::time::Duration;

/// Runs `future` to completion or fails with `PantryError::Timeout`.
pub async fn deadline<Fut, T>(duration: Duration, future: Fut) -> Result<T, PantryError>
where
    Fut: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| PantryError::Timeout(format!("Operation timed out after {duration:?}")))
}
