//! Timeout wrapper for every record store call.

use std::future::Future;
use std::time::Duration;

use mnemos_core::errors::StoreError;
use mnemos_core::MnemosResult;

/// Await a store call, turning an elapsed `timeout` into [`StoreError::Timeout`].
pub async fn bounded<T, F>(timeout: Duration, operation: &str, call: F) -> MnemosResult<T>
where
    F: Future<Output = MnemosResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            operation: operation.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
        .into()),
    }
}
