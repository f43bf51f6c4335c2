//! Wall-clock limits for sync runs.

use std::future::Future;
use std::time::Duration;

use crate::types::{DocsError, Result};

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
/// The future is dropped on expiry; blocking work it spawned keeps running detached.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(DocsError::timeout(operation_name, timeout)),
    }
}

/// [`with_timeout`] when a limit is configured, otherwise wait indefinitely
pub async fn with_optional_timeout<T, F>(
    timeout: Option<Duration>,
    future: F,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout {
        Some(limit) => with_timeout(limit, future, operation_name).await,
        None => future.await,
    }
}
