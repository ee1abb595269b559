// src/db/blocking.rs
//
// SQLite calls block. Async callers hand them to tokio's blocking pool so a
// long transaction or a busy wait never stalls a runtime worker.

use crate::error::{AppError, AppResult};

/// Run a blocking storage call on the blocking thread pool
pub async fn run_blocking<T, F>(call: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| AppError::Other(format!("storage task failed: {}", e)))?
}
