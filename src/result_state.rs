// src/result_state.rs
//
// Three-state result vocabulary shared by every asynchronous operation.
//
// A logical operation emits any number of `Loading` states followed by
// exactly one terminal state (`Success` or `Error`). Reactive cache queries
// keep emitting `Success` after the first one until they are dropped.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::{self, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub enum ResultState<T> {
    Loading,
    Success(T),
    Error(Arc<AppError>),
}

/// Boxed sequence of result states. Dropping it cancels the work behind it.
pub type ResultStream<T> = BoxStream<'static, ResultState<T>>;

impl<T> ResultState<T> {
    pub fn error(err: AppError) -> Self {
        ResultState::Error(Arc::new(err))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResultState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// Human-readable cause of an `Error` state
    pub fn message(&self) -> Option<String> {
        match self {
            ResultState::Error(err) => Some(err.to_string()),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> ResultState<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ResultState::Loading => ResultState::Loading,
            ResultState::Success(data) => ResultState::Success(f(data)),
            ResultState::Error(err) => ResultState::Error(err),
        }
    }
}

impl<T> From<AppResult<T>> for ResultState<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => ResultState::Success(data),
            Err(err) => ResultState::error(err),
        }
    }
}

/// Errors compare by message; `AppError` wraps foreign errors without `PartialEq`.
impl<T: PartialEq> PartialEq for ResultState<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResultState::Loading, ResultState::Loading) => true,
            (ResultState::Success(a), ResultState::Success(b)) => a == b,
            (ResultState::Error(a), ResultState::Error(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Wrap a single call as `Loading` followed by `Success` or `Error`.
///
/// The call is not started until the stream is polled. Errors and panics
/// raised while awaiting it both end up as an `Error` state.
pub fn result_state_stream<T, F>(call: F) -> ResultStream<T>
where
    T: Send + 'static,
    F: Future<Output = AppResult<T>> + Send + 'static,
{
    let terminal = async move {
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => ResultState::from(result),
            Err(panic) => ResultState::error(AppError::Other(panic_message(panic))),
        }
    };

    stream::once(future::ready(ResultState::Loading))
        .chain(stream::once(terminal))
        .boxed()
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "request panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_sequence() {
        let states: Vec<_> = result_state_stream(async { Ok::<_, AppError>(42) })
            .collect()
            .await;

        assert_eq!(states, vec![ResultState::Loading, ResultState::Success(42)]);
    }

    #[tokio::test]
    async fn test_error_sequence() {
        let states: Vec<ResultState<u32>> =
            result_state_stream(async { Err(AppError::Network("timeout".to_string())) })
                .collect()
                .await;

        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        assert_eq!(states[1].message().as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn test_panic_is_converted() {
        let states: Vec<ResultState<u32>> = result_state_stream(async {
            if true {
                panic!("socket exploded");
            }
            Ok(1)
        })
        .collect()
        .await;

        assert_eq!(states.len(), 2);
        assert_eq!(
            states[1].message().as_deref(),
            Some("Other error: socket exploded")
        );
    }

    #[test]
    fn test_map_keeps_error() {
        let state: ResultState<u32> = ResultState::error(AppError::EmptyUpstream);
        let mapped = state.map(|v| v * 2);
        assert_eq!(mapped.message().as_deref(), Some("No data available"));
        assert_eq!(ResultState::Success(2).map(|v| v * 2), ResultState::Success(4));
    }
}
