// src/error/types.rs
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    /// Transport failure, timeout or non-2xx answer from the catalog API.
    /// The message is surfaced to the UI verbatim.
    #[error("{0}")]
    Network(String),

    /// The catalog answered successfully but with zero results
    #[error("No data available")]
    EmptyUpstream,

    #[error("No internet connection and no cached data")]
    NoConnectivityNoCache,

    #[error("Movie not found")]
    NotFound,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Network("timeout".to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_message_is_preserved() {
        let err = AppError::Network("timeout".to_string());
        assert_eq!(err.to_string(), "timeout");
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(AppError::EmptyUpstream.to_string(), "No data available");
        assert_eq!(
            AppError::NoConnectivityNoCache.to_string(),
            "No internet connection and no cached data"
        );
        assert_eq!(AppError::NotFound.to_string(), "Movie not found");
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&AppError::EmptyUpstream).unwrap();
        assert_eq!(json, "\"No data available\"");
    }
}
