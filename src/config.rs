// src/config.rs
//
// Runtime configuration
//
// Sources, later ones win:
// 1. Built-in defaults
// 2. Optional TOML file
// 3. Environment (TMDB_API_KEY, TMDB_LANGUAGE, MOVIEHUB_DB_PATH)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::IMAGE_BASE_URL;
use crate::error::{AppError, AppResult};

pub const ENV_API_KEY: &str = "TMDB_API_KEY";
pub const ENV_LANGUAGE: &str = "TMDB_LANGUAGE";
pub const ENV_DB_PATH: &str = "MOVIEHUB_DB_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api_base_url: String,
    pub trending_path: String,
    pub image_base_url: String,
    pub api_key: String,
    pub language: String,
    pub request_timeout_secs: u64,
    pub search_debounce_ms: u64,
    /// Queries shorter than this (in characters) never reach the cache
    pub min_search_length: usize,
    /// Defaults to the platform data directory when unset
    pub database_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.themoviedb.org/3/".to_string(),
            trending_path: "trending/movies".to_string(),
            image_base_url: IMAGE_BASE_URL.to_string(),
            api_key: String::new(),
            language: "en-US".to_string(),
            request_timeout_secs: 30,
            search_debounce_ms: 250,
            min_search_length: 2,
            database_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> AppResult<Self> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the file at `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = key;
        }
        if let Some(language) = lookup(ENV_LANGUAGE).filter(|v| !v.trim().is_empty()) {
            self.language = language;
        }
        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(AppError::Config("api_base_url must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config("request_timeout_secs must be positive".to_string()));
        }
        if self.min_search_length == 0 {
            return Err(AppError::Config("min_search_length must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
