// src/integrations/tmdb/client.rs
//
// TMDB catalog API client
//
// ARCHITECTURE:
// - Thin HTTP client, one endpoint
// - Maps transport, status and decode failures to AppError::Network
// - No caching and no fallback here; the sync service owns that policy

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::TrendingPage;
use crate::error::{AppError, AppResult};

/// Remote catalog operations the sync layer depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn trending_movies(&self, api_key: &str, language: &str) -> AppResult<TrendingPage>;
}

/// TMDB API Client
pub struct TmdbClient {
    trending_url: Url,
    http_client: Client,
}

impl TmdbClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        // Url::join replaces the last segment unless the base ends in '/'
        let mut base = config.api_base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| AppError::Config(format!("Invalid api_base_url: {}", e)))?;
        let trending_url = base
            .join(config.trending_path.trim_start_matches('/'))
            .map_err(|e| AppError::Config(format!("Invalid trending_path: {}", e)))?;

        Self::with_url(trending_url, config.request_timeout())
    }

    pub fn with_url(trending_url: Url, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            trending_url,
            http_client,
        })
    }

    pub fn trending_url(&self) -> &Url {
        &self.trending_url
    }
}

#[async_trait]
impl MovieApi for TmdbClient {
    async fn trending_movies(&self, api_key: &str, language: &str) -> AppResult<TrendingPage> {
        log::debug!("GET {} (language={})", self.trending_url, language);

        let response = self
            .http_client
            .get(self.trending_url.clone())
            .header(header::ACCEPT, "application/json")
            .query(&[("language", language), ("api_key", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "Catalog API returned status: {}",
                status
            )));
        }

        let page: TrendingPage = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Failed to parse catalog response: {}", e)))?;

        log::debug!(
            "trending page {} of {} with {} results",
            page.page,
            page.total_pages,
            page.results.len()
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_url_from_config() {
        let client = TmdbClient::new(&AppConfig::default()).unwrap();
        assert_eq!(
            client.trending_url().as_str(),
            "https://api.themoviedb.org/3/trending/movies"
        );
    }

    #[test]
    fn test_base_without_trailing_slash_keeps_version_segment() {
        let config = AppConfig {
            api_base_url: "https://api.themoviedb.org/3".to_string(),
            ..AppConfig::default()
        };

        let client = TmdbClient::new(&config).unwrap();
        assert_eq!(
            client.trending_url().as_str(),
            "https://api.themoviedb.org/3/trending/movies"
        );
    }

    #[test]
    fn test_leading_slash_in_path_stays_under_base() {
        let config = AppConfig {
            trending_path: "/trending/movies".to_string(),
            ..AppConfig::default()
        };

        let client = TmdbClient::new(&config).unwrap();
        assert_eq!(
            client.trending_url().as_str(),
            "https://api.themoviedb.org/3/trending/movies"
        );
    }

    #[test]
    fn test_invalid_base_url_is_a_config_error() {
        let config = AppConfig {
            api_base_url: "not a url".to_string(),
            ..AppConfig::default()
        };

        assert!(matches!(TmdbClient::new(&config), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_network_fault() {
        // Port 9 (discard) on loopback refuses connections on test machines
        let url = Url::parse("http://127.0.0.1:9/trending/movies").unwrap();
        let client = TmdbClient::with_url(url, Duration::from_secs(2)).unwrap();

        let err = client.trending_movies("key", "en-US").await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }
}
