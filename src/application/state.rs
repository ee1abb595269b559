// src/application/state.rs
//
// Composition root: one place where config, storage, the catalog client and
// the sync service are wired together.

use std::sync::Arc;

use crate::application::movie_detail::MovieDetailController;
use crate::application::movie_list::MovieListController;
use crate::config::AppConfig;
use crate::db::{create_connection_pool_at, get_database_path, initialize_database, ConnectionPool};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::{ConnectivityProbe, RemoteDataSource, TmdbClient};
use crate::repositories::{MovieCacheRepository, SqliteMovieCacheRepository};
use crate::services::MovieSyncService;

/// Shared application state.
/// All fields are Arc-wrapped (or cheap clones) for sharing across screens.
pub struct AppState {
    pub config: AppConfig,
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,
    pub cache: Arc<dyn MovieCacheRepository>,
    pub sync: MovieSyncService,
}

impl AppState {
    pub fn new(config: AppConfig, connectivity: Arc<dyn ConnectivityProbe>) -> AppResult<Self> {
        // 1. INFRASTRUCTURE
        let db_path = match &config.database_path {
            Some(path) => path.clone(),
            None => get_database_path()?,
        };
        let pool = Arc::new(create_connection_pool_at(&db_path)?);
        {
            let conn = pool.get()?;
            initialize_database(&conn)?;
        }
        let event_bus = Arc::new(EventBus::new());

        // 2. REPOSITORIES
        let cache: Arc<dyn MovieCacheRepository> =
            Arc::new(SqliteMovieCacheRepository::new(pool.clone()));

        // 3. REMOTE
        let client = TmdbClient::new(&config)?;
        log::debug!("catalog endpoint {}", client.trending_url());
        let remote = RemoteDataSource::new(Arc::new(client));

        // 4. SERVICES
        let sync = MovieSyncService::new(
            connectivity,
            remote,
            cache.clone(),
            event_bus.clone(),
            config.api_key.clone(),
            config.language.clone(),
        );

        Ok(Self {
            config,
            pool,
            event_bus,
            cache,
            sync,
        })
    }

    /// List screen controller. Starts the trending load immediately.
    pub fn movie_list(&self) -> MovieListController {
        MovieListController::start(self.sync.clone(), self.event_bus.clone(), &self.config)
    }

    pub fn movie_detail(&self) -> MovieDetailController {
        MovieDetailController::new(self.sync.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Movie;
    use crate::integrations::StaticConnectivity;

    fn offline_state(dir: &tempfile::TempDir) -> AppState {
        let config = AppConfig {
            database_path: Some(dir.path().join("nested").join("movies.db")),
            ..AppConfig::default()
        };
        AppState::new(config, Arc::new(StaticConnectivity::new(false))).unwrap()
    }

    #[test]
    fn test_creates_database_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let state = offline_state(&dir);

        assert!(dir.path().join("nested").join("movies.db").exists());
        assert_eq!(state.cache.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_detail_controller_reads_shared_cache() {
        let dir = tempfile::tempdir().unwrap();
        let state = offline_state(&dir);
        state.cache.replace_all(&[Movie::new(11, "Star Wars")]).unwrap();

        let detail = state.movie_detail();
        detail.load_movie(11).await;

        assert_eq!(detail.state().movie.map(|m| m.title), Some("Star Wars".to_string()));
    }

    #[test]
    fn test_reopening_keeps_cached_rows() {
        let dir = tempfile::tempdir().unwrap();
        {
            let state = offline_state(&dir);
            state.cache.replace_all(&[Movie::new(1, "Heat")]).unwrap();
        }

        let state = offline_state(&dir);
        assert_eq!(state.cache.count().unwrap(), 1);
    }
}
