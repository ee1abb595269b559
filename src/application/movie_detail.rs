// src/application/movie_detail.rs
//
// Movie detail screen controller. Details come from the cache only.

use tokio::sync::watch;

use crate::application::ui_state::MovieDetailUiState;
use crate::db::run_blocking;
use crate::error::AppResult;
use crate::domain::Movie;
use crate::services::MovieSyncService;

pub struct MovieDetailController {
    sync: MovieSyncService,
    state: watch::Sender<MovieDetailUiState>,
}

impl MovieDetailController {
    pub fn new(sync: MovieSyncService) -> Self {
        let (state, _) = watch::channel(MovieDetailUiState::default());
        Self { sync, state }
    }

    /// Look up one cached movie.
    ///
    /// The previous movie stays visible while loading and on failure.
    pub async fn load_movie(&self, id: i64) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let result = self.lookup(id).await;

        self.state.send_modify(|state| {
            state.is_loading = false;
            match result {
                Ok(movie) => state.movie = Some(movie),
                Err(e) => {
                    log::debug!("detail lookup for movie {} failed: {}", id, e);
                    state.error = Some(e.to_string());
                }
            }
        });
    }

    async fn lookup(&self, id: i64) -> AppResult<Movie> {
        let sync = self.sync.clone();
        run_blocking(move || sync.get_movie_by_id(id)).await
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    pub fn state(&self) -> MovieDetailUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MovieDetailUiState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool_at, initialize_database};
    use crate::events::EventBus;
    use crate::integrations::tmdb::client::MockMovieApi;
    use crate::integrations::{RemoteDataSource, StaticConnectivity};
    use crate::repositories::{MovieCacheRepository, SqliteMovieCacheRepository};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn controller(seed: &[Movie]) -> (TempDir, MovieDetailController) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool_at(&dir.path().join("cache.db")).unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        let cache = Arc::new(SqliteMovieCacheRepository::new(Arc::new(pool)));
        cache.replace_all(seed).unwrap();

        let sync = MovieSyncService::new(
            Arc::new(StaticConnectivity::new(false)),
            RemoteDataSource::new(Arc::new(MockMovieApi::new())),
            cache,
            Arc::new(EventBus::new()),
            "key".to_string(),
            "en-US".to_string(),
        );

        (dir, MovieDetailController::new(sync))
    }

    #[tokio::test]
    async fn test_load_cached_movie() {
        let (_dir, controller) = controller(&[Movie::new(603, "The Matrix")]);
        assert!(controller.state().is_loading);

        controller.load_movie(603).await;

        let state = controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.movie.map(|m| m.title), Some("The Matrix".to_string()));
    }

    #[tokio::test]
    async fn test_missing_movie_reports_not_found() {
        let (_dir, controller) = controller(&[Movie::new(603, "The Matrix")]);

        controller.load_movie(604).await;

        let state = controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.movie, None);
        assert_eq!(state.error.as_deref(), Some("Movie not found"));
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_previous_movie() {
        let (_dir, controller) = controller(&[Movie::new(603, "The Matrix")]);
        controller.load_movie(603).await;

        controller.load_movie(1).await;

        let state = controller.state();
        assert_eq!(state.movie.map(|m| m.id), Some(603));
        assert_eq!(state.error.as_deref(), Some("Movie not found"));
    }

    #[tokio::test]
    async fn test_clear_error() {
        let (_dir, controller) = controller(&[]);
        controller.load_movie(7).await;
        let mut rx = controller.subscribe();

        controller.clear_error();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().error, None);

        controller.clear_error();
        assert!(!rx.has_changed().unwrap());
    }
}
