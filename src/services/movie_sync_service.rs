// src/services/movie_sync_service.rs
//
// Movie sync service - reconciles the catalog API with the local cache
//
// CRITICAL RULES:
// - The cache is replaced only by a successful, non-empty trending page
// - Network faults and empty pages fall back to cached rows when there are any
// - Search never touches the network
// - Cache read faults count as "no cached rows"
// - Cache calls run on the blocking pool, never on a runtime worker

use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt};

use crate::db::run_blocking;
use crate::domain::{Movie, TrendingPage};
use crate::error::{AppError, AppResult};
use crate::events::{CacheFallbackServed, EventBus, FallbackReason, TrendingSynced};
use crate::integrations::{ConnectivityProbe, RemoteDataSource};
use crate::repositories::MovieCacheRepository;
use crate::result_state::{ResultState, ResultStream};

#[derive(Clone)]
pub struct MovieSyncService {
    connectivity: Arc<dyn ConnectivityProbe>,
    remote: RemoteDataSource,
    cache: Arc<dyn MovieCacheRepository>,
    event_bus: Arc<EventBus>,
    api_key: String,
    language: String,
}

impl MovieSyncService {
    pub fn new(
        connectivity: Arc<dyn ConnectivityProbe>,
        remote: RemoteDataSource,
        cache: Arc<dyn MovieCacheRepository>,
        event_bus: Arc<EventBus>,
        api_key: String,
        language: String,
    ) -> Self {
        Self {
            connectivity,
            remote,
            cache,
            event_bus,
            api_key,
            language,
        }
    }

    /// Trending movies with cache fallback.
    ///
    /// Connectivity is checked when the stream is first polled.
    pub fn get_trending(&self) -> ResultStream<Vec<Movie>> {
        let this = self.clone();

        stream::once(async move {
            if this.connectivity.is_online() {
                this.online_trending()
            } else {
                this.offline_trending()
            }
        })
        .flatten()
        .boxed()
    }

    /// Search the cached movies. Blank queries are the trending listing.
    pub fn search_movies(&self, query: &str) -> ResultStream<Vec<Movie>> {
        if query.trim().is_empty() {
            return self.get_trending();
        }

        log::debug!("searching cache for {:?}", query);

        stream::once(future::ready(ResultState::Loading))
            .chain(self.cache.observe_search(query).map(ResultState::from))
            .boxed()
    }

    /// Detail lookup. Only cached movies can be shown.
    ///
    /// Blocks on SQLite; async callers go through `run_blocking`.
    pub fn get_movie_by_id(&self, id: i64) -> AppResult<Movie> {
        self.cache.get_by_id(id)?.ok_or(AppError::NotFound)
    }

    fn offline_trending(self) -> ResultStream<Vec<Movie>> {
        log::info!("offline, serving trending movies from cache");

        stream::once(future::ready(ResultState::Loading))
            .chain(stream::once(async move {
                let cached = self.read_cache().await;
                if cached.is_empty() {
                    ResultState::error(AppError::NoConnectivityNoCache)
                } else {
                    self.serve_fallback(FallbackReason::Offline, cached)
                }
            }))
            .boxed()
    }

    fn online_trending(self) -> ResultStream<Vec<Movie>> {
        self.remote
            .fetch_trending(&self.api_key, &self.language)
            .then(move |state| {
                let this = self.clone();
                async move { this.reconcile(state).await }
            })
            .boxed()
    }

    /// Turn one remote emission into one listing emission
    async fn reconcile(&self, state: ResultState<TrendingPage>) -> ResultState<Vec<Movie>> {
        match state {
            ResultState::Loading => ResultState::Loading,
            ResultState::Success(page) if !page.results.is_empty() => {
                let results = page.results;
                let cache = Arc::clone(&self.cache);
                let fresh = results.clone();
                match run_blocking(move || cache.replace_all(&fresh)).await {
                    Ok(()) => self.event_bus.emit(TrendingSynced::new(results.len())),
                    Err(e) => log::warn!("fetched {} movies but caching failed: {}", results.len(), e),
                }
                ResultState::Success(results)
            }
            ResultState::Success(_) => {
                log::warn!("catalog returned an empty trending page");
                let cached = self.read_cache().await;
                if cached.is_empty() {
                    ResultState::error(AppError::EmptyUpstream)
                } else {
                    self.serve_fallback(FallbackReason::EmptyUpstream, cached)
                }
            }
            ResultState::Error(cause) => {
                log::warn!("trending fetch failed: {}", cause);
                let cached = self.read_cache().await;
                if cached.is_empty() {
                    ResultState::Error(cause)
                } else {
                    self.serve_fallback(FallbackReason::NetworkFault, cached)
                }
            }
        }
    }

    async fn read_cache(&self) -> Vec<Movie> {
        let cache = Arc::clone(&self.cache);
        run_blocking(move || cache.list_all()).await.unwrap_or_else(|e| {
            log::warn!("cache read failed, treating as empty: {}", e);
            Vec::new()
        })
    }

    fn serve_fallback(&self, reason: FallbackReason, cached: Vec<Movie>) -> ResultState<Vec<Movie>> {
        log::info!("serving {} cached movies ({:?})", cached.len(), reason);
        self.event_bus.emit(CacheFallbackServed::new(reason, cached.len()));
        ResultState::Success(cached)
    }
}
