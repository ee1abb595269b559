// src/lib.rs
// MovieHub - Offline-first movie browsing core
//
// Architecture:
// - Cache-first: the SQLite cache mirrors the last good trending page
// - Streams: every read is a Loading ⇒ Success | Error result stream
// - Event-driven: sync outcomes are published as domain events
// - Application Layer: screen controllers and display-ready state

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod result_state;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use config::AppConfig;

pub use domain::{image_url, Movie, TrendingPage, IMAGE_BASE_URL};

pub use error::{AppError, AppResult};

pub use events::{
    create_event_bus, CacheFallbackServed, DomainEvent, EventBus, EventLogEntry, FallbackReason,
    SearchDispatched, TrendingSynced,
};

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{MovieCacheRepository, SqliteMovieCacheRepository};

pub use integrations::{
    ConnectivityProbe, MovieApi, RemoteDataSource, StaticConnectivity, SystemConnectivityProbe,
    TmdbClient,
};

pub use result_state::{ResultState, ResultStream};

pub use services::MovieSyncService;

pub use application::{
    AppState, MovieDetailController, MovieDetailDto, MovieDetailUiState, MovieDto,
    MovieListController, MovieListDto, MovieListUiState,
};
