// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO fallback policy (that lives in the sync service)
// - NO network access
// - Explicit SQL only

pub mod movie_cache_repository;

pub use movie_cache_repository::{MovieCacheRepository, MovieListStream, SqliteMovieCacheRepository};
