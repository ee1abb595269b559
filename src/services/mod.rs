// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod movie_sync_service;


pub use movie_sync_service::MovieSyncService;
