// src/domain/mod.rs
//
// Domain Root
//
// All other modules import catalog types from `crate::domain::*`

pub mod movie;

pub use movie::{image_url, Movie, TrendingPage, IMAGE_BASE_URL};
