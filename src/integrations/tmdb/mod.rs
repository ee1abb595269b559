// src/integrations/tmdb/mod.rs

pub mod client;
pub mod remote_source;
