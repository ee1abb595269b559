// src/integrations/mod.rs
//
// External Integrations Module
//
// Infrastructure only: HTTP catalog access and the reachability probe.

pub mod connectivity;
pub mod tmdb;

pub use connectivity::{ConnectivityProbe, StaticConnectivity, SystemConnectivityProbe, Transport};
pub use tmdb::client::{MovieApi, TmdbClient};
pub use tmdb::remote_source::RemoteDataSource;
