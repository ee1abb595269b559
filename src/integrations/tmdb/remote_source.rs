// src/integrations/tmdb/remote_source.rs
//
// Remote data source: turns the one catalog call into a result-state stream.

use std::sync::Arc;

use crate::domain::TrendingPage;
use crate::integrations::tmdb::client::MovieApi;
use crate::result_state::{result_state_stream, ResultStream};

pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct RemoteDataSource {
    api: Arc<dyn MovieApi>,
}

impl RemoteDataSource {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self { api }
    }

    /// `Loading`, then one `Success(page)` or `Error(cause)`.
    ///
    /// Single shot: every call issues a fresh request once polled.
    pub fn fetch_trending(&self, api_key: &str, language: &str) -> ResultStream<TrendingPage> {
        let api = Arc::clone(&self.api);
        let api_key = api_key.to_string();
        let language = language.to_string();

        result_state_stream(async move { api.trending_movies(&api_key, &language).await })
    }
}
