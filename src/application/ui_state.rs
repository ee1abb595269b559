// src/application/ui_state.rs
//
// Display-ready screen state
//
// Result states are folded into flat records. An error never clears the
// movies already on screen.

use serde::Serialize;

use crate::domain::Movie;
use crate::result_state::ResultState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieListUiState {
    pub movies: Vec<Movie>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub search_query: String,
}

impl Default for MovieListUiState {
    /// The list starts loading as soon as the screen exists
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            is_loading: true,
            error: None,
            search_query: String::new(),
        }
    }
}

impl MovieListUiState {
    pub fn apply(&mut self, state: ResultState<Vec<Movie>>) {
        match state {
            ResultState::Loading => {
                self.is_loading = true;
                self.error = None;
            }
            ResultState::Success(movies) => {
                self.movies = movies;
                self.is_loading = false;
                self.error = None;
            }
            ResultState::Error(cause) => {
                self.is_loading = false;
                self.error = Some(cause.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetailUiState {
    pub movie: Option<Movie>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for MovieDetailUiState {
    fn default() -> Self {
        Self {
            movie: None,
            is_loading: true,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn movies() -> Vec<Movie> {
        vec![Movie::new(1, "Alien"), Movie::new(2, "Aliens")]
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = MovieListUiState::default();
        assert!(state.is_loading);
        assert!(state.movies.is_empty());
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_success_replaces_movies() {
        let mut state = MovieListUiState::default();
        state.apply(ResultState::Success(movies()));

        assert_eq!(state.movies, movies());
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_loading_clears_error_but_keeps_movies() {
        let mut state = MovieListUiState::default();
        state.apply(ResultState::Success(movies()));
        state.apply(ResultState::error(AppError::Network("timeout".to_string())));
        state.apply(ResultState::Loading);

        assert!(state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.movies, movies());
    }

    #[test]
    fn test_error_keeps_last_good_list() {
        let mut state = MovieListUiState::default();
        state.search_query = "ali".to_string();
        state.apply(ResultState::Success(movies()));
        state.apply(ResultState::error(AppError::NoConnectivityNoCache));

        assert_eq!(state.movies, movies());
        assert!(!state.is_loading);
        assert_eq!(
            state.error.as_deref(),
            Some("No internet connection and no cached data")
        );
        assert_eq!(state.search_query, "ali");
    }
}
