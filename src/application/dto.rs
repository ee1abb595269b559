// src/application/dto.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::Serialize;

use crate::application::ui_state::{MovieDetailUiState, MovieListUiState};
use crate::domain::{image_url, Movie, IMAGE_BASE_URL};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub vote_average: f64,
    pub vote_count: u32,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub adult: bool,
}

impl MovieDto {
    /// Project with image URLs built on `image_base` instead of the default CDN
    pub fn with_image_base(movie: &Movie, image_base: &str) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            poster_url: image_url(image_base, movie.poster_path.as_deref()),
            backdrop_url: image_url(image_base, movie.backdrop_path.as_deref()),
            release_date: movie.release_date.clone(),
            release_year: movie.release_year(),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            original_language: movie.original_language.clone(),
            original_title: movie.original_title.clone(),
            adult: movie.adult.unwrap_or(false),
        }
    }
}

impl From<&Movie> for MovieDto {
    fn from(movie: &Movie) -> Self {
        Self::with_image_base(movie, IMAGE_BASE_URL)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieListDto {
    pub movies: Vec<MovieDto>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub search_query: String,
}

impl MovieListDto {
    pub fn with_image_base(state: &MovieListUiState, image_base: &str) -> Self {
        Self {
            movies: state
                .movies
                .iter()
                .map(|movie| MovieDto::with_image_base(movie, image_base))
                .collect(),
            is_loading: state.is_loading,
            error: state.error.clone(),
            search_query: state.search_query.clone(),
        }
    }
}

impl From<&MovieListUiState> for MovieListDto {
    fn from(state: &MovieListUiState) -> Self {
        Self::with_image_base(state, IMAGE_BASE_URL)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetailDto {
    pub movie: Option<MovieDto>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl MovieDetailDto {
    pub fn with_image_base(state: &MovieDetailUiState, image_base: &str) -> Self {
        Self {
            movie: state
                .movie
                .as_ref()
                .map(|movie| MovieDto::with_image_base(movie, image_base)),
            is_loading: state.is_loading,
            error: state.error.clone(),
        }
    }
}

impl From<&MovieDetailUiState> for MovieDetailDto {
    fn from(state: &MovieDetailUiState) -> Self {
        Self::with_image_base(state, IMAGE_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_dto_derives_display_fields() {
        let mut movie = Movie::new(603, "The Matrix");
        movie.poster_path = Some("/matrix.jpg".to_string());
        movie.release_date = Some("1999-03-31".to_string());

        let dto = MovieDto::from(&movie);

        assert_eq!(dto.poster_url, "https://image.tmdb.org/t/p/w500/matrix.jpg");
        assert_eq!(dto.backdrop_url, "");
        assert_eq!(dto.release_year, Some(1999));
        assert!(!dto.adult);
    }

    #[test]
    fn test_configured_image_base_reaches_every_projection() {
        let mut movie = Movie::new(603, "The Matrix");
        movie.poster_path = Some("/matrix.jpg".to_string());
        movie.backdrop_path = Some("/rain.jpg".to_string());
        let base = "https://cdn.example.org/t/p/w342";

        let list = MovieListUiState {
            movies: vec![movie.clone()],
            ..MovieListUiState::default()
        };
        let detail = MovieDetailUiState {
            movie: Some(movie),
            ..MovieDetailUiState::default()
        };

        let list_dto = MovieListDto::with_image_base(&list, base);
        let detail_dto = MovieDetailDto::with_image_base(&detail, base);

        assert_eq!(list_dto.movies[0].poster_url, "https://cdn.example.org/t/p/w342/matrix.jpg");
        assert_eq!(list_dto.movies[0].backdrop_url, "https://cdn.example.org/t/p/w342/rain.jpg");
        assert_eq!(detail_dto.movie, Some(list_dto.movies[0].clone()));
    }

    #[test]
    fn test_list_dto_serializes() {
        let mut state = MovieListUiState::default();
        state.movies = vec![Movie::new(1, "Alien")];
        state.is_loading = false;

        let json = serde_json::to_value(MovieListDto::from(&state)).unwrap();

        assert_eq!(json["movies"][0]["title"], "Alien");
        assert_eq!(json["is_loading"], false);
        assert!(json["error"].is_null());
    }
}
