// src/domain/movie.rs
//
// Movie catalog records
//
// Field names follow the catalog's JSON keys so the same type is used for
// the wire payload and the cache rows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// CDN prefix for poster and backdrop images
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// A movie snapshot as served by the catalog.
///
/// `id` is the only identity. Records are never patched field by field: a
/// newer fetch replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,

    pub title: String,

    #[serde(default)]
    pub overview: String,

    pub poster_path: Option<String>,

    pub backdrop_path: Option<String>,

    /// `YYYY-MM-DD` when well formed; may be empty or missing
    pub release_date: Option<String>,

    /// 0.0 - 10.0
    #[serde(default)]
    pub vote_average: f64,

    #[serde(default)]
    pub vote_count: u32,

    /// Only used to order the cache
    pub popularity: Option<f64>,

    pub adult: Option<bool>,

    pub original_language: Option<String>,

    pub original_title: Option<String>,
}

/// One page of the trending listing. Only `results` outlives the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingPage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Build a display URL for an image path. Absent paths yield an empty string.
pub fn image_url(base: &str, path: Option<&str>) -> String {
    match path {
        Some(path) => format!("{}{}", base, path),
        None => String::new(),
    }
}

impl Movie {
    /// Minimal record, mostly useful when building fixtures
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: None,
            adult: None,
            original_language: None,
            original_title: None,
        }
    }

    pub fn poster_url(&self) -> String {
        image_url(IMAGE_BASE_URL, self.poster_path.as_deref())
    }

    pub fn backdrop_url(&self) -> String {
        image_url(IMAGE_BASE_URL, self.backdrop_path.as_deref())
    }

    /// Year of release, if the date is present and parses
    pub fn release_year(&self) -> Option<i32> {
        let raw = self.release_date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }
}
