// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - This layer sits ABOVE the sync service
// - It turns user input into dispatches and result streams into screen state
// - It never talks to SQLite or HTTP directly
// - It translates between DTOs and domain entities

pub mod dto;
pub mod movie_detail;
pub mod movie_list;
pub mod search_pipeline;
pub mod state;
pub mod ui_state;

pub use dto::*;
pub use movie_detail::MovieDetailController;
pub use movie_list::MovieListController;
pub use search_pipeline::{SearchGate, SearchPipeline, SearchTrigger};
pub use state::AppState;
pub use ui_state::{MovieDetailUiState, MovieListUiState};
