// src/application/movie_list.rs
//
// Movie list screen controller
//
// Owns the list state and the single active subscription feeding it.
// Every dispatch (search or trending reload) supersedes the previous one:
// the old task is aborted and anything it still tries to write is dropped
// by the generation check.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::search_pipeline::{SearchPipeline, SearchTrigger};
use crate::application::ui_state::MovieListUiState;
use crate::config::AppConfig;
use crate::events::{EventBus, SearchDispatched};
use crate::result_state::ResultStream;
use crate::services::MovieSyncService;
use crate::domain::Movie;

struct ListDispatcher {
    sync: MovieSyncService,
    event_bus: Arc<EventBus>,
    state: watch::Sender<MovieListUiState>,
    generation: AtomicU64,
    active: Mutex<Option<JoinHandle<()>>>,
}

impl ListDispatcher {
    fn active(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn dispatch(self: &Arc<Self>, trigger: SearchTrigger) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let stream = match trigger {
            SearchTrigger::Trending => self.sync.get_trending(),
            SearchTrigger::Search(query) => {
                let stream = self.sync.search_movies(&query);
                self.event_bus.emit(SearchDispatched::new(query, generation));
                stream
            }
        };

        let mut active = self.active();
        if let Some(previous) = active.take() {
            previous.abort();
        }
        *active = Some(tokio::spawn(Arc::clone(self).collect_into_state(stream, generation)));
    }

    async fn collect_into_state(self: Arc<Self>, mut stream: ResultStream<Vec<Movie>>, generation: u64) {
        while let Some(result) = stream.next().await {
            let current = self.state.send_if_modified(|state| {
                if self.generation.load(Ordering::SeqCst) != generation {
                    return false;
                }
                state.apply(result);
                true
            });

            if !current {
                log::debug!("dropping emission from superseded dispatch {}", generation);
                return;
            }
        }
    }

    fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(active) = self.active().take() {
            active.abort();
        }
    }
}

pub struct MovieListController {
    dispatcher: Arc<ListDispatcher>,
    pipeline: SearchPipeline,
}

impl MovieListController {
    /// Build the controller and start the initial trending load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(sync: MovieSyncService, event_bus: Arc<EventBus>, config: &AppConfig) -> Self {
        let (state, _) = watch::channel(MovieListUiState::default());

        let dispatcher = Arc::new(ListDispatcher {
            sync,
            event_bus,
            state,
            generation: AtomicU64::new(0),
            active: Mutex::new(None),
        });

        let for_pipeline = Arc::clone(&dispatcher);
        let pipeline = SearchPipeline::spawn(
            config.search_debounce(),
            config.min_search_length,
            move |trigger| for_pipeline.dispatch(trigger),
        );

        let controller = Self {
            dispatcher,
            pipeline,
        };
        controller.load_trending();
        controller
    }

    /// Show the new text immediately, search once typing settles
    pub fn on_search_query_change(&self, query: &str) {
        self.dispatcher.state.send_modify(|state| {
            state.search_query = query.to_string();
        });
        self.pipeline.push(query);
    }

    /// (Re)load the trending listing, superseding any active search
    pub fn load_trending(&self) {
        self.dispatcher.dispatch(SearchTrigger::Trending);
    }

    pub fn clear_error(&self) {
        self.dispatcher.state.send_if_modified(|state| state.error.take().is_some());
    }

    pub fn state(&self) -> MovieListUiState {
        self.dispatcher.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MovieListUiState> {
        self.dispatcher.state.subscribe()
    }

    /// Stop the debounce driver and the active subscription
    pub fn shutdown(&self) {
        self.pipeline.shutdown();
        self.dispatcher.cancel();
    }
}

impl Drop for MovieListController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
