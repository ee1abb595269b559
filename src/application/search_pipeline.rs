// src/application/search_pipeline.rs
//
// Search input debouncing
//
// Raw query text goes in, at most one trigger per typing pause comes out:
//
//   text ──► debounce (timer restarts on every change)
//        ──► drop if equal to the previous debounced text
//        ──► blank ⇒ Trending | shorter than min length ⇒ nothing | else ⇒ Search

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What a settled query asks the list to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTrigger {
    Trending,
    Search(String),
}

/// Distinct-until-changed filter followed by blank/length gating
#[derive(Debug)]
pub struct SearchGate {
    min_length: usize,
    last: Option<String>,
}

impl SearchGate {
    /// The field starts empty, so a settled empty query is not a change
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            last: Some(String::new()),
        }
    }

    pub fn admit(&mut self, text: String) -> Option<SearchTrigger> {
        if self.last.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last = Some(text.clone());

        if text.trim().is_empty() {
            Some(SearchTrigger::Trending)
        } else if text.chars().count() < self.min_length {
            None
        } else {
            Some(SearchTrigger::Search(text))
        }
    }
}

/// Background task that debounces query text into triggers
pub struct SearchPipeline {
    input: watch::Sender<String>,
    driver: JoinHandle<()>,
}

impl SearchPipeline {
    /// Spawn the driver on the current tokio runtime
    pub fn spawn<F>(debounce: Duration, min_length: usize, on_trigger: F) -> Self
    where
        F: Fn(SearchTrigger) + Send + 'static,
    {
        let (input, rx) = watch::channel(String::new());
        let driver = tokio::spawn(Self::run(rx, debounce, SearchGate::new(min_length), on_trigger));

        Self { input, driver }
    }

    /// Feed the latest text. Unchanged text does not restart the timer.
    pub fn push(&self, text: &str) {
        self.input.send_if_modified(|current| {
            if current == text {
                false
            } else {
                *current = text.to_string();
                true
            }
        });
    }

    pub fn shutdown(&self) {
        self.driver.abort();
    }

    async fn run<F>(
        mut rx: watch::Receiver<String>,
        debounce: Duration,
        mut gate: SearchGate,
        on_trigger: F,
    ) where
        F: Fn(SearchTrigger),
    {
        loop {
            if rx.changed().await.is_err() {
                return;
            }

            let settled = loop {
                let pending = rx.borrow_and_update().clone();
                tokio::select! {
                    _ = tokio::time::sleep(debounce) => break pending,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            };

            match gate.admit(settled) {
                Some(trigger) => {
                    log::debug!("search trigger {:?}", trigger);
                    on_trigger(trigger);
                }
                None => log::trace!("debounced query suppressed"),
            }
        }
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        self.driver.abort();
    }
}
