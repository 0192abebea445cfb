//! Debounced free-text search.
//!
//! Each call to `SearchDebouncer::input` replaces the pending timer. When the
//! timer fires, the query is sent to the catalog as a detached request. Every
//! input bumps a generation counter kept inside the published state; a response
//! is applied only if its generation is still the latest, so a slow response to
//! an old query can never overwrite the results of a newer one.
//!
//! State is published over a `tokio::sync::watch` channel, so any number of
//! observers can follow the results.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::model::GameSummary;
use crate::rawg::CatalogSource;

/// Where the latest query is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// Query is blank; nothing to show
    #[default]
    Idle,
    /// Waiting for input to settle
    Waiting,
    /// Request in flight
    Searching,
    /// Results for the latest query are available
    Done,
}

/// Published search state
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// Latest query typed
    pub query: String,
    /// Results for `query` once `status` is `Done`
    pub games: Vec<GameSummary>,
    pub status: SearchStatus,
    /// Incremented on every input
    pub generation: u64,
}

impl SearchResults {
    pub fn is_settled(&self) -> bool {
        matches!(self.status, SearchStatus::Idle | SearchStatus::Done)
    }
}

/// Rate-limits search queries against a catalog
pub struct SearchDebouncer<C: CatalogSource + 'static> {
    client: Arc<C>,
    delay: Duration,
    result_limit: u32,
    timer: Option<JoinHandle<()>>,
    state: Arc<watch::Sender<SearchResults>>,
}

impl<C: CatalogSource + 'static> SearchDebouncer<C> {
    pub fn new(client: Arc<C>, delay: Duration, result_limit: u32) -> Self {
        let (state, _) = watch::channel(SearchResults::default());
        Self {
            client,
            delay,
            result_limit,
            timer: None,
            state: Arc::new(state),
        }
    }

    /// Observe search state changes
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.state.subscribe()
    }

    /// Current search state
    pub fn current(&self) -> SearchResults {
        self.state.borrow().clone()
    }

    /// Record a change to the query text.
    ///
    /// A blank query clears the results immediately without a request.
    pub fn input(&mut self, query: &str) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let blank = query.trim().is_empty();
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.query = query.to_string();
            if blank {
                state.games.clear();
                state.status = SearchStatus::Idle;
            } else {
                state.status = SearchStatus::Waiting;
            }
        });

        if blank {
            tracing::debug!("Search cleared");
            return;
        }

        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let delay = self.delay;
        let limit = self.result_limit;
        let query = query.trim().to_string();

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let still_current = state.send_if_modified(|s| {
                if s.generation != generation {
                    return false;
                }
                s.status = SearchStatus::Searching;
                true
            });
            if !still_current {
                return;
            }

            tracing::debug!("Dispatching search {:?} (generation {})", query, generation);

            // Detached so a later input cancels only the timer, never the request
            tokio::spawn(async move {
                let games = client.list_games(Some(&query), limit).await;
                let applied = state.send_if_modified(|s| {
                    if s.generation != generation {
                        return false;
                    }
                    s.games = games;
                    s.status = SearchStatus::Done;
                    true
                });
                if !applied {
                    tracing::debug!("Discarding stale results for {:?}", query);
                }
            });
        }));
    }

    /// Wait until the latest query has results (or was cleared)
    pub async fn settled(&self) -> SearchResults {
        let mut rx = self.subscribe();
        match rx.wait_for(SearchResults::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.current(),
        }
    }
}

impl<C: CatalogSource + 'static> Drop for SearchDebouncer<C> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
