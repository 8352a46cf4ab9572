use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::catalog::{CatalogApi, CatalogItem, CatalogQuery, CatalogResult};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<CatalogItem>,
    /// Whether the view is showing search results instead of the sections.
    pub active: bool,
    pub in_flight: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Input was empty; results cleared without a request.
    Cleared,
    /// Input too short to search; previous results left as they were.
    BelowThreshold,
    Applied { count: usize },
    /// A later query was issued before this one answered.
    Superseded,
}

struct Inner {
    state: SearchState,
    // Sequence number of the most recently issued query.
    issued: u64,
}

/// Server-side search-as-you-type with last-issued-wins semantics.
pub struct SearchCoordinator {
    api: Arc<dyn CatalogApi>,
    threshold: usize,
    page_size: u32,
    inner: RwLock<Inner>,
}

impl SearchCoordinator {
    pub fn new(api: Arc<dyn CatalogApi>, threshold: usize, page_size: u32) -> Self {
        Self {
            api,
            threshold,
            page_size,
            inner: RwLock::new(Inner {
                state: SearchState::default(),
                issued: 0,
            }),
        }
    }

    pub async fn snapshot(&self) -> SearchState {
        self.inner.read().await.state.clone()
    }

    /// Handle a change of the search input.
    ///
    /// Length is counted in characters of the trimmed input. Only a response
    /// whose sequence number is still the latest issued is applied.
    pub async fn on_input(&self, input: &str) -> CatalogResult<SearchOutcome> {
        let text = input.trim();
        let len = text.chars().count();

        let seq = {
            let mut inner = self.inner.write().await;
            inner.state.query = input.to_string();

            if len == 0 {
                // Also invalidates anything still in flight.
                inner.issued += 1;
                inner.state.results.clear();
                inner.state.active = false;
                inner.state.in_flight = false;
                inner.state.error = None;
                return Ok(SearchOutcome::Cleared);
            }
            if len <= self.threshold {
                return Ok(SearchOutcome::BelowThreshold);
            }

            inner.issued += 1;
            inner.state.in_flight = true;
            inner.issued
        };

        let query = CatalogQuery::new(self.page_size, 1).with_search(text);
        let result = self.api.query_catalog(&query).await;

        let mut inner = self.inner.write().await;
        if inner.issued != seq {
            debug!(seq, latest = inner.issued, query = text, "discarding stale search response");
            return Ok(SearchOutcome::Superseded);
        }
        inner.state.in_flight = false;

        match result {
            Ok(page) => {
                let count = page.movies.len();
                inner.state.results = page.movies;
                inner.state.active = true;
                inner.state.error = None;
                debug!(seq, query = text, count, "search applied");
                Ok(SearchOutcome::Applied { count })
            }
            Err(e) => {
                inner.state.error = Some(e.user_message());
                warn!(query = text, error = %e, "search failed");
                Err(e)
            }
        }
    }
}
