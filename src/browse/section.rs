use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{LoadOutcome, LoadPhase, SectionKind};
use crate::catalog::{CatalogApi, CatalogItem, CatalogQuery, CatalogResult};

/// What the presentation layer sees of one paged section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionState {
    pub items: Vec<CatalogItem>,
    /// Last page appended. Starts at 1.
    pub page: u32,
    pub has_more: bool,
    pub total: u64,
    pub phase: LoadPhase,
    pub error: Option<String>,
}

impl Default for SectionState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            has_more: false,
            total: 0,
            phase: LoadPhase::Idle,
            error: None,
        }
    }
}

struct Inner {
    state: SectionState,
    // Bumped by every full (re)load; pages of an older generation are dropped.
    generation: u64,
}

/// Owns one named section and is the only writer of its state.
pub struct SectionLoader {
    kind: SectionKind,
    api: Arc<dyn CatalogApi>,
    query: CatalogQuery,
    dedupe: bool,
    inner: RwLock<Inner>,
}

impl SectionLoader {
    /// `query` carries the section's fixed page size, filters and sort; its
    /// page number is ignored.
    pub fn new(kind: SectionKind, api: Arc<dyn CatalogApi>, query: CatalogQuery, dedupe: bool) -> Self {
        Self {
            kind,
            api,
            query,
            dedupe,
            inner: RwLock::new(Inner {
                state: SectionState::default(),
                generation: 0,
            }),
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub async fn snapshot(&self) -> SectionState {
        self.inner.read().await.state.clone()
    }

    /// Fetch page 1 and replace the section's items with it.
    ///
    /// Also used for a full reload; a reload supersedes any page fetch that
    /// is still in flight for this section.
    pub async fn load_initial(&self) -> CatalogResult<LoadOutcome> {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.generation += 1;
            inner.state.phase = LoadPhase::Loading;
            inner.generation
        };

        let result = self.api.query_catalog(&self.query.page(1)).await;

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            debug!(section = self.kind.as_str(), "dropping superseded initial page");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                let added = page.movies.len();
                let state = &mut inner.state;
                state.has_more = has_more(1, self.query.page_size, added, page.total_num_movies);
                state.items = page.movies;
                state.page = 1;
                state.total = page.total_num_movies;
                state.phase = LoadPhase::Loaded;
                state.error = None;
                info!(section = self.kind.as_str(), items = added, total = state.total, "section loaded");
                Ok(LoadOutcome::Applied { added })
            }
            Err(e) => {
                let state = &mut inner.state;
                state.phase = if state.items.is_empty() {
                    LoadPhase::Idle
                } else {
                    LoadPhase::Loaded
                };
                state.error = Some(e.user_message());
                warn!(section = self.kind.as_str(), error = %e, "section load failed");
                Err(e)
            }
        }
    }

    /// Fetch the next page and append it.
    ///
    /// Ignored unless the section is `Loaded`, so at most one page fetch is
    /// ever outstanding and page N always lands after page N-1.
    pub async fn load_more(&self) -> CatalogResult<LoadOutcome> {
        let (generation, next_page) = {
            let mut inner = self.inner.write().await;
            if inner.state.phase != LoadPhase::Loaded {
                debug!(section = self.kind.as_str(), phase = ?inner.state.phase, "ignoring load more");
                return Ok(LoadOutcome::Ignored);
            }
            if !inner.state.has_more {
                return Ok(LoadOutcome::Exhausted);
            }
            inner.state.phase = LoadPhase::LoadingMore;
            (inner.generation, inner.state.page + 1)
        };

        let result = self.api.query_catalog(&self.query.page(next_page)).await;

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            debug!(section = self.kind.as_str(), page = next_page, "dropping page from before reload");
            return Ok(LoadOutcome::Superseded);
        }
        inner.state.phase = LoadPhase::Loaded;

        match result {
            Ok(page) => {
                let received = page.movies.len();
                let state = &mut inner.state;
                let added = if self.dedupe {
                    append_unique(&mut state.items, page.movies)
                } else {
                    state.items.extend(page.movies);
                    received
                };
                state.page = next_page;
                state.total = page.total_num_movies;
                state.has_more = has_more(next_page, self.query.page_size, received, page.total_num_movies);
                state.error = None;
                info!(
                    section = self.kind.as_str(),
                    page = next_page,
                    added,
                    items = state.items.len(),
                    "section page appended"
                );
                Ok(LoadOutcome::Applied { added })
            }
            Err(e) => {
                inner.state.error = Some(e.user_message());
                warn!(section = self.kind.as_str(), page = next_page, error = %e, "load more failed");
                Err(e)
            }
        }
    }
}

fn has_more(page: u32, page_size: u32, received: usize, total: u64) -> bool {
    received > 0 && u64::from(page) * u64::from(page_size) < total
}

/// Append only items whose id is not already present. Returns how many were added.
fn append_unique(items: &mut Vec<CatalogItem>, incoming: Vec<CatalogItem>) -> usize {
    let mut seen: HashSet<String> = items.iter().map(|i| i.show_id.clone()).collect();
    let before = items.len();
    for item in incoming {
        if seen.insert(item.show_id.clone()) {
            items.push(item);
        }
    }
    items.len() - before
}
