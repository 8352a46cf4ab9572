use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{LoadOutcome, LoadPhase};
use crate::catalog::{CatalogApi, CatalogError, CatalogItem, CatalogResult};
use crate::session::SessionContext;

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationState {
    /// Full ranked id list, fetched once per session.
    pub ids: Vec<String>,
    /// How many ids have been attempted so far, including skipped ones.
    pub resolved_count: usize,
    /// Resolved titles in id-list order.
    pub items: Vec<CatalogItem>,
    pub phase: LoadPhase,
    pub error: Option<String>,
}

impl RecommendationState {
    pub fn has_more(&self) -> bool {
        self.resolved_count < self.ids.len()
    }
}

impl Default for RecommendationState {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            resolved_count: 0,
            items: Vec::new(),
            phase: LoadPhase::Idle,
            error: None,
        }
    }
}

struct Inner {
    state: RecommendationState,
    generation: u64,
}

/// Turns the recommender's ranked id list into titles, one batch at a time.
pub struct RecommendationPaginator {
    api: Arc<dyn CatalogApi>,
    batch_size: usize,
    limit: u32,
    inner: RwLock<Inner>,
}

impl RecommendationPaginator {
    pub fn new(api: Arc<dyn CatalogApi>, batch_size: usize, limit: u32) -> Self {
        Self {
            api,
            batch_size: batch_size.max(1),
            limit,
            inner: RwLock::new(Inner {
                state: RecommendationState::default(),
                generation: 0,
            }),
        }
    }

    pub async fn snapshot(&self) -> RecommendationState {
        self.inner.read().await.state.clone()
    }

    /// Fetch the ranked id list for the session's user and resolve the first batch.
    ///
    /// Also used for a reload. The current ids and items stay in place until
    /// the new list and its first batch are ready, so a failed reload leaves
    /// the section as it was.
    pub async fn initialize(&self, session: &SessionContext) -> CatalogResult<LoadOutcome> {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.generation += 1;
            inner.state.phase = LoadPhase::Loading;
            inner.generation
        };

        let Some(user_id) = session.user_id.as_deref() else {
            debug!("no user id in session, recommendations left empty");
            let mut inner = self.inner.write().await;
            if inner.generation == generation {
                inner.state = RecommendationState {
                    phase: LoadPhase::Loaded,
                    ..Default::default()
                };
            }
            return Ok(LoadOutcome::Exhausted);
        };

        let ids = match self.api.fetch_recommendation_ids(user_id, self.limit).await {
            Ok(mut ids) => {
                ids.truncate(self.limit as usize);
                ids
            }
            Err(e) => {
                let mut inner = self.inner.write().await;
                if inner.generation == generation {
                    let state = &mut inner.state;
                    state.phase = if state.items.is_empty() {
                        LoadPhase::Idle
                    } else {
                        LoadPhase::Loaded
                    };
                    state.error = Some(unavailable_message(&e));
                }
                warn!(user_id, error = %e, "fetching recommendations failed");
                return Err(e);
            }
        };

        let end = ids.len().min(self.batch_size);
        info!(user_id, ids = ids.len(), batch = end, "resolving first recommendation batch");
        let items = resolve_batch(&self.api, &ids[..end]).await;

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            return Ok(LoadOutcome::Superseded);
        }
        let added = items.len();
        inner.state = RecommendationState {
            ids,
            resolved_count: end,
            items,
            phase: LoadPhase::Loaded,
            error: None,
        };
        Ok(LoadOutcome::Applied { added })
    }

    /// Resolve the next batch of ids and append it. No-op once every id has been tried.
    pub async fn load_more(&self) -> CatalogResult<LoadOutcome> {
        let (generation, start, batch) = {
            let mut inner = self.inner.write().await;
            if inner.state.phase != LoadPhase::Loaded {
                return Ok(LoadOutcome::Ignored);
            }
            if !inner.state.has_more() {
                return Ok(LoadOutcome::Exhausted);
            }
            let start = inner.state.resolved_count;
            let end = inner.state.ids.len().min(start + self.batch_size);
            let batch = inner.state.ids[start..end].to_vec();
            inner.state.phase = LoadPhase::LoadingMore;
            (inner.generation, start, batch)
        };

        let items = resolve_batch(&self.api, &batch).await;

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            return Ok(LoadOutcome::Superseded);
        }
        let added = items.len();
        inner.state.items.extend(items);
        inner.state.resolved_count = start + batch.len();
        inner.state.phase = LoadPhase::Loaded;
        debug!(
            resolved = inner.state.resolved_count,
            total = inner.state.ids.len(),
            "recommendation batch appended"
        );
        Ok(LoadOutcome::Applied { added })
    }
}

fn unavailable_message(e: &CatalogError) -> String {
    match e {
        CatalogError::Network(_) | CatalogError::Decode(_) => {
            "Your recommendations are unavailable right now. Please try again later.".to_string()
        }
        other => other.user_message(),
    }
}

/// Look up every id concurrently and return the hits in the order of `ids`.
///
/// Ids that fail to resolve are logged and left out.
async fn resolve_batch(api: &Arc<dyn CatalogApi>, ids: &[String]) -> Vec<CatalogItem> {
    let mut tasks = JoinSet::new();
    for (index, id) in ids.iter().cloned().enumerate() {
        let api = Arc::clone(api);
        tasks.spawn(async move {
            let result = api.resolve_by_id(&id).await;
            (index, id, result)
        });
    }

    let mut slots: Vec<Option<CatalogItem>> = vec![None; ids.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(item))) => slots[index] = Some(item),
            Ok((_, id, Err(e))) => warn!(id = %id, error = %e, "skipping unresolvable recommendation"),
            Err(e) => warn!(error = %e, "recommendation lookup task failed"),
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ids, FakeCatalog};
    use std::time::Duration;

    fn paginator(fake: &Arc<FakeCatalog>, batch: usize) -> RecommendationPaginator {
        let api: Arc<dyn CatalogApi> = fake.clone();
        RecommendationPaginator::new(api, batch, 50)
    }

    fn session() -> SessionContext {
        SessionContext::new("42", "Ana")
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_id_is_skipped_and_order_kept() {
        let fake = Arc::new(
            FakeCatalog::with_items(Vec::new())
                .recommending(&["A", "B", "C"])
                .missing("B")
                .resolve_delay("A", Duration::from_millis(300))
                .resolve_delay("C", Duration::from_millis(10)),
        );
        let recs = paginator(&fake, 7);

        let outcome = recs.initialize(&session()).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied { added: 2 });

        let state = recs.snapshot().await;
        assert_eq!(ids(&state.items), vec!["A", "C"]);
        assert_eq!(state.resolved_count, 3);
        assert!(!state.has_more());
    }

    #[tokio::test(start_paused = true)]
    async fn test_batches_keep_relevance_order() {
        let ranked: Vec<String> = (1..=10).map(|i| format!("r{}", i)).collect();
        let ranked_refs: Vec<&str> = ranked.iter().map(String::as_str).collect();
        let mut fake = FakeCatalog::with_items(Vec::new()).recommending(&ranked_refs);
        // Later ids answer first.
        for (i, id) in ranked.iter().enumerate() {
            fake = fake.resolve_delay(id, Duration::from_millis(100 - i as u64 * 10));
        }
        let fake = Arc::new(fake);
        let recs = paginator(&fake, 4);

        recs.initialize(&session()).await.unwrap();
        let state = recs.snapshot().await;
        assert_eq!(ids(&state.items), ranked[..4].to_vec());
        assert!(state.has_more());

        assert_eq!(recs.load_more().await.unwrap(), LoadOutcome::Applied { added: 4 });
        assert_eq!(recs.load_more().await.unwrap(), LoadOutcome::Applied { added: 2 });
        assert_eq!(recs.load_more().await.unwrap(), LoadOutcome::Exhausted);

        let state = recs.snapshot().await;
        assert_eq!(ids(&state.items), ranked);
        assert_eq!(state.resolved_count, 10);
        // The id list is fetched once, not per batch.
        assert_eq!(fake.recommendation_calls(), 1);
        assert_eq!(fake.resolves().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_load_more_resolves_one_batch() {
        let fake = Arc::new(
            FakeCatalog::with_items(Vec::new())
                .recommending(&["a", "b", "c", "d", "e", "f"])
                .resolve_delay("c", Duration::from_millis(50)),
        );
        let recs = paginator(&fake, 2);
        recs.initialize(&session()).await.unwrap();

        let (first, second) = tokio::join!(recs.load_more(), recs.load_more());
        assert_eq!(first.unwrap(), LoadOutcome::Applied { added: 2 });
        assert_eq!(second.unwrap(), LoadOutcome::Ignored);
        assert_eq!(recs.snapshot().await.resolved_count, 4);
        assert_eq!(fake.resolves().len(), 4);
    }

    #[tokio::test]
    async fn test_recommender_failure_sets_error() {
        let fake = Arc::new(FakeCatalog::with_items(Vec::new()).recommending(&["a"]));
        fake.fail_recommendations(true);
        let recs = paginator(&fake, 7);

        assert!(recs.initialize(&session()).await.is_err());
        let state = recs.snapshot().await;
        assert_eq!(state.phase, LoadPhase::Idle);
        assert_eq!(
            state.error.as_deref(),
            Some("Your recommendations are unavailable right now. Please try again later.")
        );
        assert!(state.items.is_empty());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_current_list() {
        let fake = Arc::new(FakeCatalog::with_items(Vec::new()).recommending(&["a", "b", "c", "d"]));
        let recs = paginator(&fake, 3);
        recs.initialize(&session()).await.unwrap();
        let before = recs.snapshot().await;
        assert_eq!(ids(&before.items), vec!["a", "b", "c"]);

        fake.fail_recommendations(true);
        assert!(recs.initialize(&session()).await.is_err());

        let after = recs.snapshot().await;
        assert_eq!(ids(&after.items), vec!["a", "b", "c"]);
        assert_eq!(after.ids, before.ids);
        assert_eq!(after.resolved_count, 3);
        assert_eq!(after.phase, LoadPhase::Loaded);
        assert!(after.error.is_some());

        // Paging continues from where the list was.
        assert_eq!(recs.load_more().await.unwrap(), LoadOutcome::Applied { added: 1 });
        assert_eq!(ids(&recs.snapshot().await.items), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_anonymous_session_has_no_recommendations() {
        let fake = Arc::new(FakeCatalog::with_items(Vec::new()).recommending(&["a"]));
        let recs = paginator(&fake, 7);

        let outcome = recs.initialize(&SessionContext::anonymous()).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Exhausted);
        assert_eq!(fake.recommendation_calls(), 0);
        assert_eq!(recs.snapshot().await.phase, LoadPhase::Loaded);
    }

    #[tokio::test]
    async fn test_id_list_is_capped() {
        let many: Vec<String> = (0..80).map(|i| format!("m{}", i)).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let fake = Arc::new(FakeCatalog::with_items(Vec::new()).recommending(&refs));
        let api: Arc<dyn CatalogApi> = fake.clone();
        let recs = RecommendationPaginator::new(api, 7, 50);

        recs.initialize(&session()).await.unwrap();
        let state = recs.snapshot().await;
        assert_eq!(state.ids.len(), 50);
        assert_eq!(state.items.len(), 7);
    }
}
