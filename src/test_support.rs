//! In-memory catalog backend for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use crate::catalog::{
    validate_rating, AdminApi, CatalogApi, CatalogError, CatalogItem, CatalogPage, CatalogQuery, CatalogResult,
    TitleKind,
};

pub fn title(id: &str) -> CatalogItem {
    let mut item = CatalogItem::new(id, TitleKind::Movie, format!("Title {}", id));
    item.release_year = 2000;
    item
}

pub fn titles(prefix: &str, count: usize) -> Vec<CatalogItem> {
    (1..=count).map(|i| title(&format!("{}{}", prefix, i))).collect()
}

pub fn ids(items: &[CatalogItem]) -> Vec<String> {
    items.iter().map(|i| i.show_id.clone()).collect()
}

pub struct FakeCatalog {
    items: Mutex<Vec<CatalogItem>>,
    recommendations: Vec<String>,
    missing: HashSet<String>,
    resolve_delays: HashMap<String, Duration>,
    search_delays: HashMap<String, Duration>,
    hold_queries: AtomicBool,
    release: Semaphore,
    entered: Notify,
    fail_queries: AtomicBool,
    fail_recommendations: AtomicBool,
    queries: Mutex<Vec<CatalogQuery>>,
    resolves: Mutex<Vec<String>>,
    ratings: Mutex<Vec<(String, String, u8)>>,
    recommendation_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            items: Mutex::new(items),
            recommendations: Vec::new(),
            missing: HashSet::new(),
            resolve_delays: HashMap::new(),
            search_delays: HashMap::new(),
            hold_queries: AtomicBool::new(false),
            release: Semaphore::new(0),
            entered: Notify::new(),
            fail_queries: AtomicBool::new(false),
            fail_recommendations: AtomicBool::new(false),
            queries: Mutex::new(Vec::new()),
            resolves: Mutex::new(Vec::new()),
            ratings: Mutex::new(Vec::new()),
            recommendation_calls: AtomicUsize::new(0),
        }
    }

    pub fn recommending(mut self, ids: &[&str]) -> Self {
        self.recommendations = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn missing(mut self, id: &str) -> Self {
        self.missing.insert(id.to_string());
        self
    }

    pub fn resolve_delay(mut self, id: &str, delay: Duration) -> Self {
        self.resolve_delays.insert(id.to_string(), delay);
        self
    }

    pub fn search_delay(mut self, text: &str, delay: Duration) -> Self {
        self.search_delays.insert(text.to_string(), delay);
        self
    }

    /// Make every catalog query wait for `release_queries` before answering.
    pub fn hold_queries(self) -> Self {
        self.hold_queries.store(true, Ordering::SeqCst);
        self
    }

    pub fn release_queries(&self, count: usize) {
        self.release.add_permits(count);
    }

    /// Resolves once at least `count` catalog queries have been received.
    pub async fn wait_for_queries(&self, count: usize) {
        loop {
            let notified = self.entered.notified();
            if self.queries.lock().unwrap().len() >= count {
                return;
            }
            notified.await;
        }
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_recommendations(&self, fail: bool) {
        self.fail_recommendations.store(fail, Ordering::SeqCst);
    }

    pub fn queries(&self) -> Vec<CatalogQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn resolves(&self) -> Vec<String> {
        self.resolves.lock().unwrap().clone()
    }

    pub fn ratings(&self) -> Vec<(String, String, u8)> {
        self.ratings.lock().unwrap().clone()
    }

    pub fn recommendation_calls(&self) -> usize {
        self.recommendation_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<CatalogItem> {
        self.items.lock().unwrap().clone()
    }

    fn page_of(&self, query: &CatalogQuery) -> CatalogPage {
        let items = self.items.lock().unwrap();
        let matching: Vec<CatalogItem> = match query.effective_search() {
            Some(text) => {
                let text = text.to_lowercase();
                items
                    .iter()
                    .filter(|i| i.title.to_lowercase().contains(&text))
                    .cloned()
                    .collect()
            }
            None => items.clone(),
        };
        let start = (query.page_num.saturating_sub(1) * query.page_size) as usize;
        CatalogPage {
            total_num_movies: matching.len() as u64,
            movies: matching
                .into_iter()
                .skip(start)
                .take(query.page_size as usize)
                .collect(),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn query_catalog(&self, query: &CatalogQuery) -> CatalogResult<CatalogPage> {
        self.queries.lock().unwrap().push(query.clone());
        self.entered.notify_one();
        if self.hold_queries.load(Ordering::SeqCst) {
            let permit = self
                .release
                .acquire()
                .await
                .map_err(|e| CatalogError::Network(e.to_string()))?;
            permit.forget();
        }
        if let Some(delay) = query.effective_search().and_then(|s| self.search_delays.get(s)) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(CatalogError::Network("HTTP 500 from fake".to_string()));
        }
        Ok(self.page_of(query))
    }

    async fn resolve_by_id(&self, id: &str) -> CatalogResult<CatalogItem> {
        self.resolves.lock().unwrap().push(id.to_string());
        if let Some(delay) = self.resolve_delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        if self.missing.contains(id) {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(title(id))
    }

    async fn fetch_recommendation_ids(&self, _user_id: &str, max_count: u32) -> CatalogResult<Vec<String>> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_recommendations.load(Ordering::SeqCst) {
            return Err(CatalogError::Network("recommender down".to_string()));
        }
        Ok(self
            .recommendations
            .iter()
            .take(max_count as usize)
            .cloned()
            .collect())
    }

    async fn fetch_similar_titles(&self, _show_id: &str, num: u32) -> CatalogResult<Vec<String>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .take(num as usize)
            .map(|i| i.title.clone())
            .collect())
    }

    async fn submit_rating(&self, show_id: &str, user_id: &str, rating: u8) -> CatalogResult<()> {
        validate_rating(rating)?;
        self.ratings
            .lock()
            .unwrap()
            .push((show_id.to_string(), user_id.to_string(), rating));
        Ok(())
    }
}

#[async_trait]
impl AdminApi for FakeCatalog {
    async fn list_categories(&self) -> CatalogResult<Vec<String>> {
        Ok(crate::catalog::Category::ALL
            .iter()
            .map(|c| c.as_str().to_string())
            .collect())
    }

    async fn add_title(&self, item: &CatalogItem) -> CatalogResult<CatalogItem> {
        if item.title.trim().is_empty() {
            return Err(CatalogError::Validation("The title field is required.".to_string()));
        }
        self.items.lock().unwrap().push(item.clone());
        Ok(item.clone())
    }

    async fn update_title(&self, id: &str, item: &CatalogItem) -> CatalogResult<CatalogItem> {
        let mut items = self.items.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|i| i.show_id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        *slot = item.clone();
        Ok(item.clone())
    }

    async fn delete_title(&self, id: &str) -> CatalogResult<()> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.show_id != id);
        if items.len() == before {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
