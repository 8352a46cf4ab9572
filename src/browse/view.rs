use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::{
    LoadOutcome, RecommendationPaginator, RecommendationState, SearchCoordinator, SearchOutcome,
    SearchState, SectionKind, SectionLoader, SectionState,
};
use crate::catalog::{CatalogApi, CatalogError, CatalogQuery, CatalogResult, Category, SortKey};
use crate::config::BrowseConfig;
use crate::session::SessionContext;

#[derive(Debug, Clone, Serialize)]
pub struct SectionSnapshot {
    pub kind: SectionKind,
    pub label: String,
    #[serde(flatten)]
    pub state: SectionState,
}

/// Read-only picture of the whole browsing view.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseSnapshot {
    pub heading: String,
    pub recommendations: RecommendationState,
    pub sections: Vec<SectionSnapshot>,
    pub search: SearchState,
}

/// The movie browsing view: five sections plus search.
pub struct BrowseView {
    session: SessionContext,
    recommendations: RecommendationPaginator,
    popular: SectionLoader,
    new_releases: SectionLoader,
    all_movies: SectionLoader,
    all_shows: SectionLoader,
    search: SearchCoordinator,
}

impl BrowseView {
    pub fn new(api: Arc<dyn CatalogApi>, config: &BrowseConfig, session: SessionContext) -> Self {
        let page = CatalogQuery::new(config.section_page_size, 1);
        let section = |kind: SectionKind, query: CatalogQuery| {
            SectionLoader::new(kind, Arc::clone(&api), query, config.dedupe_pages)
        };

        Self {
            recommendations: RecommendationPaginator::new(
                Arc::clone(&api),
                config.recommendation_batch,
                config.recommendation_limit,
            ),
            popular: section(
                SectionKind::Popular,
                page.clone().with_sort(Some(SortKey::Popularity)),
            ),
            new_releases: section(
                SectionKind::NewReleases,
                page.clone().with_sort(Some(SortKey::ReleaseYearDesc)),
            ),
            all_movies: section(
                SectionKind::AllMovies,
                page.clone().with_categories(Category::movie_categories()),
            ),
            all_shows: section(
                SectionKind::AllShows,
                page.clone().with_categories(Category::tv_categories()),
            ),
            search: SearchCoordinator::new(
                Arc::clone(&api),
                config.search_threshold,
                config.search_page_size,
            ),
            session,
        }
    }

    fn section(&self, kind: SectionKind) -> Option<&SectionLoader> {
        match kind {
            SectionKind::Recommendations => None,
            SectionKind::Popular => Some(&self.popular),
            SectionKind::NewReleases => Some(&self.new_releases),
            SectionKind::AllMovies => Some(&self.all_movies),
            SectionKind::AllShows => Some(&self.all_shows),
        }
    }

    /// Load every section concurrently.
    ///
    /// A failing section is recorded in its own state and returned here; it
    /// never prevents the others from loading.
    pub async fn mount(&self) -> Vec<(SectionKind, CatalogError)> {
        info!(user = ?self.session.user_id, "mounting browse view");
        let (recommendations, popular, new_releases, all_movies, all_shows) = tokio::join!(
            self.recommendations.initialize(&self.session),
            self.popular.load_initial(),
            self.new_releases.load_initial(),
            self.all_movies.load_initial(),
            self.all_shows.load_initial(),
        );

        let results = [
            (SectionKind::Recommendations, recommendations),
            (SectionKind::Popular, popular),
            (SectionKind::NewReleases, new_releases),
            (SectionKind::AllMovies, all_movies),
            (SectionKind::AllShows, all_shows),
        ];

        let mut failures = Vec::new();
        for (kind, result) in results {
            if let Err(e) = result {
                warn!(section = kind.as_str(), error = %e, "section failed to load on mount");
                failures.push((kind, e));
            }
        }
        failures
    }

    /// "Show more" for one section.
    pub async fn load_more(&self, kind: SectionKind) -> CatalogResult<LoadOutcome> {
        match self.section(kind) {
            Some(loader) => loader.load_more().await,
            None => self.recommendations.load_more().await,
        }
    }

    /// Full reload of one section from page 1.
    pub async fn reload(&self, kind: SectionKind) -> CatalogResult<LoadOutcome> {
        match self.section(kind) {
            Some(loader) => loader.load_initial().await,
            None => self.recommendations.initialize(&self.session).await,
        }
    }

    pub async fn search(&self, input: &str) -> CatalogResult<SearchOutcome> {
        self.search.on_input(input).await
    }

    pub async fn section_state(&self, kind: SectionKind) -> Option<SectionState> {
        match self.section(kind) {
            Some(loader) => Some(loader.snapshot().await),
            None => None,
        }
    }

    pub async fn snapshot(&self) -> BrowseSnapshot {
        let mut sections = Vec::new();
        for loader in [&self.popular, &self.new_releases, &self.all_movies, &self.all_shows] {
            sections.push(SectionSnapshot {
                kind: loader.kind(),
                label: loader.kind().label().to_string(),
                state: loader.snapshot().await,
            });
        }

        BrowseSnapshot {
            heading: self.session.recommendations_heading(),
            recommendations: self.recommendations.snapshot().await,
            sections,
            search: self.search.snapshot().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::LoadPhase;
    use crate::test_support::{ids, titles, FakeCatalog};

    fn view(fake: &Arc<FakeCatalog>) -> BrowseView {
        let api: Arc<dyn CatalogApi> = fake.clone();
        BrowseView::new(api, &BrowseConfig::default(), SessionContext::new("42", "Ana"))
    }

    #[tokio::test]
    async fn test_mount_loads_all_sections() {
        let fake = Arc::new(FakeCatalog::with_items(titles("t", 30)).recommending(&["r1", "r2"]));
        let view = view(&fake);

        let failures = view.mount().await;
        assert!(failures.is_empty());

        let snapshot = view.snapshot().await;
        assert_eq!(snapshot.heading, "Ana's Top Recommendations");
        assert_eq!(ids(&snapshot.recommendations.items), vec!["r1", "r2"]);
        assert_eq!(snapshot.sections.len(), 4);
        for section in &snapshot.sections {
            assert_eq!(section.state.items.len(), 7, "{}", section.kind);
            assert_eq!(section.state.phase, LoadPhase::Loaded);
        }
    }

    #[tokio::test]
    async fn test_sections_use_their_fixed_parameters() {
        let fake = Arc::new(FakeCatalog::with_items(titles("t", 30)));
        let view = view(&fake);
        view.mount().await;

        let queries = fake.queries();
        assert_eq!(queries.len(), 4);
        assert!(queries.iter().all(|q| q.page_size == 7 && q.page_num == 1));
        assert!(queries.iter().any(|q| q.sort == Some(SortKey::Popularity)));
        assert!(queries.iter().any(|q| q.sort == Some(SortKey::ReleaseYearDesc)));
        assert!(queries
            .iter()
            .any(|q| q.categories.contains(&Category::KidsTv) && !q.categories.contains(&Category::Action)));
        assert!(queries
            .iter()
            .any(|q| q.categories.contains(&Category::Action) && !q.categories.contains(&Category::KidsTv)));
    }

    #[tokio::test]
    async fn test_failed_mount_does_not_touch_siblings() {
        let fake = Arc::new(FakeCatalog::with_items(titles("t", 30)).recommending(&["r1"]));
        fake.fail_recommendations(true);
        let view = view(&fake);

        let failures = view.mount().await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, SectionKind::Recommendations);

        let snapshot = view.snapshot().await;
        assert!(snapshot.recommendations.error.is_some());
        assert!(snapshot.sections.iter().all(|s| s.state.items.len() == 7));
    }

    #[tokio::test]
    async fn test_load_more_popular_appends_page_two() {
        let all = titles("t", 30);
        let fake = Arc::new(FakeCatalog::with_items(all.clone()));
        let view = view(&fake);
        view.mount().await;
        let before = view.section_state(SectionKind::Popular).await.unwrap().items;
        assert_eq!(before.len(), 7);

        let outcome = view.load_more(SectionKind::Popular).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied { added: 7 });

        let after = view.section_state(SectionKind::Popular).await.unwrap().items;
        assert_eq!(after.len(), 14);
        assert_eq!(&after[..7], &before[..]);
        assert_eq!(ids(&after[7..]), ids(&all[7..14]));
        // Other sections are untouched.
        let movies = view.section_state(SectionKind::AllMovies).await.unwrap();
        assert_eq!(movies.items.len(), 7);
    }

    #[tokio::test]
    async fn test_search_does_not_touch_sections() {
        let fake = Arc::new(FakeCatalog::with_items(titles("t", 30)));
        let view = view(&fake);
        view.mount().await;

        let outcome = view.search("Title t1").await.unwrap();
        assert!(matches!(outcome, SearchOutcome::Applied { .. }));
        let snapshot = view.snapshot().await;
        assert!(snapshot.search.active);
        assert!(snapshot.sections.iter().all(|s| s.state.items.len() == 7));
    }
}
