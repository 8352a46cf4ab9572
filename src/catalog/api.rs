use async_trait::async_trait;

use super::error::{CatalogError, CatalogResult};
use super::item::CatalogItem;
use super::query::{CatalogPage, CatalogQuery};

/// Read side of the movies and recommendation services.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn query_catalog(&self, query: &CatalogQuery) -> CatalogResult<CatalogPage>;
    async fn resolve_by_id(&self, id: &str) -> CatalogResult<CatalogItem>;
    /// Relevance-ranked title ids for a user, best first.
    async fn fetch_recommendation_ids(&self, user_id: &str, max_count: u32) -> CatalogResult<Vec<String>>;
    /// Titles of items similar to `show_id`, best first.
    async fn fetch_similar_titles(&self, show_id: &str, num: u32) -> CatalogResult<Vec<String>>;
    /// Record a user's star rating for a title. Implementations call
    /// `validate_rating` before sending anything.
    async fn submit_rating(&self, show_id: &str, user_id: &str, rating: u8) -> CatalogResult<()>;
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub fn validate_rating(rating: u8) -> CatalogResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CatalogError::Validation(format!(
            "Rating must be between {} and {} stars.",
            MIN_RATING, MAX_RATING
        )))
    }
}

/// Write side used by the admin console.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_categories(&self) -> CatalogResult<Vec<String>>;
    async fn add_title(&self, item: &CatalogItem) -> CatalogResult<CatalogItem>;
    async fn update_title(&self, id: &str, item: &CatalogItem) -> CatalogResult<CatalogItem>;
    async fn delete_title(&self, id: &str) -> CatalogResult<()>;
}
