use serde::{Deserialize, Serialize};

use super::category::Category;
use super::item::CatalogItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Default,
    TitleAsc,
    TitleDesc,
    Popularity,
    ReleaseYearDesc,
    AverageRatingAsc,
    AverageRatingDesc,
    NumRatingsAsc,
    NumRatingsDesc,
}

impl SortKey {
    /// Value sent as `sortOrder`. `Default` is never sent: the backend
    /// sorts by title for any value it does not recognise.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::TitleAsc => "asc",
            SortKey::TitleDesc => "desc",
            SortKey::Popularity => "popularity",
            SortKey::ReleaseYearDesc => "release_year_desc",
            SortKey::AverageRatingAsc => "averagerating_asc",
            SortKey::AverageRatingDesc => "averagerating_desc",
            SortKey::NumRatingsAsc => "numratings_asc",
            SortKey::NumRatingsDesc => "numratings_desc",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(SortKey::Default),
            "asc" | "title" | "title_asc" => Some(SortKey::TitleAsc),
            "desc" | "title_desc" => Some(SortKey::TitleDesc),
            "popularity" | "popular" => Some(SortKey::Popularity),
            "release_year_desc" | "newest" => Some(SortKey::ReleaseYearDesc),
            "averagerating_asc" | "average_rating_asc" => Some(SortKey::AverageRatingAsc),
            "averagerating_desc" | "average_rating_desc" | "rating" => Some(SortKey::AverageRatingDesc),
            "numratings_asc" | "num_ratings_asc" => Some(SortKey::NumRatingsAsc),
            "numratings_desc" | "num_ratings_desc" => Some(SortKey::NumRatingsDesc),
            _ => None,
        }
    }
}

/// Parameters of one `GetMovies` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub page_size: u32,
    pub page_num: u32,
    pub categories: Vec<Category>,
    pub sort: Option<SortKey>,
    pub search: Option<String>,
}

impl CatalogQuery {
    pub fn new(page_size: u32, page_num: u32) -> Self {
        Self {
            page_size,
            page_num,
            categories: Vec::new(),
            sort: None,
            search: None,
        }
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    pub fn with_sort(mut self, sort: Option<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn page(&self, page_num: u32) -> Self {
        Self {
            page_num,
            ..self.clone()
        }
    }

    /// Search text that will actually be sent, if any.
    pub fn effective_search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Query string pairs in request order. Categories are repeated, not joined.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("pageSize", self.page_size.to_string()),
            ("pageNum", self.page_num.to_string()),
        ];
        for category in &self.categories {
            pairs.push(("categories", category.as_str().to_string()));
        }
        if let Some(sort) = self.sort.filter(|s| *s != SortKey::Default) {
            pairs.push(("sortOrder", sort.as_str().to_string()));
        }
        if let Some(search) = self.effective_search() {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub movies: Vec<CatalogItem>,
    #[serde(rename = "totalNumMovies", alias = "TotalNumMovies", default)]
    pub total_num_movies: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_repeat_categories_and_skip_empty() {
        let query = CatalogQuery::new(7, 2)
            .with_categories([Category::Action, Category::TvAction])
            .with_search("   ");

        let pairs = query.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("pageSize", "7".to_string()),
                ("pageNum", "2".to_string()),
                ("categories", "action".to_string()),
                ("categories", "tv_action".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_trim_search_and_send_sort() {
        let query = CatalogQuery::new(20, 1)
            .with_sort(Some(SortKey::TitleDesc))
            .with_search("  matrix ");

        let pairs = query.query_pairs();
        assert!(pairs.contains(&("sortOrder", "desc".to_string())));
        assert!(pairs.contains(&("search", "matrix".to_string())));
    }

    #[test]
    fn test_default_sort_is_not_sent() {
        let pairs = CatalogQuery::new(10, 1)
            .with_sort(Some(SortKey::Default))
            .query_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "sortOrder"));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_rating_sort_orders() {
        assert_eq!(SortKey::from_str("averagerating_desc"), Some(SortKey::AverageRatingDesc));
        assert_eq!(SortKey::from_str("AverageRating_Asc"), Some(SortKey::AverageRatingAsc));
        assert_eq!(SortKey::from_str("numratings_asc"), Some(SortKey::NumRatingsAsc));
        assert_eq!(SortKey::from_str("num_ratings_desc"), Some(SortKey::NumRatingsDesc));

        let pairs = CatalogQuery::new(10, 1)
            .with_sort(Some(SortKey::NumRatingsDesc))
            .query_pairs();
        assert!(pairs.contains(&("sortOrder", "numratings_desc".to_string())));
    }

    #[test]
    fn test_page_keeps_filters() {
        let query = CatalogQuery::new(7, 1).with_sort(Some(SortKey::Popularity));
        let next = query.page(3);
        assert_eq!(next.page_num, 3);
        assert_eq!(next.sort, Some(SortKey::Popularity));
    }

    #[test]
    fn test_decode_page() {
        let page: CatalogPage =
            serde_json::from_str(r#"{"movies":[],"totalNumMovies":8508}"#).unwrap();
        assert_eq!(page.total_num_movies, 8508);
        assert!(page.movies.is_empty());
    }
}
