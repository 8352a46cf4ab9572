//! Admin console: a paged, filterable title list with add/edit/delete.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{
    AdminApi, CatalogApi, CatalogItem, CatalogQuery, CatalogResult, Category, CategoryGroup, SortKey,
};

/// Pages shown either side of the current one in the page picker.
const WINDOW: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLink {
    Page(u32),
    Gap,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminState {
    pub items: Vec<CatalogItem>,
    pub page_num: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub sort: Option<SortKey>,
    pub selected: BTreeSet<Category>,
    pub search: String,
    pub error: Option<String>,
}

/// Sort, filters, search and page applied together with one fetch.
#[derive(Debug, Clone, Default)]
pub struct AdminFilter {
    pub sort: Option<SortKey>,
    pub groups: Vec<CategoryGroup>,
    pub categories: Vec<Category>,
    pub search: String,
    pub page_num: u32,
}

pub struct AdminConsole {
    catalog: Arc<dyn CatalogApi>,
    admin: Arc<dyn AdminApi>,
    state: AdminState,
}

impl AdminConsole {
    pub fn new(catalog: Arc<dyn CatalogApi>, admin: Arc<dyn AdminApi>, page_size: u32) -> Self {
        Self {
            catalog,
            admin,
            state: AdminState {
                items: Vec::new(),
                page_num: 1,
                page_size: page_size.max(1),
                total: 0,
                total_pages: 0,
                sort: None,
                selected: BTreeSet::new(),
                search: String::new(),
                error: None,
            },
        }
    }

    pub fn state(&self) -> &AdminState {
        &self.state
    }

    fn query(&self) -> CatalogQuery {
        CatalogQuery::new(self.state.page_size, self.state.page_num)
            .with_categories(self.state.selected.iter().copied())
            .with_sort(self.state.sort)
            .with_search(self.state.search.clone())
    }

    /// Re-fetch the current page with the current filters.
    pub async fn refresh(&mut self) -> CatalogResult<()> {
        match self.catalog.query_catalog(&self.query()).await {
            Ok(page) => {
                self.state.total = page.total_num_movies;
                self.state.total_pages = total_pages(page.total_num_movies, self.state.page_size);
                self.state.items = page.movies;
                self.state.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(page = self.state.page_num, error = %e, "admin list failed");
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Replace sort, category selection, search and page, then fetch once.
    pub async fn apply(&mut self, filter: AdminFilter) -> CatalogResult<()> {
        let mut selected: BTreeSet<Category> = filter.categories.into_iter().collect();
        for group in &filter.groups {
            selected.extend(group.categories().iter().copied());
        }
        self.state.sort = filter.sort;
        self.state.selected = selected;
        self.state.search = filter.search.trim().to_string();
        self.state.page_num = filter.page_num.max(1);
        self.refresh().await
    }

    pub async fn set_page(&mut self, page_num: u32) -> CatalogResult<()> {
        self.state.page_num = page_num.max(1);
        self.refresh().await
    }

    pub async fn set_page_size(&mut self, page_size: u32) -> CatalogResult<()> {
        self.state.page_size = page_size.max(1);
        self.state.page_num = 1;
        self.refresh().await
    }

    pub async fn set_sort(&mut self, sort: Option<SortKey>) -> CatalogResult<()> {
        self.state.sort = sort;
        self.state.page_num = 1;
        self.refresh().await
    }

    /// Select every category of the group, or clear them all if they already are.
    pub async fn toggle_group(&mut self, group: CategoryGroup) -> CatalogResult<()> {
        let members = group.categories();
        if members.iter().all(|c| self.state.selected.contains(c)) {
            for c in members {
                self.state.selected.remove(c);
            }
        } else {
            self.state.selected.extend(members.iter().copied());
        }
        self.state.page_num = 1;
        self.refresh().await
    }

    pub async fn toggle_category(&mut self, category: Category) -> CatalogResult<()> {
        if !self.state.selected.remove(&category) {
            self.state.selected.insert(category);
        }
        self.state.page_num = 1;
        self.refresh().await
    }

    pub async fn submit_search(&mut self, text: &str) -> CatalogResult<()> {
        self.state.search = text.trim().to_string();
        self.state.page_num = 1;
        self.refresh().await
    }

    pub fn page_window(&self) -> Vec<PageLink> {
        page_window(self.state.page_num, self.state.total_pages)
    }

    pub async fn add(&mut self, item: &CatalogItem) -> CatalogResult<CatalogItem> {
        let created = self.admin.add_title(item).await?;
        info!(id = %created.show_id, title = %created.title, "title added");
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update(&mut self, id: &str, item: &CatalogItem) -> CatalogResult<CatalogItem> {
        let updated = self.admin.update_title(id, item).await?;
        info!(id, "title updated");
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> CatalogResult<()> {
        self.admin.delete_title(id).await?;
        info!(id, "title deleted");
        // Deleting the only row of the last page would leave an empty page.
        if self.state.items.len() == 1 && self.state.page_num > 1 {
            self.state.page_num -= 1;
        }
        self.refresh().await
    }
}

pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    total.div_ceil(page_size) as u32
}

/// First page, last page and `WINDOW` pages around `current`, with a gap
/// marker wherever pages are left out. A gap of exactly one page shows that
/// page instead.
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageLink> {
    if total_pages == 0 {
        return Vec::new();
    }

    let mut pages = vec![1];
    let low = current.saturating_sub(WINDOW).max(2);
    let high = current.saturating_add(WINDOW).min(total_pages.saturating_sub(1));
    pages.extend(low..=high);
    if total_pages > 1 {
        pages.push(total_pages);
    }

    let mut links = Vec::with_capacity(pages.len() + 2);
    let mut last: Option<u32> = None;
    for page in pages {
        if let Some(prev) = last {
            if page - prev == 2 {
                links.push(PageLink::Page(prev + 1));
            } else if page - prev > 2 {
                links.push(PageLink::Gap);
            }
        }
        links.push(PageLink::Page(page));
        last = Some(page);
    }
    links
}
