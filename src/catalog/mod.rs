pub mod api;
pub mod category;
pub mod error;
pub mod http;
pub mod item;
pub mod query;

pub use api::{validate_rating, AdminApi, CatalogApi, MAX_RATING, MIN_RATING};
pub use category::{Category, CategoryGroup};
pub use error::{CatalogError, CatalogResult};
pub use http::HttpCatalogClient;
pub use item::{CatalogItem, TitleKind};
pub use query::{CatalogPage, CatalogQuery, SortKey};
