pub mod admin;
pub mod browse;
pub mod catalog;
pub mod config;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::admin::{AdminConsole, AdminFilter};
use crate::browse::{BrowseView, SectionKind};
use crate::catalog::{
    validate_rating, AdminApi, CatalogApi, CatalogError, CatalogItem, Category, CategoryGroup,
    HttpCatalogClient, SortKey,
};
use crate::session::SessionContext;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("Invalid argument: {0}")]
    Usage(String),
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Command {
    /// Load the browsing view and print it.
    Browse {
        /// Press "show more" on a section after mounting; may be repeated.
        #[arg(long = "more", value_name = "SECTION")]
        more: Vec<String>,
    },
    /// Run a catalog search as if typed into the search box.
    Search { text: String },
    /// Show one title and titles similar to it.
    Show {
        id: String,
        #[arg(long, default_value_t = 5)]
        similar: u32,
    },
    /// Rate a title from 1 to 5 stars as the configured user.
    Rate { id: String, rating: u8 },
    /// List the category names the backend knows, with labels and filter groups.
    Categories,
    /// List titles the way the admin console does.
    AdminList {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Category group to filter on, e.g. comedy or kids_family; may be repeated.
        #[arg(long = "group")]
        groups: Vec<String>,
    },
    /// Delete a title by id.
    AdminDelete { id: String },
}

#[derive(Serialize)]
struct TitleDetails {
    title: CatalogItem,
    similar: Vec<String>,
}

#[derive(Serialize)]
struct CategoryEntry {
    name: String,
    label: String,
}

#[derive(Serialize)]
struct GroupEntry {
    name: CategoryGroup,
    label: &'static str,
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct CategoryListing {
    categories: Vec<CategoryEntry>,
    groups: Vec<GroupEntry>,
}

#[derive(Serialize)]
struct AdminListing<'a> {
    #[serde(flatten)]
    state: &'a admin::AdminState,
    pages: Vec<admin::PageLink>,
}

pub async fn run(config_path: &str, debug_logs: bool, command: Command) -> Result<(), AppError> {
    let mut config = config::Config::from_file(config_path)?;
    config.debug_logs = debug_logs;

    if config.debug_logs {
        info!("Debug logging enabled");
    }
    info!("Using config file: {}", config_path);
    info!("Catalog API: {}", config.api.base_url);

    let client = Arc::new(HttpCatalogClient::new(&config.api)?);
    let catalog: Arc<dyn CatalogApi> = client.clone();
    let admin_api: Arc<dyn AdminApi> = client;

    match command {
        Command::Browse { more } => {
            let kinds = more
                .iter()
                .map(|s| {
                    SectionKind::from_str(s).ok_or_else(|| AppError::Usage(format!("unknown section {}", s)))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let session = SessionContext::from_config(&config.session);
            let view = BrowseView::new(catalog, &config.browse, session);
            for (kind, e) in view.mount().await {
                eprintln!("{}: {}", kind.label(), e.user_message());
            }
            for kind in kinds {
                if let Err(e) = view.load_more(kind).await {
                    eprintln!("{}: {}", kind.label(), e.user_message());
                }
            }
            print_json(&view.snapshot().await)
        }
        Command::Search { text } => {
            let view = BrowseView::new(catalog, &config.browse, SessionContext::anonymous());
            view.search(&text).await?;
            print_json(&view.snapshot().await.search)
        }
        Command::Show { id, similar } => {
            let title = catalog.resolve_by_id(&id).await?;
            info!(id = %id, kind = title.kind.as_str(), "resolved title");
            let similar = match catalog.fetch_similar_titles(&id, similar).await {
                Ok(titles) => titles,
                Err(e) => {
                    warn!(id = %id, error = %e, "similar titles unavailable");
                    Vec::new()
                }
            };
            print_json(&TitleDetails { title, similar })
        }
        Command::Rate { id, rating } => {
            let session = SessionContext::from_config(&config.session);
            let title = rate_title(catalog.as_ref(), &session, &id, rating).await?;
            print_json(&title)
        }
        Command::Categories => {
            let names = admin_api.list_categories().await?;
            print_json(&category_listing(names))
        }
        Command::AdminList {
            page,
            page_size,
            sort,
            search,
            groups,
        } => {
            let sort = match sort {
                Some(sort) => Some(
                    SortKey::from_str(&sort)
                        .ok_or_else(|| AppError::Usage(format!("unknown sort order {}", sort)))?,
                ),
                None => None,
            };
            let groups = groups
                .iter()
                .map(|name| parse_group(name))
                .collect::<Result<Vec<_>, _>>()?;

            let mut console = AdminConsole::new(
                catalog,
                admin_api,
                page_size.unwrap_or(config.admin.page_size),
            );
            console
                .apply(AdminFilter {
                    sort,
                    groups,
                    search: search.unwrap_or_default(),
                    page_num: page,
                    ..Default::default()
                })
                .await?;
            print_json(&AdminListing {
                state: console.state(),
                pages: console.page_window(),
            })
        }
        Command::AdminDelete { id } => {
            admin_api.delete_title(&id).await?;
            info!(id = %id, "deleted");
            Ok(())
        }
    }
}

/// Submit a star rating as the session's user and return the title with the
/// rating folded into its displayed average. Signed-out sessions rate as
/// "anonymous".
pub async fn rate_title(
    catalog: &dyn CatalogApi,
    session: &SessionContext,
    id: &str,
    rating: u8,
) -> Result<CatalogItem, CatalogError> {
    validate_rating(rating)?;
    let mut title = catalog.resolve_by_id(id).await?;
    let user_id = session.user_id.as_deref().unwrap_or("anonymous");
    catalog.submit_rating(id, user_id, rating).await?;
    title.record_rating(rating);
    info!(id, user_id, rating, "rating submitted");
    Ok(title)
}

/// Pair backend category names with their labels; names the client does not
/// know keep the raw name as label.
fn category_listing(names: Vec<String>) -> CategoryListing {
    let categories = names
        .into_iter()
        .map(|name| {
            let label = match Category::from_str(&name) {
                Some(category) => category.label().to_string(),
                None => name.clone(),
            };
            CategoryEntry { name, label }
        })
        .collect();
    let groups = CategoryGroup::ALL
        .iter()
        .map(|group| GroupEntry {
            name: *group,
            label: group.label(),
            categories: group.categories().to_vec(),
        })
        .collect();
    CategoryListing { categories, groups }
}

fn parse_group(name: &str) -> Result<CategoryGroup, AppError> {
    CategoryGroup::from_str(name).ok_or_else(|| AppError::Usage(format!("unknown category group {}", name)))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
