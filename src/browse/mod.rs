//! State and loaders behind the movie browsing view.
//!
//! Every section is owned by exactly one loader. The view layer reads
//! snapshots and calls the trigger methods; it never mutates the lists.

pub mod recommendations;
pub mod search;
pub mod section;
pub mod view;

use serde::Serialize;

pub use recommendations::{RecommendationPaginator, RecommendationState};
pub use search::{SearchCoordinator, SearchOutcome, SearchState};
pub use section::{SectionLoader, SectionState};
pub use view::{BrowseSnapshot, BrowseView, SectionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    LoadingMore,
}

/// Result of a load trigger that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    Applied { added: usize },
    /// Another load for the same section was already running.
    Ignored,
    /// A newer load started while this one was in flight; its result was dropped.
    Superseded,
    /// Nothing left to load.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Recommendations,
    Popular,
    NewReleases,
    AllMovies,
    AllShows,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Recommendations,
        SectionKind::Popular,
        SectionKind::NewReleases,
        SectionKind::AllMovies,
        SectionKind::AllShows,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Recommendations => "recommendations",
            SectionKind::Popular => "popular",
            SectionKind::NewReleases => "new_releases",
            SectionKind::AllMovies => "all_movies",
            SectionKind::AllShows => "all_shows",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "recommendations" | "recommended" => Some(SectionKind::Recommendations),
            "popular" => Some(SectionKind::Popular),
            "new_releases" | "newreleases" | "new" => Some(SectionKind::NewReleases),
            "all_movies" | "allmovies" | "movies" => Some(SectionKind::AllMovies),
            "all_shows" | "alltvshows" | "all_tv_shows" | "shows" | "tv" => Some(SectionKind::AllShows),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Recommendations => "Top Recommendations",
            SectionKind::Popular => "Most Popular",
            SectionKind::NewReleases => "New Releases",
            SectionKind::AllMovies => "All Movies",
            SectionKind::AllShows => "All TV Shows",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
