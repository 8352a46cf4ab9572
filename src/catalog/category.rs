use serde::{Deserialize, Serialize};

/// One of the fixed category columns the movies backend stores per title.
///
/// The wire name is the backend column name; it is used both for the
/// `categories=` query parameter and as the flag member name in title JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Action,
    Adventure,
    AnimeSeriesInternationalTvShows,
    BritishTvShowsDocuseriesInternationalTvShows,
    Children,
    Comedies,
    ComediesDramasInternationalMovies,
    ComediesInternationalMovies,
    ComediesRomanticMovies,
    CrimeTvShowsDocuseries,
    Documentaries,
    DocumentariesInternationalMovies,
    Docuseries,
    Dramas,
    DramasInternationalMovies,
    DramasRomanticMovies,
    FamilyMovies,
    Fantasy,
    HorrorMovies,
    InternationalMoviesThrillers,
    InternationalTvShowsRomanticTvShowsTvDramas,
    KidsTv,
    LanguageTvShows,
    Musicals,
    NatureTv,
    RealityTv,
    Spirituality,
    TvAction,
    TvComedies,
    TvDramas,
    TalkShowsTvComedies,
    Thrillers,
}

impl Category {
    pub const ALL: [Category; 32] = [
        Category::Action,
        Category::Adventure,
        Category::AnimeSeriesInternationalTvShows,
        Category::BritishTvShowsDocuseriesInternationalTvShows,
        Category::Children,
        Category::Comedies,
        Category::ComediesDramasInternationalMovies,
        Category::ComediesInternationalMovies,
        Category::ComediesRomanticMovies,
        Category::CrimeTvShowsDocuseries,
        Category::Documentaries,
        Category::DocumentariesInternationalMovies,
        Category::Docuseries,
        Category::Dramas,
        Category::DramasInternationalMovies,
        Category::DramasRomanticMovies,
        Category::FamilyMovies,
        Category::Fantasy,
        Category::HorrorMovies,
        Category::InternationalMoviesThrillers,
        Category::InternationalTvShowsRomanticTvShowsTvDramas,
        Category::KidsTv,
        Category::LanguageTvShows,
        Category::Musicals,
        Category::NatureTv,
        Category::RealityTv,
        Category::Spirituality,
        Category::TvAction,
        Category::TvComedies,
        Category::TvDramas,
        Category::TalkShowsTvComedies,
        Category::Thrillers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Action => "action",
            Category::Adventure => "adventure",
            Category::AnimeSeriesInternationalTvShows => "anime_series_international_tv_shows",
            Category::BritishTvShowsDocuseriesInternationalTvShows => {
                "british_tv_shows_docuseries_international_tv_shows"
            }
            Category::Children => "children",
            Category::Comedies => "comedies",
            Category::ComediesDramasInternationalMovies => "comedies_dramas_international_movies",
            Category::ComediesInternationalMovies => "comedies_international_movies",
            Category::ComediesRomanticMovies => "comedies_romantic_movies",
            Category::CrimeTvShowsDocuseries => "crime_tv_shows_docuseries",
            Category::Documentaries => "documentaries",
            Category::DocumentariesInternationalMovies => "documentaries_international_movies",
            Category::Docuseries => "docuseries",
            Category::Dramas => "dramas",
            Category::DramasInternationalMovies => "dramas_international_movies",
            Category::DramasRomanticMovies => "dramas_romantic_movies",
            Category::FamilyMovies => "family_movies",
            Category::Fantasy => "fantasy",
            Category::HorrorMovies => "horror_movies",
            Category::InternationalMoviesThrillers => "international_movies_thrillers",
            Category::InternationalTvShowsRomanticTvShowsTvDramas => {
                "international_tv_shows_romantic_tv_shows_tv_dramas"
            }
            Category::KidsTv => "kids_tv",
            Category::LanguageTvShows => "language_tv_shows",
            Category::Musicals => "musicals",
            Category::NatureTv => "nature_tv",
            Category::RealityTv => "reality_tv",
            Category::Spirituality => "spirituality",
            Category::TvAction => "tv_action",
            Category::TvComedies => "tv_comedies",
            Category::TvDramas => "tv_dramas",
            Category::TalkShowsTvComedies => "talk_shows_tv_comedies",
            Category::Thrillers => "thrillers",
        }
    }

    /// Backend column names are matched case-insensitively, like the server does.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Action => "Action",
            Category::Adventure => "Adventure",
            Category::AnimeSeriesInternationalTvShows => "Anime Series",
            Category::BritishTvShowsDocuseriesInternationalTvShows => "British TV Docuseries",
            Category::Children => "Children",
            Category::Comedies => "Comedies",
            Category::ComediesDramasInternationalMovies => "International Dramedies",
            Category::ComediesInternationalMovies => "International Comedies",
            Category::ComediesRomanticMovies => "Romantic Comedies",
            Category::CrimeTvShowsDocuseries => "Crime Docuseries",
            Category::Documentaries => "Documentaries",
            Category::DocumentariesInternationalMovies => "International Documentaries",
            Category::Docuseries => "Docuseries",
            Category::Dramas => "Dramas",
            Category::DramasInternationalMovies => "International Dramas",
            Category::DramasRomanticMovies => "Romantic Dramas",
            Category::FamilyMovies => "Family Movies",
            Category::Fantasy => "Fantasy",
            Category::HorrorMovies => "Horror",
            Category::InternationalMoviesThrillers => "International Thrillers",
            Category::InternationalTvShowsRomanticTvShowsTvDramas => "Romantic TV Dramas",
            Category::KidsTv => "Kids' TV",
            Category::LanguageTvShows => "Foreign Language TV",
            Category::Musicals => "Musicals",
            Category::NatureTv => "Nature TV",
            Category::RealityTv => "Reality TV",
            Category::Spirituality => "Spirituality",
            Category::TvAction => "TV Action",
            Category::TvComedies => "TV Comedies",
            Category::TvDramas => "TV Dramas",
            Category::TalkShowsTvComedies => "Talk Shows",
            Category::Thrillers => "Thrillers",
        }
    }

    /// True for categories that only ever tag TV shows.
    pub fn is_tv(&self) -> bool {
        matches!(
            self,
            Category::AnimeSeriesInternationalTvShows
                | Category::BritishTvShowsDocuseriesInternationalTvShows
                | Category::CrimeTvShowsDocuseries
                | Category::Docuseries
                | Category::InternationalTvShowsRomanticTvShowsTvDramas
                | Category::KidsTv
                | Category::LanguageTvShows
                | Category::NatureTv
                | Category::RealityTv
                | Category::TvAction
                | Category::TvComedies
                | Category::TvDramas
                | Category::TalkShowsTvComedies
        )
    }

    pub fn movie_categories() -> Vec<Category> {
        Self::ALL.iter().copied().filter(|c| !c.is_tv()).collect()
    }

    pub fn tv_categories() -> Vec<Category> {
        Self::ALL.iter().copied().filter(|c| c.is_tv()).collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse genre groups offered as single checkboxes in the filter UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    ActionAdventure,
    Comedy,
    Drama,
    Documentaries,
    KidsFamily,
    ThrillerHorror,
    International,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 7] = [
        CategoryGroup::ActionAdventure,
        CategoryGroup::Comedy,
        CategoryGroup::Drama,
        CategoryGroup::Documentaries,
        CategoryGroup::KidsFamily,
        CategoryGroup::ThrillerHorror,
        CategoryGroup::International,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "action_adventure" | "action" => Some(CategoryGroup::ActionAdventure),
            "comedy" => Some(CategoryGroup::Comedy),
            "drama" => Some(CategoryGroup::Drama),
            "documentaries" | "documentary" => Some(CategoryGroup::Documentaries),
            "kids_family" | "family" => Some(CategoryGroup::KidsFamily),
            "thriller_horror" | "thriller" | "horror" => Some(CategoryGroup::ThrillerHorror),
            "international" => Some(CategoryGroup::International),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryGroup::ActionAdventure => "Action & Adventure",
            CategoryGroup::Comedy => "Comedy",
            CategoryGroup::Drama => "Drama",
            CategoryGroup::Documentaries => "Documentaries",
            CategoryGroup::KidsFamily => "Kids & Family",
            CategoryGroup::ThrillerHorror => "Thriller & Horror",
            CategoryGroup::International => "International",
        }
    }

    pub fn categories(&self) -> &'static [Category] {
        use Category::*;
        match self {
            CategoryGroup::ActionAdventure => &[Action, Adventure, TvAction],
            CategoryGroup::Comedy => &[
                Comedies,
                ComediesRomanticMovies,
                TvComedies,
                TalkShowsTvComedies,
                ComediesInternationalMovies,
                ComediesDramasInternationalMovies,
            ],
            CategoryGroup::Drama => &[
                Dramas,
                DramasRomanticMovies,
                TvDramas,
                DramasInternationalMovies,
                ComediesDramasInternationalMovies,
                InternationalTvShowsRomanticTvShowsTvDramas,
            ],
            CategoryGroup::Documentaries => &[
                Documentaries,
                DocumentariesInternationalMovies,
                Docuseries,
                CrimeTvShowsDocuseries,
                BritishTvShowsDocuseriesInternationalTvShows,
            ],
            CategoryGroup::KidsFamily => &[Children, FamilyMovies, KidsTv],
            CategoryGroup::ThrillerHorror => &[Thrillers, HorrorMovies, InternationalMoviesThrillers],
            CategoryGroup::International => &[
                InternationalMoviesThrillers,
                ComediesInternationalMovies,
                DramasInternationalMovies,
                DocumentariesInternationalMovies,
                AnimeSeriesInternationalTvShows,
                BritishTvShowsDocuseriesInternationalTvShows,
                InternationalTvShowsRomanticTvShowsTvDramas,
                LanguageTvShows,
            ],
        }
    }
}
