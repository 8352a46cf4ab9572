use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::category::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleKind {
    #[serde(rename = "Movie", alias = "movie")]
    Movie,
    #[serde(rename = "TV Show", alias = "Show", alias = "tv show", alias = "show")]
    Show,
}

impl TitleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleKind::Movie => "Movie",
            TitleKind::Show => "TV Show",
        }
    }
}

/// One title (movie or show) as served by the movies backend.
///
/// The backend sends each category as its own `0`/`1` member; these are
/// folded into `categories` on decode and expanded again on encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTitle", into = "RawTitle")]
pub struct CatalogItem {
    pub show_id: String,
    pub kind: TitleKind,
    pub title: String,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub release_year: i32,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub description: String,
    pub categories: BTreeSet<Category>,
    pub average_rating: Option<f64>,
    pub num_ratings: u32,
}

impl CatalogItem {
    pub fn new(show_id: impl Into<String>, kind: TitleKind, title: impl Into<String>) -> Self {
        Self {
            show_id: show_id.into(),
            kind,
            title: title.into(),
            director: None,
            cast: None,
            country: None,
            release_year: 0,
            rating: None,
            duration: None,
            description: String::new(),
            categories: BTreeSet::new(),
            average_rating: None,
            num_ratings: 0,
        }
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Fold one accepted user rating into the displayed average and count.
    pub fn record_rating(&mut self, rating: u8) {
        let count = f64::from(self.num_ratings);
        let average = self.average_rating.unwrap_or(0.0);
        self.num_ratings += 1;
        self.average_rating = Some((average * count + f64::from(rating)) / f64::from(self.num_ratings));
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTitle {
    show_id: String,
    #[serde(rename = "type")]
    kind: TitleKind,
    title: String,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    cast: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    release_year: i32,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(rename = "averageRating", default, skip_serializing_if = "Option::is_none")]
    average_rating: Option<f64>,
    #[serde(rename = "numRatings", default)]
    num_ratings: u32,
    #[serde(flatten)]
    flags: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawTitle> for CatalogItem {
    type Error = String;

    fn try_from(raw: RawTitle) -> Result<Self, Self::Error> {
        let mut categories = BTreeSet::new();
        for (name, value) in &raw.flags {
            // Unknown members are ignored so newer backends don't break decoding.
            let Some(category) = Category::from_str(name) else {
                continue;
            };
            let set = match value {
                serde_json::Value::Bool(b) => *b,
                serde_json::Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
                serde_json::Value::Null => false,
                other => return Err(format!("invalid value for category {}: {}", name, other)),
            };
            if set {
                categories.insert(category);
            }
        }

        Ok(CatalogItem {
            show_id: raw.show_id,
            kind: raw.kind,
            title: raw.title,
            director: raw.director,
            cast: raw.cast,
            country: raw.country,
            release_year: raw.release_year,
            rating: raw.rating,
            duration: raw.duration,
            description: raw.description,
            categories,
            average_rating: raw.average_rating,
            num_ratings: raw.num_ratings,
        })
    }
}

impl From<CatalogItem> for RawTitle {
    fn from(item: CatalogItem) -> Self {
        let flags = Category::ALL
            .iter()
            .map(|c| {
                let value = u8::from(item.categories.contains(c));
                (c.as_str().to_string(), serde_json::Value::from(value))
            })
            .collect();

        RawTitle {
            show_id: item.show_id,
            kind: item.kind,
            title: item.title,
            director: item.director,
            cast: item.cast,
            country: item.country,
            release_year: item.release_year,
            rating: item.rating,
            duration: item.duration,
            description: item.description,
            average_rating: item.average_rating,
            num_ratings: item.num_ratings,
            flags,
        }
    }
}
