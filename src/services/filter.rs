use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::{Genre, Platform, Title, TitleType},
};

/// Which title types a query keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Movie,
    Series,
}

impl TypeFilter {
    fn accepts(&self, title_type: TitleType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Movie => title_type == TitleType::Movie,
            TypeFilter::Series => title_type == TitleType::Series,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(TypeFilter::All),
            other => other.parse::<TitleType>().map(|title_type| match title_type {
                TitleType::Movie => TypeFilter::Movie,
                TitleType::Series => TypeFilter::Series,
            }),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Title, A-Z
    Title,
    /// Release year, newest first
    Year,
    /// Rating, highest first
    #[default]
    Rating,
    /// Price, cheapest first
    Price,
}

impl SortKey {
    fn compare(&self, a: &Title, b: &Title) -> Ordering {
        match self {
            SortKey::Title => compare_titles(&a.title, &b.title),
            SortKey::Year => b.release_year.cmp(&a.release_year),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
            SortKey::Price => a.price.total_cmp(&b.price),
        }
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "year" => Ok(SortKey::Year),
            "" | "rating" => Ok(SortKey::Rating),
            "price" => Ok(SortKey::Price),
            other => Err(AppError::Validation(format!("Unknown sort key: {}", other))),
        }
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Browse parameters for the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    /// Case-insensitive text matched against title, description, cast and director
    pub search: String,
    pub genre: Option<Genre>,
    pub platform: Option<Platform>,
    pub title_type: TypeFilter,
    pub sort: SortKey,
}

impl CatalogQuery {
    /// True when any filter narrows the result (sorting alone does not count)
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty()
            || self.genre.is_some()
            || self.platform.is_some()
            || self.title_type != TypeFilter::All
    }

    fn matches(&self, title: &Title, needle: &str) -> bool {
        matches_search(title, needle)
            && self.genre.map_or(true, |genre| title.genre == genre)
            && self
                .platform
                .map_or(true, |platform| title.is_available_on(platform))
            && self.title_type.accepts(title.title_type())
    }
}

/// `needle` must already be lower-cased
fn matches_search(title: &Title, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    title.title.to_lowercase().contains(needle)
        || title.description.to_lowercase().contains(needle)
        || title
            .cast
            .iter()
            .any(|actor| actor.to_lowercase().contains(needle))
        || title.director.to_lowercase().contains(needle)
}

/// Filters `titles` by `query` and orders the matches.
///
/// The sort is stable: titles that compare equal keep their input order.
pub fn filter_and_sort<'a>(titles: &'a [Title], query: &CatalogQuery) -> Vec<&'a Title> {
    let needle = query.search.to_lowercase();

    let mut matches: Vec<&Title> = titles
        .iter()
        .filter(|title| query.matches(title, &needle))
        .collect();

    matches.sort_by(|a, b| query.sort.compare(a, b));

    tracing::debug!(
        search = %query.search,
        genre = ?query.genre,
        platform = ?query.platform,
        title_type = ?query.title_type,
        sort = ?query.sort,
        matched = matches.len(),
        "Filtered catalog"
    );

    matches
}
