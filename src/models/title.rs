use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Genre of a catalog title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    Horror,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Thriller,
}

impl Genre {
    pub const ALL: [Genre; 12] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown genre: {}", s)))
    }
}

/// Streaming platform a title can be watched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Netflix,
    Prime,
    #[serde(rename = "Disney+")]
    DisneyPlus,
    Hulu,
    #[serde(rename = "HBO Max")]
    HboMax,
    #[serde(rename = "Apple TV+")]
    AppleTvPlus,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Netflix,
        Platform::Prime,
        Platform::DisneyPlus,
        Platform::Hulu,
        Platform::HboMax,
        Platform::AppleTvPlus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Netflix => "Netflix",
            Platform::Prime => "Prime",
            Platform::DisneyPlus => "Disney+",
            Platform::Hulu => "Hulu",
            Platform::HboMax => "HBO Max",
            Platform::AppleTvPlus => "Apple TV+",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown platform: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TitleType {
    Movie,
    Series,
}

impl FromStr for TitleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" => Ok(TitleType::Movie),
            "series" => Ok(TitleType::Series),
            other => Err(AppError::Validation(format!("Unknown title type: {}", other))),
        }
    }
}

/// Type-specific runtime information, tagged by the `type` field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Format {
    Movie {
        /// Running time in minutes
        duration: u32,
    },
    Series {
        seasons: u32,
        episodes: u32,
    },
}

/// A movie or series in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub id: String,
    pub title: String,
    pub genre: Genre,
    pub release_year: i32,
    /// Average rating on a 0-10 scale
    pub rating: f64,
    /// Purchase price in dollars
    pub price: f64,
    #[serde(flatten)]
    pub format: Format,
    pub cast: Vec<String>,
    pub director: String,
    pub description: String,
    pub poster: String,
    pub trailer: String,
    pub available_on: Vec<Platform>,
}

impl Title {
    pub fn title_type(&self) -> TitleType {
        match self.format {
            Format::Movie { .. } => TitleType::Movie,
            Format::Series { .. } => TitleType::Series,
        }
    }

    pub fn is_available_on(&self, platform: Platform) -> bool {
        self.available_on.contains(&platform)
    }
}
