use serde::Serialize;

use crate::models::{Format, Genre, Title, User};

use super::LibraryStore;

/// Number of purchases listed under "recent purchases"
pub const RECENT_PURCHASES: usize = 3;

/// Account overview of the signed-in user
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub user: User,
    pub watchlist_count: usize,
    pub purchased_count: usize,
    pub total_spent: f64,
    /// The latest purchases, oldest first
    pub recent_purchases: Vec<Title>,
    /// Most frequent genre on the watchlist
    pub top_genre: Option<GenreCount>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GenreCount {
    pub genre: Genre,
    pub count: usize,
}

impl DashboardSummary {
    pub fn build(user: &User, library: &LibraryStore) -> Self {
        let purchased = library.purchased();
        let recent_start = purchased.len().saturating_sub(RECENT_PURCHASES);

        Self {
            user: user.clone(),
            watchlist_count: library.watchlist().len(),
            purchased_count: purchased.len(),
            total_spent: library.total_spent(),
            recent_purchases: purchased[recent_start..].to_vec(),
            top_genre: top_genre(library.watchlist()),
        }
    }
}

/// Genre counts in first-seen order
fn genre_counts(titles: &[Title]) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = Vec::new();
    for title in titles {
        match counts.iter_mut().find(|c| c.genre == title.genre) {
            Some(entry) => entry.count += 1,
            None => counts.push(GenreCount {
                genre: title.genre,
                count: 1,
            }),
        }
    }
    counts
}

/// Most frequent genre. Ties go to the genre seen first.
pub fn top_genre(titles: &[Title]) -> Option<GenreCount> {
    genre_counts(titles)
        .into_iter()
        .fold(None, |best: Option<GenreCount>, candidate| match best {
            Some(best) if best.count >= candidate.count => Some(best),
            _ => Some(candidate),
        })
}

/// Distinct genres of `titles` in first-seen order
pub fn watchlist_genres(titles: &[Title]) -> Vec<Genre> {
    genre_counts(titles).into_iter().map(|c| c.genre).collect()
}

/// Watchlist page filter: title-only search plus an optional genre
pub fn filter_watchlist<'a>(
    titles: &'a [Title],
    search: &str,
    genre: Option<Genre>,
) -> Vec<&'a Title> {
    let needle = search.to_lowercase();
    titles
        .iter()
        .filter(|title| title.title.to_lowercase().contains(&needle))
        .filter(|title| genre.map_or(true, |genre| title.genre == genre))
        .collect()
}

/// `148` becomes `"2h 28m"`, `45` becomes `"45m"`
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Running time for movies, season and episode counts for series
pub fn runtime_label(title: &Title) -> String {
    match title.format {
        Format::Movie { duration } => format_duration(duration),
        Format::Series { seasons, episodes } => {
            format!("{} seasons, {} episodes", seasons, episodes)
        }
    }
}
