use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{Format, Genre, Platform, Title},
};

/// The fixed title list. Never modified after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    titles: Vec<Title>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate title ids
    pub fn new(titles: Vec<Title>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for title in &titles {
            if !seen.insert(title.id.as_str()) {
                return Err(AppError::Internal(format!(
                    "Duplicate title id in catalog: {}",
                    title.id
                )));
            }
        }
        Ok(Self { titles })
    }

    /// The catalog shipped with the application
    pub fn builtin() -> AppResult<Self> {
        Self::new(builtin_titles())
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn get(&self, id: &str) -> Option<&Title> {
        self.titles.iter().find(|title| title.id == id)
    }

    /// Like [`Catalog::get`], but a missing title is an error
    pub fn require(&self, id: &str) -> AppResult<&Title> {
        self.get(id)
            .ok_or_else(|| AppError::NotFound(format!("Title {}", id)))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn movie(
    id: &str,
    name: &str,
    genre: Genre,
    year: i32,
    rating: f64,
    price: f64,
    duration: u32,
    cast: &[&str],
    director: &str,
    description: &str,
    available_on: &[Platform],
) -> Title {
    build(
        id,
        name,
        genre,
        year,
        rating,
        price,
        Format::Movie { duration },
        cast,
        director,
        description,
        available_on,
    )
}

#[allow(clippy::too_many_arguments)]
fn series(
    id: &str,
    name: &str,
    genre: Genre,
    year: i32,
    rating: f64,
    price: f64,
    (seasons, episodes): (u32, u32),
    cast: &[&str],
    director: &str,
    description: &str,
    available_on: &[Platform],
) -> Title {
    build(
        id,
        name,
        genre,
        year,
        rating,
        price,
        Format::Series { seasons, episodes },
        cast,
        director,
        description,
        available_on,
    )
}

#[allow(clippy::too_many_arguments)]
fn build(
    id: &str,
    name: &str,
    genre: Genre,
    release_year: i32,
    rating: f64,
    price: f64,
    format: Format,
    cast: &[&str],
    director: &str,
    description: &str,
    available_on: &[Platform],
) -> Title {
    Title {
        id: id.to_string(),
        title: name.to_string(),
        genre,
        release_year,
        rating,
        price,
        format,
        cast: cast.iter().map(|name| name.to_string()).collect(),
        director: director.to_string(),
        description: description.to_string(),
        poster: format!("https://images.cinehub.dev/posters/{}.jpg", id),
        trailer: format!("https://www.youtube.com/embed/cinehub-{}", id),
        available_on: available_on.to_vec(),
    }
}

fn builtin_titles() -> Vec<Title> {
    use Genre::*;
    use Platform::*;

    vec![
        movie(
            "1",
            "The Last Horizon",
            SciFi,
            2023,
            8.7,
            14.99,
            148,
            &["Emma Lane", "Marcus Cole", "Priya Shah"],
            "Daniel Rhodes",
            "A crew of explorers crosses a collapsing wormhole to find a new home for humanity.",
            &[Netflix, Prime],
        ),
        movie(
            "2",
            "Midnight in Lisbon",
            Romance,
            2021,
            7.4,
            9.99,
            112,
            &["Sofia Marques", "Julien Arnaud"],
            "Clara Ventura",
            "Two strangers miss the last tram and spend one night walking the hills of Lisbon.",
            &[Prime, Hulu],
        ),
        series(
            "3",
            "Shadow Protocol",
            Thriller,
            2022,
            8.9,
            29.99,
            (3, 24),
            &["Idris Kane", "Nora Feld", "Theo Marsh"],
            "Alicia Brandt",
            "A disgraced analyst uncovers a conspiracy inside the intelligence agency that trained her.",
            &[Netflix],
        ),
        movie(
            "4",
            "Paper Lanterns",
            Animation,
            2020,
            8.2,
            7.99,
            96,
            &["Mei Tanaka", "Oliver Grant"],
            "Hiro Nakamura",
            "A young girl follows a floating lantern into a world of forgotten spirits.",
            &[DisneyPlus],
        ),
        movie(
            "5",
            "Iron Verdict",
            Action,
            2024,
            7.1,
            19.99,
            131,
            &["Jake Monroe", "Lena Ortiz"],
            "Victor Hale",
            "A former marshal has one day to bring a cartel witness across the border alive.",
            &[Prime, AppleTvPlus],
        ),
        series(
            "6",
            "The Office Hours",
            Comedy,
            2019,
            8.0,
            24.99,
            (5, 60),
            &["Ben Carter", "Rosa Diaz-Moore", "Kumail Rao"],
            "Greta Lund",
            "The staff of a failing community college night school refuse to let it close.",
            &[Hulu, Netflix],
        ),
        movie(
            "7",
            "Blood Orchard",
            Horror,
            2022,
            6.8,
            5.99,
            98,
            &["Ava Mercer", "Silas Crowe"],
            "Ingrid Vos",
            "A family inherits an apple farm where nothing that is buried stays buried.",
            &[Hulu],
        ),
        series(
            "8",
            "Kingdom of Ash",
            Fantasy,
            2023,
            9.1,
            34.99,
            (2, 18),
            &["Rhys Alder", "Isolde Grey", "Tomas Reyes"],
            "Marguerite Hale",
            "Rival heirs fight for a throne while an ancient fire spreads beneath the realm.",
            &[HboMax],
        ),
        movie(
            "9",
            "Deep Blue Silence",
            Documentary,
            2021,
            8.4,
            4.99,
            89,
            &["David Attwell"],
            "Sarah Okafor",
            "Marine biologists follow the migration of the last great whale pods.",
            &[Netflix, DisneyPlus],
        ),
        movie(
            "10",
            "The Long Con",
            Crime,
            2018,
            7.9,
            8.99,
            124,
            &["Marcus Cole", "Helena Park"],
            "Victor Hale",
            "A con artist recruits her estranged father for one last casino heist.",
            &[Prime, HboMax],
        ),
        series(
            "11",
            "Northern Lights",
            Drama,
            2020,
            8.6,
            27.99,
            (4, 40),
            &["Astrid Berg", "Jonas Lind", "Emma Lane"],
            "Karin Holm",
            "Three generations of a fishing family hold on to their village in the Arctic.",
            &[Netflix, AppleTvPlus],
        ),
        movie(
            "12",
            "Summit",
            Adventure,
            2024,
            7.6,
            12.99,
            117,
            &["Noah Fischer", "Priya Shah"],
            "Daniel Rhodes",
            "A climbing team is trapped below the summit of K2 when a storm closes in.",
            &[AppleTvPlus, Prime],
        ),
        series(
            "13",
            "Byte Club",
            Comedy,
            2024,
            7.2,
            19.99,
            (1, 8),
            &["Kumail Rao", "Jess Whitaker"],
            "Greta Lund",
            "Four burned-out programmers start a startup in a laundromat.",
            &[AppleTvPlus],
        ),
        movie(
            "14",
            "Echoes of Mars",
            SciFi,
            2019,
            7.8,
            6.99,
            126,
            &["Oliver Grant", "Nadia Volkova"],
            "Hiro Nakamura",
            "The sole survivor of a Mars colony receives messages from herself.",
            &[DisneyPlus, Hulu],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleType;

    #[test]
    fn test_builtin_catalog_has_unique_ids() {
        let catalog = Catalog::builtin().unwrap();
        let ids: HashSet<_> = catalog.titles().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_builtin_catalog_values_in_range() {
        let catalog = Catalog::builtin().unwrap();
        for title in catalog.titles() {
            assert!((0.0..=10.0).contains(&title.rating), "{}", title.id);
            assert!(title.price >= 0.0, "{}", title.id);
            assert!(!title.available_on.is_empty(), "{}", title.id);
        }
        assert!(catalog
            .titles()
            .iter()
            .any(|t| t.title_type() == TitleType::Series));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let titles = builtin_titles();
        let mut duplicated = titles.clone();
        duplicated.push(titles[0].clone());
        assert!(matches!(
            Catalog::new(duplicated),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_get_and_require() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.get("3").unwrap().title, "Shadow Protocol");
        assert!(catalog.get("999").is_none());
        assert!(matches!(catalog.require("999"), Err(AppError::NotFound(_))));
    }
}
