use crate::error::CatalogError;
use crate::movie::{Movie, MovieId, UserRating};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tracing::debug;

pub const ALL_GENRES: &str = "All Genres";
pub const ALL_YEARS: &str = "All Years";

/// Genre dimension of the filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Only(String),
}

impl GenreFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_GENRES,
            Self::Only(genre) => genre,
        }
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            Self::All => true,
            Self::Only(genre) => movie.genre.iter().any(|g| g == genre),
        }
    }
}

impl From<&str> for GenreFilter {
    fn from(value: &str) -> Self {
        if value == ALL_GENRES {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl From<String> for GenreFilter {
    fn from(value: String) -> Self {
        if value == ALL_GENRES {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Year dimension of the filter selection. Concrete years are kept in
/// their string form and compared against `movie.year.to_string()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Only(String),
}

impl YearFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_YEARS,
            Self::Only(year) => year,
        }
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            Self::All => true,
            Self::Only(year) => movie.year.to_string() == *year,
        }
    }
}

impl From<&str> for YearFilter {
    fn from(value: &str) -> Self {
        if value == ALL_YEARS {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl From<String> for YearFilter {
    fn from(value: String) -> Self {
        if value == ALL_YEARS {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<i32> for YearFilter {
    fn from(year: i32) -> Self {
        Self::Only(year.to_string())
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current search/genre/year selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub search: String,
    pub genre: GenreFilter,
    pub year: YearFilter,
}

impl FilterSelection {
    /// True when the movie passes all three predicates.
    pub fn matches(&self, movie: &Movie) -> bool {
        movie
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase())
            && self.genre.matches(movie)
            && self.year.matches(movie)
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.genre != GenreFilter::All || self.year != YearFilter::All
    }
}

/// Aggregate numbers shown in the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub total_movies: usize,
    pub filtered_count: usize,
    pub rated_movies: usize,
    /// Mean critic rating over the whole catalog, 0.0 when it is empty.
    pub average_rating: f64,
}

/// Owns the movie list and the filter selection. Everything the UI shows is
/// derived from these two on each read.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    selection: FilterSelection,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(movies.len());
        for movie in &movies {
            if !seen.insert(movie.id) {
                return Err(CatalogError::DuplicateId(movie.id));
            }
        }
        Ok(Self {
            movies,
            selection: FilterSelection::default(),
        })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn has_active_filters(&self) -> bool {
        self.selection.is_active()
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn set_search_term(&mut self, text: impl Into<String>) {
        self.selection.search = text.into();
    }

    pub fn set_genre_filter(&mut self, genre: impl Into<GenreFilter>) {
        self.selection.genre = genre.into();
    }

    pub fn set_year_filter(&mut self, year: impl Into<YearFilter>) {
        self.selection.year = year.into();
    }

    /// Set the user rating of movie `id`. Returns false if no movie has that id.
    pub fn rate_movie(&mut self, id: MovieId, rating: UserRating) -> bool {
        match self.movies.iter_mut().find(|m| m.id == id) {
            Some(movie) => {
                debug!(id, stars = rating.stars(), title = %movie.title, "rated movie");
                movie.user_rating = Some(rating);
                true
            }
            None => {
                debug!(id, "ignoring rating for unknown movie");
                false
            }
        }
    }

    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::default();
    }

    /// Movies matching the current selection, in catalog order.
    pub fn derived_view(&self) -> Vec<&Movie> {
        self.movies
            .iter()
            .filter(|m| self.selection.matches(m))
            .collect()
    }

    /// Every distinct genre plus the "All Genres" sentinel, sorted together.
    pub fn available_genres(&self) -> Vec<GenreFilter> {
        let mut labels: BTreeSet<&str> = self
            .movies
            .iter()
            .flat_map(|m| m.genre.iter().map(String::as_str))
            .collect();
        labels.insert(ALL_GENRES);
        labels.into_iter().map(GenreFilter::from).collect()
    }

    /// "All Years" first, then every distinct year newest first.
    pub fn available_years(&self) -> Vec<YearFilter> {
        let years: BTreeSet<i32> = self.movies.iter().map(|m| m.year).collect();
        std::iter::once(YearFilter::All)
            .chain(years.into_iter().rev().map(YearFilter::from))
            .collect()
    }

    pub fn stats(&self) -> Stats {
        let total_movies = self.movies.len();
        let average_rating = if total_movies == 0 {
            0.0
        } else {
            self.movies.iter().map(|m| m.rating).sum::<f64>() / total_movies as f64
        };
        Stats {
            total_movies,
            filtered_count: self.derived_view().len(),
            rated_movies: self.movies.iter().filter(|m| m.is_rated()).count(),
            average_rating,
        }
    }
}
