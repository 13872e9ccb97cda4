use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type MovieId = i64;

/// A personal 1-5 star score. Distinct from the critic rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserRating(u8);

impl UserRating {
    pub const MAX: u8 = 5;

    pub fn new(stars: i64) -> Result<Self, CatalogError> {
        if (1..=Self::MAX as i64).contains(&stars) {
            Ok(Self(stars as u8))
        } else {
            Err(CatalogError::RatingOutOfRange(stars))
        }
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for UserRating {
    type Error = CatalogError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserRating> for i64 {
    fn from(rating: UserRating) -> Self {
        rating.0 as i64
    }
}

impl fmt::Display for UserRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// A catalog entry. Everything except `user_rating` is fixed after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub genre: Vec<String>,
    pub director: String,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub language: String,
    /// Critic rating on a 0-10 scale.
    pub rating: f64,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub user_rating: Option<UserRating>,
}

impl Movie {
    /// First two genres joined, with "..." when more were cut.
    pub fn genre_summary(&self) -> String {
        let mut summary = self
            .genre
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if self.genre.len() > 2 {
            summary.push_str("...");
        }
        summary
    }

    pub fn is_rated(&self) -> bool {
        self.user_rating.is_some()
    }
}
