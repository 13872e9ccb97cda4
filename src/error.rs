use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the catalog or building intents for it.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Rating {0} is outside the 1-5 star range")]
    RatingOutOfRange(i64),

    #[error("Duplicate movie id {0} in catalog")]
    DuplicateId(i64),

    #[error("Catalog file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CatalogError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::RatingOutOfRange(value) => {
                format!("Ratings go from 1 to 5 stars, got {}", value)
            }
            CatalogError::DuplicateId(id) => {
                format!("The catalog lists movie id {} more than once", id)
            }
            CatalogError::NotFound(path) => {
                format!("No catalog file at {}", path.display())
            }
            CatalogError::ConfigurationError(msg) => {
                format!("Configuration error: {}", msg)
            }
            CatalogError::IoError(e) => format!("File system error: {}", e),
            CatalogError::SerializationError(e) => format!("Catalog format error: {}", e),
        }
    }
}
