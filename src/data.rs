use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::movie::Movie;
use std::path::Path;
use tracing::info;

/// Seed catalog compiled into the binary.
const BUNDLED_CATALOG: &str = include_str!("../data/movies.json");

pub fn bundled_movies() -> Result<Vec<Movie>, CatalogError> {
    Ok(serde_json::from_str(BUNDLED_CATALOG)?)
}

/// Read a JSON array of movies from disk.
pub fn movies_from_file(path: &Path) -> Result<Vec<Movie>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Build the session catalog from `path`, or from the bundled data when no
/// path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    let movies = match path {
        Some(p) => {
            let movies = movies_from_file(p)?;
            info!(path = %p.display(), count = movies.len(), "loaded catalog file");
            movies
        }
        None => {
            let movies = bundled_movies()?;
            info!(count = movies.len(), "loaded bundled catalog");
            movies
        }
    };
    Catalog::new(movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_catalog_is_valid() {
        let catalog = load_catalog(None).unwrap();
        let stats = catalog.stats();
        assert!(stats.total_movies > 0);
        assert_eq!(stats.rated_movies, 0);
        assert!(catalog
            .movies()
            .iter()
            .all(|m| (0.0..=10.0).contains(&m.rating)));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 10, "title": "Up", "year": 2009, "genre": ["Animation"],
                  "director": "Pete Docter", "rating": 8.3, "userRating": 4}},
                {{"id": 11, "title": "Coco", "year": 2017, "genre": ["Animation", "Family"],
                  "director": "Lee Unkrich", "rating": 8.4}}
            ]"#
        )
        .unwrap();

        let catalog = load_catalog(Some(file.path())).unwrap();
        assert_eq!(catalog.movies().len(), 2);
        assert_eq!(catalog.stats().rated_movies, 1);
        assert_eq!(catalog.movie(11).unwrap().title, "Coco");
    }

    #[test]
    fn test_load_catalog_rejects_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "title": "A", "year": 2000, "genre": [], "director": "X", "rating": 5}},
                {{"id": 1, "title": "B", "year": 2001, "genre": [], "director": "Y", "rating": 6}}
            ]"#
        )
        .unwrap();

        let result = load_catalog(Some(file.path()));
        assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(
            load_catalog(Some(&path)),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"movies\": []}}").unwrap();
        assert!(matches!(
            load_catalog(Some(file.path())),
            Err(CatalogError::SerializationError(_))
        ));
    }
}
