use crate::error::CatalogError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PLACEHOLDER_POSTER: &str =
    "https://via.placeholder.com/300x450/374151/9CA3AF?text=No+Image";
pub const DETAIL_PLACEHOLDER_POSTER: &str =
    "https://via.placeholder.com/400x600/374151/9CA3AF?text=No+Image";

const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "movie-explorer.log";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "movie-explorer", "movie-explorer")
}

/// User settings read from `config.json` in the platform config directory.
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Catalog JSON to load instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
    /// Shown on cards whose poster cannot be used.
    pub placeholder_poster: String,
    /// Larger variant for the detail overlay.
    pub detail_placeholder_poster: String,
    /// Check poster URLs over HTTP before showing them.
    pub probe_posters: bool,
    pub probe_timeout_ms: u64,
    /// tracing filter directive, overridden by `MOVIE_EXPLORER_LOG`.
    pub log_filter: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            catalog_path: None,
            placeholder_poster: PLACEHOLDER_POSTER.to_string(),
            detail_placeholder_poster: DETAIL_PLACEHOLDER_POSTER.to_string(),
            probe_posters: true,
            probe_timeout_ms: 1500,
            log_filter: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Load from the platform config directory, falling back to defaults
    /// when there is no config file.
    pub fn load() -> Result<Self, CatalogError> {
        match project_dirs() {
            Some(dirs) => Self::load_from(&dirs.config_dir().join(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (key, value) in [
            ("placeholder_poster", &self.placeholder_poster),
            ("detail_placeholder_poster", &self.detail_placeholder_poster),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogError::ConfigurationError(format!(
                    "{} must not be empty",
                    key
                )));
            }
        }
        if self.probe_posters && self.probe_timeout_ms == 0 {
            return Err(CatalogError::ConfigurationError(
                "probe_timeout_ms must be positive when probe_posters is on".to_string(),
            ));
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Where logs go when `--log-file` is not given.
    pub fn default_log_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.cache_dir().join(LOG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_configuration_default() {
        let config = Configuration::default();
        assert!(config.catalog_path.is_none());
        assert_eq!(config.placeholder_poster, PLACEHOLDER_POSTER);
        assert_eq!(config.detail_placeholder_poster, DETAIL_PLACEHOLDER_POSTER);
        assert!(config.probe_posters);
        assert_eq!(config.probe_timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"probe_posters": false, "log_filter": "debug"}}"#).unwrap();

        let config = Configuration::load_from(file.path()).unwrap();
        assert!(!config.probe_posters);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.placeholder_poster, PLACEHOLDER_POSTER);
    }

    #[test]
    fn test_empty_placeholder_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"placeholder_poster": "  "}}"#).unwrap();

        let result = Configuration::load_from(file.path());
        assert!(matches!(result, Err(CatalogError::ConfigurationError(_))));
    }

    #[test]
    fn test_detail_placeholder_is_configurable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"detail_placeholder_poster": "https://example.com/big.png"}}"#
        )
        .unwrap();

        let config = Configuration::load_from(file.path()).unwrap();
        assert_eq!(config.detail_placeholder_poster, "https://example.com/big.png");
        assert_eq!(config.placeholder_poster, PLACEHOLDER_POSTER);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"detail_placeholder_poster": ""}}"#).unwrap();
        assert!(matches!(
            Configuration::load_from(file.path()),
            Err(CatalogError::ConfigurationError(_))
        ));
    }
}
