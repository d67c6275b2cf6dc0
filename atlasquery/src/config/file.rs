//! Loading lookup settings from an INI file.

use std::path::Path;

use ini::Ini;
use thiserror::Error;

use super::query::QueryConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl QueryConfig {
    /// Load settings from the `[whereami]` section of an INI file.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_MAX_FIND, DEFAULT_SEARCH_RADIUS, MAX_SEARCH_RADIUS};
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("atlasquery.ini");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = QueryConfig::load_from(&config_path).unwrap();
        assert_eq!(config, QueryConfig::default());
    }

    #[test]
    fn test_load_all_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"
[whereami]
max_find = 4
max_search_radius = 5.5
warn_on_truncation = no
"#,
        );

        let config = QueryConfig::load_from(&path).unwrap();
        assert_eq!(config.max_find(), 4);
        assert_eq!(config.search_radius(), 5.5);
        assert!(!config.warn_on_truncation());
    }

    #[test]
    fn test_missing_section_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[logging]\nfile = x.log\n");

        let config = QueryConfig::load_from(&path).unwrap();
        assert_eq!(config.max_find(), DEFAULT_MAX_FIND);
        assert_eq!(config.search_radius(), DEFAULT_SEARCH_RADIUS);
    }

    #[test]
    fn test_radius_above_ceiling_clamped() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[whereami]\nmax_search_radius = 30\n");

        let config = QueryConfig::load_from(&path).unwrap();
        assert_eq!(config.search_radius(), MAX_SEARCH_RADIUS);
    }

    #[test]
    fn test_invalid_max_find() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[whereami]\nmax_find = lots\n");

        let err = QueryConfig::load_from(&path).unwrap_err();
        assert!(
            matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "max_find"),
            "unexpected error: {}",
            err
        );
        assert!(err.to_string().contains("whereami.max_find"));
    }

    #[test]
    fn test_invalid_radius() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[whereami]\nmax_search_radius = wide\n");

        let err = QueryConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("must be a number"));
    }
}
