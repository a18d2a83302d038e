use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

mod catalog_config;
mod storage_config;

pub use catalog_config::{CatalogConfig, DEFAULT_BASE_URL, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
pub use storage_config::{
    StorageConfig, StorageKeys, DEFAULT_LIKED_KEY, DEFAULT_SAVED_KEY, DEFAULT_SESSION_KEY,
};

/// Global application configuration (config.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    /// Get the config file path (config.json in the config directory)
    pub fn path() -> PathBuf {
        const FILENAME: &str = "config.json";
        if let Some(mut path) = dirs::config_dir() {
            path.push("gallery-state");
            path.push(FILENAME);
            return path;
        }

        // Fallback to home directory
        if let Some(mut path) = dirs::home_dir() {
            path.push(".gallery-state");
            path.push(FILENAME);
            return path;
        }

        PathBuf::from(FILENAME)
    }

    /// Load config from the default path or return defaults
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from a file, falling back to defaults when it is absent or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), ?e, "Failed to read config, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Invalid config, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        // Storage defaults
        assert_eq!(config.storage.data_dir, None);
        assert_eq!(config.storage.keys.session, "session");
        assert_eq!(config.storage.keys.liked, "liked");
        assert_eq!(config.storage.keys.saved, "saved");

        // Catalog defaults
        assert_eq!(config.catalog.page_size, 12);
        assert_eq!(config.catalog.max_pages, 100);
        assert_eq!(config.catalog.base_url, "https://picsum.photos");
        assert_eq!(config.catalog.width, 500);
        assert_eq!(config.catalog.base_height, 300);
        assert_eq!(config.catalog.height_step, 40);
        assert_eq!(config.catalog.height_variants, 10);
    }

    #[test]
    fn test_config_partial_json_fills_defaults() {
        let json = r#"{
            "storage": { "keys": { "liked": "likedImages" } },
            "catalog": { "pageSize": 24 }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.storage.keys.liked, "likedImages");
        assert_eq!(config.storage.keys.session, "session");
        assert_eq!(config.catalog.page_size, 24);
        assert_eq!(config.catalog.width, 500);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config {
            storage: StorageConfig {
                data_dir: Some(PathBuf::from("/tmp/gallery")),
                keys: StorageKeys {
                    session: "currentUser".to_string(),
                    liked: "likedImages".to_string(),
                    saved: "savedImages".to_string(),
                },
            },
            catalog: CatalogConfig {
                page_size: 6,
                ..CatalogConfig::default()
            },
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"dataDir\""));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_missing_or_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        assert_eq!(Config::load_from(&path), Config::default());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "catalog": { "baseUrl": "http://localhost" } }"#).unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.catalog.base_url, "http://localhost");
    }
}
