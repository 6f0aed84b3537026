// Configuration for the remote resource a table is bound to.
// Read from a JSON file in the config directory, then overridden from the environment.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::paths;

pub const ENV_API_BASE: &str = "TABSYNC_API_BASE";
pub const ENV_TABLE: &str = "TABSYNC_TABLE";
pub const ENV_PAGE_SIZE: &str = "TABSYNC_PAGE_SIZE";

const DEFAULT_API_BASE: &str = "https://localhost:7030/aucusoft";
const DEFAULT_TABLE: &str = "Projects";
const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the remote API.
    pub api_base: String,
    /// Collection name appended to `api_base`.
    pub table: String,
    /// Endpoint used for deletes. Defaults to the resource URL.
    pub collection_endpoint: Option<String>,
    /// Rows requested per page.
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            table: DEFAULT_TABLE.to_string(),
            collection_endpoint: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Config bound to a specific table under the default API base.
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Load from the default config path with environment overrides.
    pub fn load() -> Result<Self> {
        let path = paths::config_path().ok_or(TableError::MissingConfig)?;
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.is_empty()) {
            self.api_base = base;
        }
        if let Some(table) = lookup(ENV_TABLE).filter(|v| !v.is_empty()) {
            self.table = table;
        }
        match lookup(ENV_PAGE_SIZE).map(|v| v.parse::<u32>()) {
            Some(Ok(size)) if size > 0 => self.page_size = size,
            Some(_) => log::warn!("ignoring invalid {}", ENV_PAGE_SIZE),
            None => {}
        }
    }

    /// Base URL of the table's collection.
    pub fn resource_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.table.trim_matches('/')
        )
    }

    /// Endpoint that delete requests are addressed to.
    pub fn collection_url(&self) -> String {
        match &self.collection_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => self.resource_url(),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.resource_url(), "https://localhost:7030/aucusoft/Projects");
        assert_eq!(config.collection_url(), config.resource_url());
        assert_eq!(config.page_size(), 5);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"api_base": "http://api.test/", "table": "Tasks", "collection_endpoint": "http://api.test/Projects/"}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.resource_url(), "http://api.test/Tasks");
        assert_eq!(config.collection_url(), "http://api.test/Projects");
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::from_file(&path), Err(TableError::Json(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_BASE, "http://other"),
            (ENV_TABLE, "Clients"),
            (ENV_PAGE_SIZE, "20"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.resource_url(), "http://other/Clients");
        assert_eq!(config.page_size(), 20);
    }

    #[test]
    fn test_invalid_page_size_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == ENV_PAGE_SIZE).then(|| "0".to_string()));
        assert_eq!(config.page_size(), 5);

        config.apply_overrides(|key| (key == ENV_PAGE_SIZE).then(|| "lots".to_string()));
        assert_eq!(config.page_size(), 5);
    }
}
