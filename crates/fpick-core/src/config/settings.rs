//! Picker configuration loaded from a TOML file.
//!
//! Every field has a default, so a missing or partial file is fine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Top-level configuration.
///
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }
}

/// Limits shared by the directory and search caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,
    #[serde(default = "default_max_memory_mb")]
    pub max_memory_mb: usize,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_mb.saturating_mul(1024 * 1024)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_cache_entries(),
            max_memory_mb: default_max_memory_mb(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Directory listing budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_directory_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_directory_entries")]
    pub max_entries: usize,
}

impl DirectoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_directory_timeout_ms(),
            max_entries: default_directory_entries(),
        }
    }
}

/// Search budget and debounce window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_search_results")]
    pub max_results: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_search_timeout_ms(),
            max_results: default_search_results(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    5 * 60
}

fn default_cache_entries() -> usize {
    100
}

fn default_max_memory_mb() -> usize {
    50
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_directory_timeout_ms() -> u64 {
    30_000
}

fn default_directory_entries() -> usize {
    1000
}

fn default_search_timeout_ms() -> u64 {
    45_000
}

fn default_search_results() -> usize {
    50
}

fn default_debounce_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_cache() {
        let config = Config::default();

        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert_eq!(config.cache.max_entries, 100);
        assert_eq!(config.cache.max_memory_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.cache.sweep_interval(), Duration::from_secs(60));
    }

    #[test]
    fn default_config_directory() {
        let config = Config::default();

        assert_eq!(config.directory.timeout(), Duration::from_secs(30));
        assert_eq!(config.directory.max_entries, 1000);
    }

    #[test]
    fn default_config_search() {
        let config = Config::default();

        assert_eq!(config.search.timeout(), Duration::from_secs(45));
        assert_eq!(config.search.max_results, 50);
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[cache]
ttl_secs = 60
max_entries = 20
max_memory_mb = 5
sweep_interval_secs = 10

[directory]
timeout_ms = 5000
max_entries = 200

[search]
timeout_ms = 9000
max_results = 25
debounce_ms = 150
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_entries, 20);
        assert_eq!(config.cache.max_memory_mb, 5);
        assert_eq!(config.cache.sweep_interval_secs, 10);

        assert_eq!(config.directory.timeout_ms, 5000);
        assert_eq!(config.directory.max_entries, 200);

        assert_eq!(config.search.timeout_ms, 9000);
        assert_eq!(config.search.max_results, 25);
        assert_eq!(config.search.debounce_ms, 150);
    }

    #[test]
    fn load_partial_toml_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[search]
debounce_ms = 500
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.max_results, 50);
        assert_eq!(config.directory.max_entries, 1000);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn load_empty_toml_uses_all_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        let default = Config::default();

        assert_eq!(config.cache.max_entries, default.cache.max_entries);
        assert_eq!(config.directory.timeout_ms, default.directory.timeout_ms);
        assert_eq!(config.search.timeout_ms, default.search.timeout_ms);
    }

    #[test]
    fn sweep_interval_is_never_zero() {
        let config = CacheConfig {
            sweep_interval_secs: 0,
            ..CacheConfig::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nonexistent.toml"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn load_invalid_toml_returns_config_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid [[[toml").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result.unwrap_err(), CoreError::ConfigParse(_)));
    }
}
