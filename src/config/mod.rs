//! Configuration management for the Companion updater
//!
//! Values come from the TOML config file first, then from the environment
//! variables a containerized deployment sets.

pub mod schema;

pub use schema::Config;

use crate::error::{UpdaterError, UpdaterResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Environment variables that override file settings
pub const ENV_OVERRIDES: &[&str] = &[
    "COMPANION_DOCKER_PATH",
    "COMPANION_CONTAINER_NAME",
    "GITHUB_REPO",
    "GITHUB_API_BASE",
    "UPDATE_COOLDOWN",
    "GITHUB_CACHE_TTL",
];

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("companion-updater")
            .join("config.toml")
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> UpdaterResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration and apply environment overrides
    pub async fn load_merged(&self) -> UpdaterResult<Config> {
        let mut config = self.load().await?;
        apply_env_overrides(&mut config, &self.config_path, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> UpdaterResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| UpdaterError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| UpdaterError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> UpdaterResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            UpdaterError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> UpdaterResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| UpdaterError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// `origin` only appears in error messages.
pub fn apply_env_overrides(
    config: &mut Config,
    origin: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> UpdaterResult<()> {
    let parse_secs = |key: &str, value: String| -> UpdaterResult<u64> {
        value.trim().parse().map_err(|_| UpdaterError::ConfigInvalid {
            path: origin.to_path_buf(),
            reason: format!("{} must be a whole number of seconds, got '{}'", key, value),
        })
    };

    if let Some(path) = lookup("COMPANION_DOCKER_PATH") {
        config.container.compose_dir = PathBuf::from(path);
    }
    if let Some(name) = lookup("COMPANION_CONTAINER_NAME") {
        config.container.name = name;
    }
    if let Some(repo) = lookup("GITHUB_REPO") {
        config.github.repo = repo;
    }
    if let Some(base) = lookup("GITHUB_API_BASE") {
        config.github.api_base = base;
    }
    if let Some(value) = lookup("UPDATE_COOLDOWN") {
        config.update.cooldown_secs = parse_secs("UPDATE_COOLDOWN", value)?;
    }
    if let Some(value) = lookup("GITHUB_CACHE_TTL") {
        config.github.cache_ttl_secs = parse_secs("GITHUB_CACHE_TTL", value)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.container.name, "companion");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.container.name = "companion-test".to_string();

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.container.name, "companion-test");
    }

    #[tokio::test]
    async fn invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[update]\ncooldown_secs = \"soon\"\n").unwrap();

        let err = ConfigManager::with_path(path.clone())
            .load()
            .await
            .unwrap_err();
        match err {
            UpdaterError::ConfigInvalid { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("COMPANION_DOCKER_PATH", "/srv/companion"),
            ("UPDATE_COOLDOWN", "60"),
            ("GITHUB_CACHE_TTL", " 5 "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, Path::new("env"), |k| {
            vars.get(k).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.container.compose_dir, PathBuf::from("/srv/companion"));
        assert_eq!(config.update.cooldown_secs, 60);
        assert_eq!(config.github.cache_ttl_secs, 5);
        assert_eq!(config.container.name, "companion");
    }

    #[test]
    fn env_override_rejects_bad_number() {
        let mut config = Config::default();
        let err = apply_env_overrides(&mut config, Path::new("env"), |k| {
            (k == "UPDATE_COOLDOWN").then(|| "five minutes".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("UPDATE_COOLDOWN"));
    }

    #[tokio::test]
    #[serial]
    async fn load_merged_reads_process_env() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));

        std::env::set_var("COMPANION_CONTAINER_NAME", "companion-env");
        let config = manager.load_merged().await;
        std::env::remove_var("COMPANION_CONTAINER_NAME");

        assert_eq!(config.unwrap().container.name, "companion-env");
    }
}
