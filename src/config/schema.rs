//! Configuration schema for the Companion updater
//!
//! Configuration is stored at `~/.config/companion-updater/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Managed container settings
    pub container: ContainerConfig,

    /// Release lookup settings
    pub github: GithubConfig,

    /// Update pipeline settings
    pub update: UpdateConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Managed container configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Name of the running Companion container
    pub name: String,

    /// Directory holding the docker compose project
    pub compose_dir: PathBuf,

    /// Upstream image pulled before every rebuild
    pub base_image: String,

    /// Image label carrying the Companion version
    pub version_label: String,

    /// Docker CLI binary
    pub docker_bin: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: "companion".to_string(),
            compose_dir: PathBuf::from("/opt/companion-docker"),
            base_image: "ghcr.io/bitfocus/companion/companion:latest".to_string(),
            version_label: "org.opencontainers.image.version".to_string(),
            docker_bin: "docker".to_string(),
        }
    }
}

/// GitHub release lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Repository in owner/name form
    pub repo: String,

    /// API base URL (for GitHub Enterprise or a mirror)
    pub api_base: String,

    /// Seconds a fetched release stays fresh
    pub cache_ttl_secs: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GithubConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: "bitfocus/companion".to_string(),
            api_base: "https://api.github.com".to_string(),
            cache_ttl_secs: 60,
            timeout_secs: 10,
        }
    }
}

/// Update pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Minimum seconds between update attempts
    pub cooldown_secs: u64,

    /// Seconds to wait after restart before verifying the version
    pub settle_secs: u64,
}

impl UpdateConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 300,
            settle_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[container]"));
        assert!(toml.contains("[github]"));
        assert!(toml.contains("[update]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.container.name, "companion");
        assert_eq!(config.update.cooldown_secs, 300);
        assert_eq!(config.github.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [update]
            cooldown_secs = 30
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.update.cooldown(), Duration::from_secs(30));
        assert_eq!(config.update.settle_secs, 5); // default preserved
        assert_eq!(config.github.repo, "bitfocus/companion");
    }
}
