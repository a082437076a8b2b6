//! Error types for the Companion updater
//!
//! All modules use `UpdaterResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for updater operations
pub type UpdaterResult<T> = Result<T, UpdaterError>;

/// All errors that can occur in the updater
#[derive(Error, Debug)]
pub enum UpdaterError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Release lookup errors
    #[error("GitHub API error: {0}")]
    ReleaseHttpStatus(u16),

    #[error("Failed to connect to GitHub: {0}")]
    ReleaseNetwork(String),

    #[error("Unexpected GitHub release payload: {0}")]
    ReleaseDecode(String),

    // Update rejections
    #[error("Update already in progress")]
    AlreadyRunning,

    #[error("Cooldown active. Wait {remaining_secs}s")]
    CooldownActive { remaining_secs: u64 },

    // Pipeline stage failures
    #[error("Failed to pull image: {image}: {reason}")]
    ImagePull { image: String, reason: String },

    #[error("Companion directory not found: {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("Failed to rebuild image")]
    ImageRebuild,

    #[error("Failed to restart container")]
    ContainerRestart,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl UpdaterError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether a start request was turned away before any stage ran
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::AlreadyRunning | Self::CooldownActive { .. })
    }

    /// Whether a pipeline stage failed
    pub fn is_stage_failure(&self) -> bool {
        matches!(
            self,
            Self::ImagePull { .. }
                | Self::DirectoryMissing(_)
                | Self::ImageRebuild
                | Self::ContainerRestart
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::DirectoryMissing(_) => Some("Set container.compose_dir or COMPANION_DOCKER_PATH"),
            Self::ReleaseHttpStatus(403) => Some("GitHub rate limit reached, retry later"),
            Self::CommandFailed { .. } => Some("Check that docker is installed and on PATH"),
            e if e.is_rejection() => Some("Run: companion-updater status"),
            e if e.is_stage_failure() => Some("Rerun with -vv to see the failing command output"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages() {
        assert_eq!(
            UpdaterError::AlreadyRunning.to_string(),
            "Update already in progress"
        );
        assert_eq!(
            UpdaterError::CooldownActive { remaining_secs: 42 }.to_string(),
            "Cooldown active. Wait 42s"
        );
    }

    #[test]
    fn stage_messages() {
        let err = UpdaterError::DirectoryMissing(PathBuf::from("/opt/companion-docker"));
        assert_eq!(
            err.to_string(),
            "Companion directory not found: /opt/companion-docker"
        );
        assert_eq!(UpdaterError::ImageRebuild.to_string(), "Failed to rebuild image");
        assert_eq!(
            UpdaterError::ContainerRestart.to_string(),
            "Failed to restart container"
        );
        assert!(UpdaterError::ImagePull {
            image: "companion:latest".to_string(),
            reason: "exit status 1".to_string(),
        }
        .to_string()
        .starts_with("Failed to pull image: "));
    }

    #[test]
    fn error_classification() {
        assert!(UpdaterError::AlreadyRunning.is_rejection());
        assert!(UpdaterError::CooldownActive { remaining_secs: 1 }.is_rejection());
        assert!(!UpdaterError::AlreadyRunning.is_stage_failure());

        assert!(UpdaterError::ImageRebuild.is_stage_failure());
        assert!(UpdaterError::ContainerRestart.is_stage_failure());
        assert!(UpdaterError::DirectoryMissing(PathBuf::from("/srv")).is_stage_failure());
        assert!(!UpdaterError::ImageRebuild.is_rejection());
        assert!(!UpdaterError::ReleaseNetwork("refused".to_string()).is_stage_failure());
    }

    #[test]
    fn error_hint() {
        assert_eq!(
            UpdaterError::AlreadyRunning.hint(),
            Some("Run: companion-updater status")
        );
        assert_eq!(
            UpdaterError::ContainerRestart.hint(),
            Some("Rerun with -vv to see the failing command output")
        );
        assert_eq!(
            UpdaterError::DirectoryMissing(PathBuf::from("/srv")).hint(),
            Some("Set container.compose_dir or COMPANION_DOCKER_PATH")
        );
        assert_eq!(
            UpdaterError::ReleaseHttpStatus(403).hint(),
            Some("GitHub rate limit reached, retry later")
        );
        assert_eq!(UpdaterError::ReleaseHttpStatus(500).hint(), None);
    }
}
