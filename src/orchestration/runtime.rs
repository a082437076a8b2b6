//! Container runtime abstraction
//!
//! The update pipeline and the status query talk to the managed container
//! only through this trait, so other backends (and test fakes) can stand in
//! for the docker CLI.

use crate::error::UpdaterResult;
use crate::update::ProgressSink;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

/// Lifecycle state of the managed container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStatus {
    /// Whether the container exists at all
    pub exists: bool,
    /// Runtime-reported state, e.g. "running", "exited", "not found"
    pub status: String,
    /// Whether the container is currently running
    pub running: bool,
}

impl ContainerStatus {
    /// Status for a container the runtime does not know about
    pub fn not_found() -> Self {
        Self {
            exists: false,
            status: "not found".to_string(),
            running: false,
        }
    }

    /// Status for a container reported in `state`
    pub fn from_state(state: &str) -> Self {
        let state = state.trim();
        Self {
            exists: true,
            status: state.to_string(),
            running: state == "running",
        }
    }

    /// Status when the runtime itself could not be queried
    pub fn query_failed(reason: impl std::fmt::Display) -> Self {
        Self {
            exists: false,
            status: format!("error: {}", reason),
            running: false,
        }
    }
}

/// Abstract container runtime interface
///
/// The three update operations forward every line of sub-process output to
/// `sink` as it arrives and fail with a stage-specific error on a non-zero
/// exit.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Version label of the running container's image, if it can be read
    async fn running_version(&self) -> Option<String>;

    /// Current lifecycle state of the managed container
    async fn container_status(&self) -> ContainerStatus;

    /// Pull the upstream base image
    async fn pull_base_image(&self, sink: &ProgressSink) -> UpdaterResult<()>;

    /// Rebuild the local image from the compose project in `compose_dir`
    async fn rebuild_image(&self, compose_dir: &Path, sink: &ProgressSink) -> UpdaterResult<()>;

    /// Recreate the container from the compose project in `compose_dir`
    async fn restart_container(
        &self,
        compose_dir: &Path,
        sink: &ProgressSink,
    ) -> UpdaterResult<()>;

    /// Get the human-readable runtime name for display
    fn runtime_name(&self) -> &'static str;
}
