//! Update pipeline: pull, rebuild, restart, verify
//!
//! A start request either claims the process-wide run (see
//! [`UpdateState::try_begin`]) or is answered with a single `error` event.
//! An accepted run executes on its own task and pushes [`ProgressEvent`]s
//! into a bounded channel; exactly one `complete` or `error` event ends it.

use super::event::{ProgressEvent, ProgressSink, UpdateOutcome, UpdateStream};
use super::state::UpdateState;
use super::status::UpdateStatus;
use crate::config::Config;
use crate::error::{UpdaterError, UpdaterResult};
use crate::orchestration::{ContainerRuntime, DockerRuntime};
use crate::release::{GithubReleases, ReleaseCache};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Events buffered between the pipeline and a slow consumer
const EVENT_BUFFER: usize = 64;

pub const COMPLETE_MESSAGE: &str = "Update completed successfully!";
pub const UNVERIFIED_MESSAGE: &str = "Update complete! Could not verify new version.";

/// One step of the update pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pull,
    Rebuild,
    Restart,
    Verify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pull => "pull",
            Self::Rebuild => "rebuild",
            Self::Restart => "restart",
            Self::Verify => "verify",
        };
        write!(f, "{}", name)
    }
}

impl Stage {
    pub const ALL: [Stage; 4] = [Self::Pull, Self::Rebuild, Self::Restart, Self::Verify];

    /// Progress message announcing the stage
    pub fn headline(self) -> &'static str {
        match self {
            Self::Pull => "Pulling latest Companion base image...",
            Self::Rebuild => "Rebuilding Companion image...",
            Self::Restart => "Restarting Companion container...",
            Self::Verify => "Waiting for Companion to start...",
        }
    }

    /// Stage announced by `message`, if any
    pub fn from_headline(message: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.headline() == message)
    }

    /// 1-based position in the pipeline
    pub fn position(self) -> u64 {
        match self {
            Self::Pull => 1,
            Self::Rebuild => 2,
            Self::Restart => 3,
            Self::Verify => 4,
        }
    }
}

/// Orchestrator settings independent of the collaborators
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Compose project used for rebuild and restart
    pub compose_dir: PathBuf,
    /// Grace period between restart and version verification
    pub settle: Duration,
    /// Minimum interval between update attempts
    pub cooldown: Duration,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            compose_dir: config.container.compose_dir.clone(),
            settle: config.update.settle(),
            cooldown: config.update.cooldown(),
        }
    }
}

/// Drives status queries and update runs for the managed container
pub struct UpdateOrchestrator {
    runtime: Arc<dyn ContainerRuntime>,
    releases: Arc<ReleaseCache>,
    state: Arc<UpdateState>,
    compose_dir: PathBuf,
    settle: Duration,
}

impl UpdateOrchestrator {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        releases: Arc<ReleaseCache>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            runtime,
            releases,
            state: Arc::new(UpdateState::new(settings.cooldown)),
            compose_dir: settings.compose_dir,
            settle: settings.settle,
        }
    }

    /// Build an orchestrator backed by docker and the GitHub API
    pub fn from_config(config: &Config) -> Self {
        let runtime = Arc::new(DockerRuntime::new(&config.container));
        let source = Arc::new(GithubReleases::new(&config.github));
        let releases = Arc::new(ReleaseCache::new(source, config.github.cache_ttl()));
        Self::new(runtime, releases, PipelineSettings::from(config))
    }

    pub fn releases(&self) -> &ReleaseCache {
        &self.releases
    }

    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    pub fn runtime_name(&self) -> &'static str {
        self.runtime.runtime_name()
    }

    /// Report versions, container state and whether an update may start.
    ///
    /// Never touches the cooldown or the running flag. A failed release
    /// lookup degrades to an unknown latest version.
    pub async fn status(&self) -> UpdateStatus {
        let current = self.runtime.running_version().await;

        let latest = match self.releases.latest().await {
            Ok(release) => release.version().map(str::to_string),
            Err(e) => {
                warn!("Failed to fetch latest version: {}", e);
                None
            }
        };

        let container = self.runtime.container_status().await;

        UpdateStatus::assemble(
            current.as_deref(),
            latest.as_deref(),
            &container,
            self.state.snapshot(),
        )
    }

    /// Start an update run and attach to its event stream.
    ///
    /// Rejected requests get a stream holding one `error` event. Accepted
    /// runs continue to their terminal state even if the stream is dropped.
    pub fn start_update(self: &Arc<Self>) -> UpdateStream {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        let guard = match self.state.try_begin() {
            Ok(guard) => guard,
            Err(rejection) => {
                debug_assert!(rejection.is_rejection());
                warn!("Update request rejected: {}", rejection);
                // Fresh channel with capacity, so this cannot fail
                let _ = tx.try_send(ProgressEvent::error(rejection.to_string()));
                return UpdateStream::new(rx);
            }
        };

        let run_id = Uuid::new_v4();
        let sink = ProgressSink::new(tx);
        let this = Arc::clone(self);

        tokio::spawn(
            async move {
                info!("Starting Companion update process");
                sink.progress("Starting update process...").await;

                let result = this.run_pipeline(&sink).await;

                // Release before the terminal event so observers of the
                // terminal event never see a stale running flag
                drop(guard);

                let terminal = match result {
                    Ok(message) => {
                        info!("Companion update completed");
                        ProgressEvent::complete(message)
                    }
                    Err(e) if e.is_stage_failure() => {
                        error!(error = %e, "Update stage failed");
                        ProgressEvent::error(e.to_string())
                    }
                    Err(e) => {
                        error!("Update aborted: {}", e);
                        ProgressEvent::error(e.to_string())
                    }
                };
                sink.send(terminal).await;
            }
            .instrument(info_span!("update", %run_id)),
        );

        UpdateStream::new(rx)
    }

    /// Run an update to completion and report only its terminal result
    pub async fn run_update(self: &Arc<Self>) -> UpdateOutcome {
        self.start_update().outcome().await
    }

    /// Execute all stages in order, stopping at the first failure
    async fn run_pipeline(&self, sink: &ProgressSink) -> UpdaterResult<String> {
        self.pull(sink).await?;
        self.rebuild(sink).await?;
        self.restart(sink).await?;
        Ok(self.verify(sink).await)
    }

    async fn pull(&self, sink: &ProgressSink) -> UpdaterResult<()> {
        info!(stage = %Stage::Pull, "Stage started");
        sink.progress(Stage::Pull.headline()).await;
        self.runtime.pull_base_image(sink).await?;
        sink.progress("Base image pulled successfully").await;
        Ok(())
    }

    async fn rebuild(&self, sink: &ProgressSink) -> UpdaterResult<()> {
        info!(stage = %Stage::Rebuild, "Stage started");
        sink.progress(Stage::Rebuild.headline()).await;

        if !tokio::fs::try_exists(&self.compose_dir).await.unwrap_or(false) {
            return Err(UpdaterError::DirectoryMissing(self.compose_dir.clone()));
        }

        self.runtime.rebuild_image(&self.compose_dir, sink).await?;
        sink.progress("Image rebuilt successfully").await;
        Ok(())
    }

    async fn restart(&self, sink: &ProgressSink) -> UpdaterResult<()> {
        info!(stage = %Stage::Restart, "Stage started");
        sink.progress(Stage::Restart.headline()).await;
        self.runtime
            .restart_container(&self.compose_dir, sink)
            .await?;
        sink.progress("Container restarted successfully").await;
        Ok(())
    }

    /// Wait for the container to settle and read its version. Cannot fail.
    async fn verify(&self, sink: &ProgressSink) -> String {
        info!(stage = %Stage::Verify, "Stage started");
        sink.progress(Stage::Verify.headline()).await;
        tokio::time::sleep(self.settle).await;

        match self.runtime.running_version().await {
            Some(version) => {
                sink.progress(format!("Update complete! Now running version {}", version))
                    .await;
                COMPLETE_MESSAGE.to_string()
            }
            None => {
                warn!("Could not verify Companion version after restart");
                UNVERIFIED_MESSAGE.to_string()
            }
        }
    }
}
