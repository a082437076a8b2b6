//! Docker CLI container runtime
//!
//! Implements the ContainerRuntime trait by shelling out to `docker` and
//! `docker compose`.

use crate::config::schema::ContainerConfig;
use crate::error::{UpdaterError, UpdaterResult};
use crate::orchestration::runtime::{ContainerRuntime, ContainerStatus};
use crate::update::ProgressSink;
use async_trait::async_trait;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Placeholder docker prints for a missing label
const NO_VALUE: &str = "<no value>";

/// Container runtime using the docker CLI
pub struct DockerRuntime {
    docker_bin: String,
    container: String,
    base_image: String,
    version_label: String,
}

impl DockerRuntime {
    /// Create a docker runtime for the configured container
    pub fn new(config: &ContainerConfig) -> Self {
        Self {
            docker_bin: config.docker_bin.clone(),
            container: config.name.clone(),
            base_image: config.base_image.clone(),
            version_label: config.version_label.clone(),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.docker_bin, args.join(" "))
    }

    /// Execute a docker command and return the output
    async fn exec(&self, args: &[&str]) -> UpdaterResult<std::process::Output> {
        debug!("Executing: {}", self.describe(args));

        Command::new(&self.docker_bin)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| UpdaterError::command_failed(self.describe(args), e))
    }

    /// Run a docker command, forwarding its output to `sink`
    async fn exec_streamed(
        &self,
        args: &[&str],
        cwd: Option<&Path>,
        sink: &ProgressSink,
    ) -> UpdaterResult<ExitStatus> {
        let command = self.describe(args);
        debug!("Executing with streamed output: {}", command);

        let mut cmd = Command::new(&self.docker_bin);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| UpdaterError::command_failed(&command, e))?;

        let tail = super::stream_child_output(&mut child, sink).await?;

        let status = child
            .wait()
            .await
            .map_err(|e| UpdaterError::command_failed(&command, e))?;

        if !status.success() {
            error!(
                "{} exited with {}; last output:\n{}",
                command,
                status,
                tail.join("\n")
            );
        }

        Ok(status)
    }

    fn version_format(&self) -> String {
        format!("{{{{index .Config.Labels \"{}\"}}}}", self.version_label)
    }
}

/// Extract a version from `docker inspect` label output
pub(crate) fn parse_version_label(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value == NO_VALUE {
        return None;
    }
    let version = value.trim_start_matches('v');
    (!version.is_empty()).then(|| version.to_string())
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn running_version(&self) -> Option<String> {
        let format = self.version_format();
        let output = match self
            .exec(&["inspect", "--format", &format, &self.container])
            .await
        {
            Ok(output) => output,
            Err(e) => {
                error!("Could not inspect {}: {}", self.container, e);
                return None;
            }
        };

        if !output.status.success() {
            error!("Container {} not found", self.container);
            return None;
        }

        match parse_version_label(&String::from_utf8_lossy(&output.stdout)) {
            Some(version) => {
                info!("Current Companion version: {}", version);
                Some(version)
            }
            None => {
                warn!("Version label {} not found in container", self.version_label);
                None
            }
        }
    }

    async fn container_status(&self) -> ContainerStatus {
        match self
            .exec(&["inspect", "--format", "{{.State.Status}}", &self.container])
            .await
        {
            Ok(output) if output.status.success() => {
                ContainerStatus::from_state(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(_) => ContainerStatus::not_found(),
            Err(e) => ContainerStatus::query_failed(e),
        }
    }

    async fn pull_base_image(&self, sink: &ProgressSink) -> UpdaterResult<()> {
        let status = self
            .exec_streamed(&["pull", &self.base_image], None, sink)
            .await
            .map_err(|e| UpdaterError::ImagePull {
                image: self.base_image.clone(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(UpdaterError::ImagePull {
                image: self.base_image.clone(),
                reason: format!("docker pull exited with {}", status),
            })
        }
    }

    async fn rebuild_image(&self, compose_dir: &Path, sink: &ProgressSink) -> UpdaterResult<()> {
        let status = self
            .exec_streamed(&["compose", "build", "--no-cache"], Some(compose_dir), sink)
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(UpdaterError::ImageRebuild)
        }
    }

    async fn restart_container(
        &self,
        compose_dir: &Path,
        sink: &ProgressSink,
    ) -> UpdaterResult<()> {
        let status = self
            .exec_streamed(&["compose", "up", "-d"], Some(compose_dir), sink)
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(UpdaterError::ContainerRestart)
        }
    }

    fn runtime_name(&self) -> &'static str {
        "Docker"
    }
}
