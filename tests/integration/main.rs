//! Integration tests for companion-updater

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const OVERRIDE_VARS: &[&str] = &[
        "COMPANION_UPDATER_CONFIG",
        "COMPANION_DOCKER_PATH",
        "COMPANION_CONTAINER_NAME",
        "GITHUB_REPO",
        "GITHUB_API_BASE",
        "UPDATE_COOLDOWN",
        "GITHUB_CACHE_TTL",
    ];

    fn updater() -> Command {
        let mut cmd = cargo_bin_cmd!("companion-updater");
        for var in OVERRIDE_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Config pointing at an unreachable GitHub and the given docker binary
    fn write_config(dir: &Path, docker_bin: &str) -> PathBuf {
        let path = dir.join("config.toml");
        let content = format!(
            r#"
[container]
docker_bin = "{docker_bin}"
compose_dir = "{compose}"

[github]
api_base = "http://127.0.0.1:9"
timeout_secs = 2

[update]
settle_secs = 0
"#,
            compose = dir.display(),
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        updater()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("keep a Bitfocus Companion container current"));
    }

    #[test]
    fn version_displays() {
        updater()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("companion-updater"));
    }

    #[test]
    fn config_path_follows_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        updater()
            .arg("--config")
            .arg(&path)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_lists_sections() {
        let temp = TempDir::new().unwrap();

        updater()
            .arg("--config")
            .arg(temp.path().join("missing.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[container]"))
            .stdout(predicate::str::contains("bitfocus/companion"));
    }

    #[test]
    fn config_set_then_show() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        updater()
            .arg("--config")
            .arg(&path)
            .args(["config", "set", "update.cooldown_secs", "42"])
            .assert()
            .success();

        updater()
            .arg("--config")
            .arg(&path)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cooldown_secs = 42"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let temp = TempDir::new().unwrap();

        updater()
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn invalid_env_override_is_reported() {
        let temp = TempDir::new().unwrap();

        updater()
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .env("UPDATE_COOLDOWN", "soon")
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("UPDATE_COOLDOWN"));
    }

    #[test]
    fn status_degrades_without_docker_or_github() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "companion-updater-missing-docker");

        updater()
            .arg("--config")
            .arg(&config)
            .args(["status", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""current_version": "Unknown""#))
            .stdout(predicate::str::contains(r#""latest_version": "Unknown""#))
            .stdout(predicate::str::contains(r#""update_available": false"#));
    }

    #[test]
    fn release_reports_network_failure() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "docker");

        updater()
            .arg("--config")
            .arg(&config)
            .args(["release", "--format", "json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to connect to GitHub"));
    }

    #[test]
    fn update_without_newer_release_is_noop() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "companion-updater-missing-docker");

        updater()
            .arg("--config")
            .arg(&config)
            .args(["update", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No newer release found"));
    }

    #[cfg(unix)]
    #[test]
    fn forced_update_streams_pull_failure() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "false");

        let assert = updater()
            .arg("--config")
            .arg(&config)
            .args(["update", "--yes", "--force", "--format", "json"])
            .assert()
            .failure()
            .stdout(predicate::str::contains(r#""type":"progress""#))
            .stdout(predicate::str::contains("Starting update process..."))
            .stdout(predicate::str::contains(r#""type":"error""#))
            .stderr(predicate::str::contains("auto-approved"))
            .stderr(predicate::str::contains("Failed to pull image"));

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
        for line in stdout.lines() {
            assert!(
                serde_json::from_str::<serde_json::Value>(line).is_ok(),
                "non-JSON stdout line: {line:?}"
            );
        }
    }

    #[test]
    fn json_update_without_newer_release_keeps_stdout_empty() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "companion-updater-missing-docker");

        updater()
            .arg("--config")
            .arg(&config)
            .args(["update", "--yes", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("No newer release found"));
    }

    #[test]
    fn completions_generate() {
        updater()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("companion-updater"));
    }
}
