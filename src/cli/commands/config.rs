//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, ENV_OVERRIDES};
use crate::error::{UpdaterError, UpdaterResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "container.name",
    "container.compose_dir",
    "container.base_image",
    "container.version_label",
    "container.docker_bin",
    "github.repo",
    "github.api_base",
    "github.cache_ttl_secs",
    "github.timeout_secs",
    "update.cooldown_secs",
    "update.settle_secs",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    config: &Config,
) -> UpdaterResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, &key, &value).await?,
    }

    Ok(())
}

/// Print the effective config, noting which values came from the environment
fn show_config(config: &Config) -> UpdaterResult<()> {
    println!("{}", toml::to_string_pretty(config)?);

    let active: Vec<&str> = ENV_OVERRIDES
        .iter()
        .copied()
        .filter(|var| std::env::var_os(var).is_some())
        .collect();
    if !active.is_empty() {
        println!("# Overridden by environment: {}", active.join(", "));
    }

    Ok(())
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> UpdaterResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

/// Update one key in the file config (environment overrides are not saved)
async fn set_value(manager: &ConfigManager, key: &str, value: &str) -> UpdaterResult<()> {
    let ctx = UiContext::detect();
    let mut config = manager.load().await?;

    if let Err(e) = apply_value(&mut config, key, value) {
        ui::step_error_detail(&ctx, "Could not set value", &e.to_string());
        ui::remark(&ctx, "Valid keys:");
        for key in VALID_KEYS {
            eprintln!("  {}", key);
        }
        return Err(e);
    }

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Assign `value` to the dot-separated `key`
fn apply_value(config: &mut Config, key: &str, value: &str) -> UpdaterResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,

        ["container", "name"] => config.container.name = value.to_string(),
        ["container", "compose_dir"] => config.container.compose_dir = PathBuf::from(value),
        ["container", "base_image"] => config.container.base_image = value.to_string(),
        ["container", "version_label"] => config.container.version_label = value.to_string(),
        ["container", "docker_bin"] => config.container.docker_bin = value.to_string(),

        ["github", "repo"] => config.github.repo = value.to_string(),
        ["github", "api_base"] => config.github.api_base = value.to_string(),
        ["github", "cache_ttl_secs"] => config.github.cache_ttl_secs = parse_u64(value)?,
        ["github", "timeout_secs"] => config.github.timeout_secs = parse_u64(value)?,

        ["update", "cooldown_secs"] => config.update.cooldown_secs = parse_u64(value)?,
        ["update", "settle_secs"] => config.update.settle_secs = parse_u64(value)?,

        _ => return Err(UpdaterError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_log_format(value: &str) -> UpdaterResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(UpdaterError::User(format!(
            "Invalid log format: {}. Use text/json",
            value
        ))),
    }
}

fn parse_u64(value: &str) -> UpdaterResult<u64> {
    value
        .parse()
        .map_err(|_| UpdaterError::User(format!("Invalid number: {}", value)))
}
