//! Companion updater CLI entry point

use clap::{CommandFactory, Parser};
use companion_updater::cli::{commands, Cli, Commands};
use companion_updater::config::{Config, ConfigManager};
use companion_updater::error::UpdaterResult;
use companion_updater::ui;
use companion_updater::update::UpdateOrchestrator;
use console::style;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> UpdaterResult<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "companion-updater",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load_merged().await?;

    init_logging(cli.verbose, &config);
    ui::init_theme();

    let orchestrator = Arc::new(UpdateOrchestrator::from_config(&config));
    info!(
        container = %config.container.name,
        compose_dir = %config.container.compose_dir.display(),
        runtime = orchestrator.runtime_name(),
        "Companion updater started"
    );

    match cli.command {
        Commands::Completions { .. } => Ok(()),
        Commands::Status(args) => commands::status(args, &orchestrator).await,
        Commands::Update(args) => commands::update(args, &orchestrator).await,
        Commands::Release(args) => commands::release(args, &orchestrator).await,
        Commands::Watch(args) => commands::watch(args, &orchestrator).await,
        Commands::Config(args) => commands::config(args, &config_manager, &config).await,
    }
}

/// 0 = warn (spinners only), 1 = info, 2+ = debug; `RUST_LOG` wins when set
fn init_logging(verbose: u8, config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("companion_updater=warn"),
        1 => EnvFilter::new("companion_updater=info"),
        _ => EnvFilter::new("companion_updater=debug"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
