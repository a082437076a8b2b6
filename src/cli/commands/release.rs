//! Release command - show the latest published release

use crate::cli::args::{OutputFormat, ReleaseArgs};
use crate::error::UpdaterResult;
use crate::ui::{self, TaskSpinner, UiContext};
use crate::update::UpdateOrchestrator;
use tracing::debug;

/// Execute the release command
pub async fn execute(args: ReleaseArgs, orchestrator: &UpdateOrchestrator) -> UpdaterResult<()> {
    let ctx = UiContext::detect();
    let releases = orchestrator.releases();
    debug!("Fetching release from {}", releases.source());

    if args.refresh {
        releases.invalidate().await;
    }

    if args.format == OutputFormat::Json {
        let release = releases.latest().await?;
        println!("{}", serde_json::to_string_pretty(&release)?);
        return Ok(());
    }

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Fetching latest release...");
    let release = match releases.latest().await {
        Ok(release) => {
            spinner.clear();
            release
        }
        Err(e) => {
            spinner.stop_error("Could not fetch latest release");
            return Err(e);
        }
    };

    ui::section(&ctx, &release.tag);
    if !release.title.is_empty() {
        ui::key_value(&ctx, "Title", &release.title);
    }
    if !release.published_at.is_empty() {
        ui::key_value(&ctx, "Published", &release.published_at);
    }
    if !release.url.is_empty() {
        ui::key_value(&ctx, "URL", &release.url);
    }
    if let Some(cached) = releases.peek().await {
        ui::key_value(
            &ctx,
            "Fetched",
            &format!("{}s ago", cached.fetched_at.elapsed().as_secs()),
        );
    }
    if !release.notes_excerpt.trim().is_empty() {
        ui::note(&ctx, "Release notes", release.notes_excerpt.trim());
    }

    Ok(())
}
