//! Status command - compare running and latest versions

use crate::cli::args::{OutputFormat, StatusArgs};
use crate::error::UpdaterResult;
use crate::ui::{self, TaskSpinner, UiContext};
use crate::update::{UpdateOrchestrator, UpdateStatus};

/// Execute the status command
pub async fn execute(args: StatusArgs, orchestrator: &UpdateOrchestrator) -> UpdaterResult<()> {
    let ctx = UiContext::detect();

    if args.format == OutputFormat::Json {
        let status = orchestrator.status().await;
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Checking versions...");
    let status = orchestrator.status().await;
    spinner.clear();

    print_status(&ctx, &status);
    Ok(())
}

/// Print a status report in human-readable form
pub fn print_status(ctx: &UiContext, status: &UpdateStatus) {
    ui::section(ctx, "Companion");
    ui::key_value(ctx, "Current version", &status.current_version);
    ui::key_value_status(
        ctx,
        "Latest version",
        &status.latest_version,
        !status.update_available,
    );
    ui::key_value_status(
        ctx,
        "Container",
        &status.container_status,
        status.container_running,
    );
    ui::key_value(
        ctx,
        "Last checked",
        &status.checked_at.format("%H:%M:%S").to_string(),
    );

    if !status.update_available {
        ui::step_ok(ctx, "Up to date");
    } else if status.can_update {
        ui::step_warn_hint(ctx, "Update available", "Run: companion-updater update");
    } else {
        ui::step_warn(
            ctx,
            &format!(
                "Update available, cooldown: {}s",
                status.cooldown_remaining_secs
            ),
        );
    }
}
