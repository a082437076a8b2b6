//! Watch command - periodic update checks in one long-lived process

use crate::cli::args::{OutputFormat, WatchArgs};
use crate::cli::commands::{status::print_status, update::render_stream};
use crate::error::UpdaterResult;
use crate::ui::{self, UiContext};
use crate::update::{UpdateOrchestrator, UpdateStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// What a watch tick should do with a fresh status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickAction {
    Idle,
    Report,
    Update,
}

fn decide(status: &UpdateStatus, auto_update: bool) -> TickAction {
    match (status.update_available, status.can_update, auto_update) {
        (false, _, _) => TickAction::Idle,
        (true, true, true) => TickAction::Update,
        (true, _, _) => TickAction::Report,
    }
}

/// Execute the watch command
pub async fn execute(
    args: WatchArgs,
    orchestrator: &Arc<UpdateOrchestrator>,
) -> UpdaterResult<()> {
    let ctx = UiContext::detect();
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    ui::intro(&ctx, "Watching for Companion updates");
    info!(
        "Checking every {}s (auto-update: {})",
        args.interval, args.auto_update
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                ui::remark(&ctx, "Stopped watching");
                return Ok(());
            }
        }

        let status = orchestrator.status().await;
        match decide(&status, args.auto_update) {
            TickAction::Idle => {}
            TickAction::Report => print_status(&ctx, &status),
            TickAction::Update => {
                print_status(&ctx, &status);
                let outcome =
                    render_stream(&ctx, orchestrator.start_update(), OutputFormat::Text).await?;
                if !outcome.success {
                    warn!("Automatic update failed: {}", outcome.message);
                    ui::step_error_detail(&ctx, "Update failed", &outcome.message);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::ContainerStatus;
    use crate::update::GateSnapshot;

    fn status(current: &str, latest: &str, can_attempt: bool) -> UpdateStatus {
        UpdateStatus::assemble(
            Some(current),
            Some(latest),
            &ContainerStatus::from_state("running"),
            GateSnapshot {
                running: false,
                can_attempt,
                remaining_secs: if can_attempt { 0 } else { 120 },
            },
        )
    }

    #[test]
    fn up_to_date_is_idle() {
        assert_eq!(decide(&status("4.2.4", "4.2.4", true), true), TickAction::Idle);
    }

    #[test]
    fn available_update_applies_only_when_enabled() {
        assert_eq!(decide(&status("4.2.3", "4.2.4", true), true), TickAction::Update);
        assert_eq!(decide(&status("4.2.3", "4.2.4", true), false), TickAction::Report);
    }

    #[test]
    fn cooldown_defers_auto_update() {
        assert_eq!(decide(&status("4.2.3", "4.2.4", false), true), TickAction::Report);
    }
}
