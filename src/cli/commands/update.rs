//! Update command - run the update pipeline with live progress

use crate::cli::args::{OutputFormat, UpdateArgs};
use crate::error::{UpdaterError, UpdaterResult};
use crate::ui::{self, StageProgress, UiContext};
use crate::update::{
    EventKind, ProgressEvent, Stage, UpdateOrchestrator, UpdateOutcome, UpdateStream,
};
use std::sync::Arc;

/// Execute the update command
///
/// With `--format json` stdout carries only event objects; other messages go
/// to stderr.
pub async fn execute(
    args: UpdateArgs,
    orchestrator: &Arc<UpdateOrchestrator>,
) -> UpdaterResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let json = args.format == OutputFormat::Json;

    let prompt = if args.force {
        "Rebuild and restart Companion now?".to_string()
    } else {
        let status = orchestrator.status().await;
        if !status.update_available {
            let message = format!(
                "No newer release found (running {}, latest {})",
                status.current_version, status.latest_version
            );
            if json {
                eprintln!("{}", message);
            } else {
                ui::step_ok(&ctx, &message);
            }
            return Ok(());
        }
        format!(
            "Update Companion from {} to {}?",
            status.current_version, status.latest_version
        )
    };

    if !ui::confirm(&ctx, &prompt, false).await? {
        if json {
            eprintln!("Update cancelled");
        } else {
            ui::remark(&ctx, "Update cancelled");
        }
        return Ok(());
    }

    let outcome = render_stream(&ctx, orchestrator.start_update(), args.format).await?;

    if outcome.success {
        Ok(())
    } else {
        Err(UpdaterError::User(outcome.message))
    }
}

/// Print events as they arrive and return the run's outcome.
///
/// In text mode the `error` event is left to the caller, which reports it
/// as the command's error.
pub async fn render_stream(
    ctx: &UiContext,
    stream: UpdateStream,
    format: OutputFormat,
) -> UpdaterResult<UpdateOutcome> {
    let mut stream = stream;
    let mut last = None;
    let progress = (format == OutputFormat::Text)
        .then(|| StageProgress::new(ctx, Stage::ALL.len() as u64));

    while let Some(event) = stream.next().await {
        match progress {
            Some(ref progress) => print_event(ctx, progress, &event),
            None => println!("{}", serde_json::to_string(&event)?),
        }
        last = Some(event);
    }

    if let Some(ref progress) = progress {
        progress.finish();
    }

    Ok(UpdateOutcome::from_terminal(last))
}

fn print_event(ctx: &UiContext, progress: &StageProgress, event: &ProgressEvent) {
    match event.kind {
        EventKind::Progress if event.message.starts_with(' ') => progress.on_line(&event.message),
        EventKind::Progress => match Stage::from_headline(&event.message) {
            Some(stage) => progress.begin(stage.position(), &event.message),
            None => progress.println(&event.message),
        },
        EventKind::Complete => {
            progress.finish();
            ui::outro_success(ctx, &event.message);
        }
        EventKind::Error => progress.finish(),
    }
}
