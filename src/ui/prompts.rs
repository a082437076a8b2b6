//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{UpdaterError, UpdaterResult};

/// Ask a yes/no question.
///
/// `--yes` approves without asking; without a terminal the default wins.
/// Prompt text goes to stderr.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> UpdaterResult<bool> {
    if ctx.auto_yes() {
        eprintln!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on stdin
    let message = message.to_string();
    tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| UpdaterError::Internal(format!("Prompt task failed: {}", e)))?
    .map_err(|e| UpdaterError::User(format!("Prompt failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_auto_yes() {
        let ctx = UiContext::non_interactive().with_auto_yes(true);
        assert!(confirm(&ctx, "Update Companion?", false).await.unwrap());
    }

    #[tokio::test]
    async fn confirm_non_interactive_default() {
        let ctx = UiContext::non_interactive();
        assert!(confirm(&ctx, "Update Companion?", true).await.unwrap());
        assert!(!confirm(&ctx, "Update Companion?", false).await.unwrap());
    }
}
