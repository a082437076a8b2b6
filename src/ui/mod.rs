//! Terminal output for the CLI
//!
//! Uses `cliclack` for framed output and prompts, `indicatif` for the
//! update stage bar, and falls back to plain prefixed lines when stdout
//! is not a terminal or a CI system is detected.
//!
//! ```rust,ignore
//! use companion_updater::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Checking versions...");
//! let status = orchestrator.status().await;
//! spinner.clear();
//!
//! if ui::confirm(&ctx, "Update Companion?", false).await? {
//!     // ...
//! }
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, note, outro_success, remark, section, step_error_detail,
    step_ok, step_ok_detail, step_warn, step_warn_hint,
};
pub use progress::{StageProgress, TaskSpinner};
pub use prompts::confirm;
pub use theme::{init_theme, CompanionTheme};
