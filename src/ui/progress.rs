//! Progress indicators with CI fallback

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Longest command output line shown next to the stage bar
const MAX_LINE_CHARS: usize = 60;

const STAGE_TEMPLATE: &str =
    "  {spinner:.cyan} {prefix}  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}";

/// A task spinner with CI fallback
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            println!("{} {}", style("...").dim(), message);
        }
    }

    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else {
            println!("{} {}", style("[FAIL]").red(), message);
        }
    }

    /// Remove the spinner without leaving a line behind
    pub fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.clear();
        }
    }
}

/// Stage bar for an update run.
///
/// Interactive terminals get an indicatif bar whose message follows the
/// latest command output line; plain mode prints every line.
pub struct StageProgress {
    bar: Option<ProgressBar>,
    total: u64,
}

impl StageProgress {
    pub fn new(ctx: &UiContext, total: u64) -> Self {
        let bar = ctx.use_fancy_output().then(|| {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(STAGE_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                    .progress_chars("━╸─"),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        Self { bar, total }
    }

    /// A stage started; `position` is 1-based
    pub fn begin(&self, position: u64, headline: &str) {
        match self.bar {
            Some(ref bar) => {
                bar.set_position(position.saturating_sub(1));
                bar.set_prefix(headline.to_string());
                bar.set_message("");
            }
            None => println!(
                "  {} {}",
                style(format!("[{}/{}]", position, self.total)).cyan(),
                headline
            ),
        }
    }

    /// One line of command output
    pub fn on_line(&self, line: &str) {
        match self.bar {
            Some(ref bar) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    bar.set_message(truncate_line(trimmed));
                }
            }
            None => println!("{}", style(line).dim()),
        }
    }

    /// A status message kept above the bar
    pub fn println(&self, message: &str) {
        match self.bar {
            Some(ref bar) => bar.println(format!("  {} {}", style("✓").green(), message)),
            None => println!("  {} {}", style("[INFO]").cyan(), message),
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

fn truncate_line(line: &str) -> String {
    if line.chars().count() > MAX_LINE_CHARS {
        let head: String = line.chars().take(MAX_LINE_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}
