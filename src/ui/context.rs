//! Terminal detection for choosing between fancy and plain output

use std::io::IsTerminal;

/// Environment variables set by common CI systems
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// How the CLI talks to the person (or pipeline) running it
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    /// Approve confirmations without asking (`--yes`)
    auto_yes: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        let ttys = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
        Self {
            interactive: ttys && !Self::in_ci(|var| std::env::var_os(var).is_some()),
            auto_yes: false,
        }
    }

    /// Plain output, defaults for every prompt
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
        }
    }

    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Spinners, progress bars and cliclack framing
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    fn in_ci(is_set: impl Fn(&str) -> bool) -> bool {
        CI_VARS.iter().any(|var| is_set(var))
    }
}
