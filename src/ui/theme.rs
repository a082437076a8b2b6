//! cliclack theme used by interactive commands

use cliclack::ThemeState;
use console::Style;

/// Magenta framing, red only for errors
#[derive(Debug, Clone, Default)]
pub struct CompanionTheme;

impl CompanionTheme {
    fn color_for(state: &ThemeState, submitted: Style) -> Style {
        match state {
            ThemeState::Active => Style::new().magenta(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => submitted,
        }
    }
}

impl cliclack::Theme for CompanionTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        Self::color_for(state, Style::new().magenta().dim())
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        Self::color_for(state, Style::new().green())
    }
}

/// Install [`CompanionTheme`] for all prompts and log lines
pub fn init_theme() {
    cliclack::set_theme(CompanionTheme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cliclack::Theme;

    #[test]
    fn error_state_is_red() {
        let theme = CompanionTheme;
        let error = ThemeState::Error("bad".to_string());
        assert_eq!(theme.bar_color(&error), Style::new().red());
        assert_eq!(theme.state_symbol_color(&ThemeState::Submit), Style::new().green());
    }
}
