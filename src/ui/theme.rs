use crossterm::style::{Color, Stylize};

/// Design tokens for the ftpdeploy console.
///
/// Design constraints:
/// - Only 5 semantic colors (`colors::*`)
/// - All icons must be sourced from this module
pub mod colors {
    use super::Color;

    /// #22C55E
    pub const SUCCESS: Color = Color::Green;
    /// #EF4444
    pub const ERROR: Color = Color::Red;
    /// #F59E0B
    pub const WARNING: Color = Color::Yellow;
    /// #06B6D4
    pub const INFO: Color = Color::Cyan;
    /// #6B7280
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const ARROW: &str = "↳";
    pub const DEPLOY: &str = "📦";
    pub const REMOTE: &str = "📡";
    pub const IGNORED: &str = "○";
    pub const FINISHED: &str = "🎉";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const ARROW: &str = "[>]";
    pub const DEPLOY: &str = "[DEPLOY]";
    pub const REMOTE: &str = "[REMOTE]";
    pub const IGNORED: &str = "[ ]";
    pub const FINISHED: &str = "***";
}

/// Semantic icon names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Arrow,
    Deploy,
    Remote,
    Ignored,
    Finished,
}

/// Resolved rendering choices for one process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub color: bool,
    pub unicode: bool,
}

impl Theme {
    pub fn new(color: bool, unicode: bool) -> Self {
        Self { color, unicode }
    }

    /// No colors, ASCII icons
    #[cfg(test)]
    pub fn plain() -> Self {
        Self::new(false, false)
    }

    pub fn icon(&self, icon: Icon) -> &'static str {
        if self.unicode {
            match icon {
                Icon::Success => icons::SUCCESS,
                Icon::Error => icons::ERROR,
                Icon::Warning => icons::WARNING,
                Icon::Arrow => icons::ARROW,
                Icon::Deploy => icons::DEPLOY,
                Icon::Remote => icons::REMOTE,
                Icon::Ignored => icons::IGNORED,
                Icon::Finished => icons::FINISHED,
            }
        } else {
            match icon {
                Icon::Success => icons_ascii::SUCCESS,
                Icon::Error => icons_ascii::ERROR,
                Icon::Warning => icons_ascii::WARNING,
                Icon::Arrow => icons_ascii::ARROW,
                Icon::Deploy => icons_ascii::DEPLOY,
                Icon::Remote => icons_ascii::REMOTE,
                Icon::Ignored => icons_ascii::IGNORED,
                Icon::Finished => icons_ascii::FINISHED,
            }
        }
    }

    /// `text` in `color`, or unchanged when colors are off
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_fallback_icons() {
        let theme = Theme::plain();
        assert_eq!(theme.icon(Icon::Success), "[OK]");
        assert_eq!(theme.icon(Icon::Error), "[FAIL]");
        assert_eq!(theme.icon(Icon::Warning), "[WARN]");
    }

    #[test]
    fn paint_without_color_is_identity() {
        assert_eq!(Theme::plain().paint("x", colors::ERROR), "x");
        assert_ne!(Theme::new(true, true).paint("x", colors::ERROR), "x");
    }
}
