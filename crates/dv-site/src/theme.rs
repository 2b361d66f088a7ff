//! Theme preference and shared shell context.

use std::fmt::{self, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use dv_renderer::{
    Clipboard, DEFAULT_RESET_AFTER, MemoryClipboard, PlainTokenizer, Tokenizer, write_icon,
};

/// Color scheme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
    /// Follow the host preference.
    #[default]
    System,
}

impl Theme {
    /// Next theme for the header toggle. `System` resolves to dark first.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light | Self::System => Self::Dark,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub(crate) fn write_toggle(self, out: &mut String) {
        write!(
            out,
            r#"<button type="button" class="theme-toggle" data-action="toggle-theme" data-theme="{self}" aria-label="Toggle theme">"#
        )
        .unwrap();
        write_icon("sun", out);
        write_icon("moon", out);
        out.push_str("</button>");
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognized theme name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown theme: {0} (expected light, dark or system)")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(ParseThemeError(s.to_owned())),
        }
    }
}

/// Context shared by every component of one shell, created at the root and
/// passed down explicitly.
#[derive(Clone)]
pub struct ShellContext {
    pub theme: Theme,
    pub tokenizer: Arc<dyn Tokenizer>,
    pub clipboard: Arc<dyn Clipboard>,
    /// Revert delay for code block copy controls.
    pub copy_reset_after: Duration,
}

impl ShellContext {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            theme: Theme::default(),
            tokenizer,
            clipboard,
            copy_reset_after: DEFAULT_RESET_AFTER,
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_copy_reset_after(mut self, reset_after: Duration) -> Self {
        self.copy_reset_after = reset_after;
        self
    }

    /// Unstyled context writing to an in-memory clipboard.
    pub fn plain() -> Self {
        Self::new(
            Arc::new(PlainTokenizer),
            Arc::new(MemoryClipboard::new()),
        )
    }
}

impl fmt::Debug for ShellContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellContext")
            .field("theme", &self.theme)
            .field("copy_reset_after", &self.copy_reset_after)
            .finish_non_exhaustive()
    }
}
