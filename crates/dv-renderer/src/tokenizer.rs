//! Snippet tokenization.
//!
//! A [`Tokenizer`] turns `(text, language tag)` into a lazy sequence of
//! [`Line`]s. Joining the token texts of every line and joining the lines
//! with `\n` always reproduces the input exactly; unknown languages fall back
//! to one unstyled token per line.
//!
//! Two implementations are provided:
//! - [`SyntectTokenizer`]: themed highlighting with the syntect default syntaxes
//! - [`PlainTokenizer`]: the unstyled fallback

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::language::Language;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Presentation attributes of a highlighted token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenStyle {
    /// Foreground color as RGB.
    pub foreground: (u8, u8, u8),
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl From<Style> for TokenStyle {
    fn from(style: Style) -> Self {
        Self {
            foreground: (style.foreground.r, style.foreground.g, style.foreground.b),
            bold: style.font_style.contains(FontStyle::BOLD),
            italic: style.font_style.contains(FontStyle::ITALIC),
            underline: style.font_style.contains(FontStyle::UNDERLINE),
        }
    }
}

/// A styled substring of a snippet line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// `None` for unstyled text.
    pub style: Option<TokenStyle>,
}

impl Token {
    /// Create an unstyled token.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }
}

/// One physical line of a snippet, without its line terminator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub tokens: Vec<Token>,
}

impl Line {
    /// Unstyled line: a single token, or no token for an empty line.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        let tokens = if text.is_empty() {
            Vec::new()
        } else {
            vec![Token::plain(text)]
        };
        Self { tokens }
    }

    /// Concatenated token text.
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Error returned when a tokenizer cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// Requested theme is not part of the default theme set.
    #[error("unknown highlighting theme: {name} (available: {})", .available.join(", "))]
    UnknownTheme { name: String, available: Vec<String> },
}

/// Maps snippet text to styled lines.
///
/// Implementations must be pure: the same input always yields the same
/// output, and every call returns a fresh iterator.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text` written in `language` (a free-form tag).
    fn tokenize<'a>(&'a self, text: &'a str, language: &str)
    -> Box<dyn Iterator<Item = Line> + 'a>;
}

/// Unstyled tokenizer: one token per non-empty line.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn tokenize<'a>(
        &'a self,
        text: &'a str,
        _language: &str,
    ) -> Box<dyn Iterator<Item = Line> + 'a> {
        Box::new(text.split('\n').map(Line::plain))
    }
}

/// Themed tokenizer backed by syntect.
pub struct SyntectTokenizer {
    theme: Theme,
}

impl SyntectTokenizer {
    /// Default theme name.
    pub const DEFAULT_THEME: &'static str = "base16-ocean.dark";

    /// Create a tokenizer using a theme from the syntect default theme set.
    ///
    /// # Errors
    ///
    /// Returns [`HighlightError::UnknownTheme`] if no theme has that name.
    pub fn new(theme_name: &str) -> Result<Self, HighlightError> {
        let theme = THEME_SET
            .themes
            .get(theme_name)
            .cloned()
            .ok_or_else(|| HighlightError::UnknownTheme {
                name: theme_name.to_owned(),
                available: Self::theme_names().map(str::to_owned).collect(),
            })?;
        Ok(Self { theme })
    }

    /// Names of the available themes.
    pub fn theme_names() -> impl Iterator<Item = &'static str> {
        THEME_SET.themes.keys().map(String::as_str)
    }
}

impl Tokenizer for SyntectTokenizer {
    fn tokenize<'a>(
        &'a self,
        text: &'a str,
        language: &str,
    ) -> Box<dyn Iterator<Item = Line> + 'a> {
        let language = Language::from_tag(language);
        let syntax = language
            .syntax_token()
            .and_then(|token| SYNTAX_SET.find_syntax_by_token(token));

        match syntax {
            Some(syntax) => Box::new(SyntectLines {
                lines: text.split('\n'),
                highlighter: HighlightLines::new(syntax, &self.theme),
                buf: String::new(),
            }),
            None => {
                tracing::debug!(language = %language.tag(), "No syntax found, rendering unstyled");
                PlainTokenizer.tokenize(text, language.tag())
            }
        }
    }
}

/// Line iterator carrying syntect parse state between lines.
struct SyntectLines<'a> {
    lines: std::str::Split<'a, char>,
    highlighter: HighlightLines<'a>,
    buf: String,
}

impl Iterator for SyntectLines<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let line = self.lines.next()?;

        // Newline syntaxes expect the terminator; it is stripped again below
        self.buf.clear();
        self.buf.push_str(line);
        self.buf.push('\n');

        let ranges = match self.highlighter.highlight_line(&self.buf, &SYNTAX_SET) {
            Ok(ranges) => ranges,
            Err(e) => {
                tracing::debug!(error = %e, "Highlighting failed, rendering line unstyled");
                return Some(Line::plain(line));
            }
        };

        let mut tokens: Vec<Token> = ranges
            .into_iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(style, text)| Token {
                text: text.to_owned(),
                style: Some(style.into()),
            })
            .collect();

        if let Some(last) = tokens.last_mut() {
            last.text.pop();
            if last.text.is_empty() {
                tokens.pop();
            }
        }

        Some(Line { tokens })
    }
}
