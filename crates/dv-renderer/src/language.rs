//! Language tags recognized by code blocks.
//!
//! Maps the free-form language tag of a snippet to a display label, an
//! icon and (when one exists) the syntect token used for highlighting.

use std::borrow::Cow;

/// Known snippet languages.
///
/// Unknown tags are kept verbatim in [`Language::Other`] and never cause an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Bash,
    TypeScript,
    JavaScript,
    Json,
    Yaml,
    Dockerfile,
    Rust,
    Python,
    Toml,
    Html,
    Css,
    Sql,
    Markdown,
    Env,
    Text,
    Other(String),
}

impl Language {
    /// Resolve a language tag (case-insensitive, surrounding whitespace ignored).
    ///
    /// An empty tag is treated as plain text.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        match tag.to_ascii_lowercase().as_str() {
            "bash" | "sh" | "shell" | "zsh" | "console" => Self::Bash,
            "typescript" | "ts" | "tsx" => Self::TypeScript,
            "javascript" | "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "dockerfile" | "docker" => Self::Dockerfile,
            "rust" | "rs" => Self::Rust,
            "python" | "py" => Self::Python,
            "toml" => Self::Toml,
            "html" | "htm" => Self::Html,
            "css" => Self::Css,
            "sql" => Self::Sql,
            "markdown" | "md" => Self::Markdown,
            "env" | "dotenv" => Self::Env,
            "" | "text" | "plaintext" | "txt" | "plain" => Self::Text,
            _ => Self::Other(tag.to_owned()),
        }
    }

    /// Human-readable label. Unknown tags display uppercased.
    #[must_use]
    pub fn label(&self) -> Cow<'_, str> {
        let label = match self {
            Self::Bash => "Bash",
            Self::TypeScript => "TypeScript",
            Self::JavaScript => "JavaScript",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Dockerfile => "Dockerfile",
            Self::Rust => "Rust",
            Self::Python => "Python",
            Self::Toml => "TOML",
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Sql => "SQL",
            Self::Markdown => "Markdown",
            Self::Env => "Environment",
            Self::Text => "Text",
            Self::Other(tag) => return Cow::Owned(tag.to_uppercase()),
        };
        Cow::Borrowed(label)
    }

    /// Symbolic icon name for the header indicator.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Bash | Self::Env => "terminal",
            Self::Dockerfile => "container",
            Self::Json | Self::Yaml | Self::Toml => "braces",
            Self::Markdown | Self::Text => "file-text",
            _ => "file-code",
        }
    }

    /// Canonical tag used for the `language-*` CSS class.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Bash => "bash",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Dockerfile => "dockerfile",
            Self::Rust => "rust",
            Self::Python => "python",
            Self::Toml => "toml",
            Self::Html => "html",
            Self::Css => "css",
            Self::Sql => "sql",
            Self::Markdown => "markdown",
            Self::Env => "env",
            Self::Text => "text",
            Self::Other(tag) => tag.as_str(),
        }
    }

    /// Token used to look up a syntect syntax.
    ///
    /// The default syntect syntax set has no TypeScript grammar, so
    /// TypeScript is highlighted with the JavaScript one. `None` means the
    /// snippet is always rendered unstyled.
    #[must_use]
    pub fn syntax_token(&self) -> Option<&str> {
        match self {
            Self::Bash | Self::Env => Some("bash"),
            Self::TypeScript | Self::JavaScript => Some("js"),
            Self::Json => Some("json"),
            Self::Yaml => Some("yaml"),
            Self::Rust => Some("rs"),
            Self::Python => Some("py"),
            Self::Html => Some("html"),
            Self::Css => Some("css"),
            Self::Sql => Some("sql"),
            Self::Markdown => Some("md"),
            Self::Dockerfile | Self::Toml | Self::Text => None,
            Self::Other(tag) => Some(tag.as_str()),
        }
    }

    /// Guess a language from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "mts" | "cts" => Self::TypeScript,
            "lock" => Self::Text,
            _ => Self::from_tag(ext),
        }
    }
}
