//! Code block rendering.
//!
//! A [`CodeBlock`] pairs an immutable [`CodeSnippet`] with its own
//! [`CopyController`]. [`CodeBlock::view`] tokenizes the snippet into a
//! [`CodeBlockView`], which serializes to an HTML fragment:
//!
//! ```html
//! <div class="code-block" data-language="bash">
//!   <div class="code-header">…label, title, copy button…</div>
//!   <pre class="code-body"><code class="language-bash">…</code></pre>
//! </div>
//! ```
//!
//! With line numbers enabled every physical line becomes a
//! `<span class="code-line">` row carrying a gutter number; rows listed in
//! the snippet's highlighted lines get an extra `highlighted` class.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::copy::{Clipboard, CopyController, CopyPhase};
use crate::html::{escape_html, write_icon};
use crate::language::Language;
use crate::tokenizer::{Token, TokenStyle, Tokenizer};

/// Source text plus presentation options for one code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeSnippet {
    pub text: String,
    pub language: String,
    pub title: Option<String>,
    pub show_line_numbers: bool,
    /// 1-indexed line numbers. Out-of-range entries are ignored.
    pub highlighted_lines: BTreeSet<usize>,
    pub show_copy: bool,
    /// When false the copy control floats over the code instead.
    pub show_header: bool,
}

impl CodeSnippet {
    /// Snippet with default options: header and copy control shown, no line
    /// numbers, nothing highlighted.
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            title: None,
            show_line_numbers: false,
            highlighted_lines: BTreeSet::new(),
            show_copy: true,
            show_header: true,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }

    #[must_use]
    pub fn with_highlighted_lines(mut self, lines: impl IntoIterator<Item = usize>) -> Self {
        self.highlighted_lines = lines.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_copy(mut self, show: bool) -> Self {
        self.show_copy = show;
        self
    }

    #[must_use]
    pub fn with_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }
}

/// Longest range accepted by [`parse_line_spec`].
const MAX_LINE_RANGE: usize = 10_000;

/// Parse a highlighted-lines spec such as `{2,5-7}` (braces optional).
///
/// Ranges are inclusive. Malformed parts and reversed or oversized ranges are
/// skipped.
pub fn parse_line_spec(spec: &str) -> BTreeSet<usize> {
    let spec = spec.trim().trim_start_matches('{').trim_end_matches('}');
    let mut lines = BTreeSet::new();

    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let range: Option<(usize, usize)> = match part.split_once('-') {
            Some((start, end)) => start.trim().parse().ok().zip(end.trim().parse().ok()),
            None => part.parse().ok().map(|n| (n, n)),
        };
        match range {
            Some((start, end)) if start <= end && end - start < MAX_LINE_RANGE => {
                lines.extend(start..=end);
            }
            _ => tracing::debug!(part, "Ignoring invalid highlighted line spec"),
        }
    }

    lines
}

/// One numbered row of a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeRow {
    /// 1-indexed line number.
    pub number: usize,
    pub highlighted: bool,
    pub tokens: Vec<Token>,
}

/// Body of a rendered code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeBody {
    /// Flattened token stream with newline tokens between lines.
    Stream(Vec<Token>),
    /// One row per physical line, with gutter numbers.
    Rows(Vec<CodeRow>),
}

/// Computed view of a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlockView {
    pub language: Language,
    pub title: Option<String>,
    /// `None` when the copy control is hidden.
    pub copy: Option<CopyPhase>,
    pub show_header: bool,
    pub body: CodeBody,
}

impl CodeBlockView {
    /// Build the view for `snippet` with the copy control in `phase`.
    pub fn build(snippet: &CodeSnippet, phase: CopyPhase, tokenizer: &dyn Tokenizer) -> Self {
        let lines = tokenizer.tokenize(&snippet.text, &snippet.language);

        let body = if snippet.show_line_numbers {
            let rows = lines
                .enumerate()
                .map(|(i, line)| {
                    let number = i + 1;
                    CodeRow {
                        number,
                        highlighted: snippet.highlighted_lines.contains(&number),
                        tokens: line.tokens,
                    }
                })
                .collect();
            CodeBody::Rows(rows)
        } else {
            let mut tokens = Vec::new();
            for (i, line) in lines.enumerate() {
                if i > 0 {
                    tokens.push(Token::plain("\n"));
                }
                tokens.extend(line.tokens);
            }
            CodeBody::Stream(tokens)
        };

        Self {
            language: Language::from_tag(&snippet.language),
            title: snippet.title.clone(),
            copy: snippet.show_copy.then_some(phase),
            show_header: snippet.show_header,
            body,
        }
    }

    /// Reconstructed source text.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.body {
            CodeBody::Stream(tokens) => tokens.iter().map(|t| t.text.as_str()).collect(),
            CodeBody::Rows(rows) => rows
                .iter()
                .map(|row| row.tokens.iter().map(|t| t.text.as_str()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Line numbers rendered with the highlighted class.
    #[must_use]
    pub fn highlighted_rows(&self) -> Vec<usize> {
        match &self.body {
            CodeBody::Stream(_) => Vec::new(),
            CodeBody::Rows(rows) => rows
                .iter()
                .filter(|row| row.highlighted)
                .map(|row| row.number)
                .collect(),
        }
    }

    /// Serialize to an HTML fragment.
    pub fn write_html(&self, out: &mut String) {
        let tag = escape_html(self.language.tag());
        write!(out, r#"<div class="code-block" data-language="{tag}">"#).unwrap();

        if self.show_header {
            self.write_header(out);
        } else if let Some(phase) = self.copy {
            write_copy_button(phase, "code-copy floating", out);
        }

        write!(
            out,
            r#"<pre class="code-body"><code class="language-{tag}">"#
        )
        .unwrap();
        match &self.body {
            CodeBody::Stream(tokens) => write_tokens(tokens, out),
            CodeBody::Rows(rows) => {
                for row in rows {
                    write_row(row, out);
                }
            }
        }
        out.push_str("</code></pre></div>");
    }

    fn write_header(&self, out: &mut String) {
        out.push_str(r#"<div class="code-header"><span class="code-language">"#);
        write_icon(self.language.icon(), out);
        write!(
            out,
            r#"<span class="code-language-label">{}</span></span>"#,
            escape_html(&self.language.label())
        )
        .unwrap();
        if let Some(title) = &self.title {
            write!(
                out,
                r#"<span class="code-title">{}</span>"#,
                escape_html(title)
            )
            .unwrap();
        }
        if let Some(phase) = self.copy {
            write_copy_button(phase, "code-copy", out);
        }
        out.push_str("</div>");
    }
}

fn write_copy_button(phase: CopyPhase, class: &str, out: &mut String) {
    write!(
        out,
        r#"<button type="button" class="{class}" data-action="copy" data-state="{}" title="Copy to clipboard" aria-label="Copy to clipboard">"#,
        phase.as_str()
    )
    .unwrap();
    write_icon(phase.icon(), out);
    write!(
        out,
        r#"<span class="code-copy-label">{}</span></button>"#,
        phase.label()
    )
    .unwrap();
}

fn write_row(row: &CodeRow, out: &mut String) {
    let class = if row.highlighted {
        "code-line highlighted"
    } else {
        "code-line"
    };
    write!(
        out,
        r#"<span class="{class}" data-line="{n}"><span class="line-number" aria-hidden="true">{n}</span><span class="line-content">"#,
        n = row.number
    )
    .unwrap();
    write_tokens(&row.tokens, out);
    out.push_str("</span></span>\n");
}

fn write_tokens(tokens: &[Token], out: &mut String) {
    for token in tokens {
        let text = escape_html(&token.text);
        match token.style {
            Some(style) => {
                out.push_str(r#"<span style=""#);
                write_style(style, out);
                write!(out, r#"">{text}</span>"#).unwrap();
            }
            None => out.push_str(&text),
        }
    }
}

fn write_style(style: TokenStyle, out: &mut String) {
    let (r, g, b) = style.foreground;
    write!(out, "color:#{r:02x}{g:02x}{b:02x}").unwrap();
    if style.bold {
        out.push_str(";font-weight:bold");
    }
    if style.italic {
        out.push_str(";font-style:italic");
    }
    if style.underline {
        out.push_str(";text-decoration:underline");
    }
}

/// A code snippet with its copy control.
///
/// Each block owns its copy state; blocks never share state with each other.
#[derive(Debug)]
pub struct CodeBlock {
    snippet: CodeSnippet,
    copy: CopyController,
}

impl CodeBlock {
    pub fn new(snippet: CodeSnippet, clipboard: Arc<dyn Clipboard>) -> Self {
        let copy = CopyController::new(snippet.text.as_str(), clipboard);
        Self { snippet, copy }
    }

    /// Override the copy revert delay.
    #[must_use]
    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.copy = self.copy.with_reset_after(reset_after);
        self
    }

    pub fn snippet(&self) -> &CodeSnippet {
        &self.snippet
    }

    /// Copy the raw snippet text. See [`CopyController::copy`].
    pub async fn copy(&self) -> CopyPhase {
        self.copy.copy().await
    }

    pub fn copy_phase(&self) -> CopyPhase {
        self.copy.phase()
    }

    pub fn view(&self, tokenizer: &dyn Tokenizer) -> CodeBlockView {
        CodeBlockView::build(&self.snippet, self.copy.phase(), tokenizer)
    }

    /// Render the current view as HTML.
    pub fn render(&self, tokenizer: &dyn Tokenizer, out: &mut String) {
        self.view(tokenizer).write_html(out);
    }
}
