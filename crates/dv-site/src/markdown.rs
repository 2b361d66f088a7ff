//! Markdown pages.
//!
//! Prose is converted with pulldown-cmark; every fenced code block becomes a
//! [`CodeBlock`] with its own copy control. Fence info strings accept:
//!
//! ```text
//! ```yaml title="docker-compose.yml" {2,5-7} showLineNumbers nocopy noheader
//! ```
//!
//! The first H1 heading is used as the page title.

use std::collections::BTreeSet;
use std::sync::Arc;

use dv_renderer::{CodeBlock, CodeSnippet, parse_line_spec};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::page::Page;
use crate::theme::ShellContext;

enum Segment {
    Html(String),
    /// Index into the page's code blocks.
    Code(usize),
}

/// Page rendered from markdown source.
pub struct MarkdownPage {
    title: Option<String>,
    segments: Vec<Segment>,
    blocks: Vec<CodeBlock>,
}

impl MarkdownPage {
    /// Parse markdown into prose fragments and code blocks.
    ///
    /// Code blocks write to the context's clipboard and use its copy reset
    /// delay.
    pub fn parse(markdown: &str, ctx: &ShellContext) -> Self {
        let mut segments = Vec::new();
        let mut blocks = Vec::new();
        let mut pending: Vec<Event<'_>> = Vec::new();
        let mut code: Option<(FenceInfo, String)> = None;
        let mut title = TitleCapture::default();

        for event in Parser::new_ext(markdown, parser_options()) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let fence = match kind {
                        CodeBlockKind::Fenced(info) => FenceInfo::parse(&info),
                        CodeBlockKind::Indented => FenceInfo::parse(""),
                    };
                    flush_html(&mut pending, &mut segments);
                    code = Some((fence, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((fence, text)) = code.take() {
                        let block = CodeBlock::new(fence.into_snippet(text), Arc::clone(&ctx.clipboard))
                            .with_reset_after(ctx.copy_reset_after);
                        segments.push(Segment::Code(blocks.len()));
                        blocks.push(block);
                    }
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, buf)) = code.as_mut() {
                        buf.push_str(&text);
                    }
                }
                event => {
                    title.observe(&event);
                    pending.push(event);
                }
            }
        }
        flush_html(&mut pending, &mut segments);

        Self {
            title: title.finish(),
            segments,
            blocks,
        }
    }
}

impl Page for MarkdownPage {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn render(&self, ctx: &ShellContext, out: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Html(html) => out.push_str(html),
                Segment::Code(index) => self.blocks[*index].render(ctx.tokenizer.as_ref(), out),
            }
        }
    }

    fn code_blocks(&self) -> &[CodeBlock] {
        &self.blocks
    }
}

impl std::fmt::Debug for MarkdownPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownPage")
            .field("title", &self.title)
            .field("blocks", &self.blocks.len())
            .finish_non_exhaustive()
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

fn flush_html(pending: &mut Vec<Event<'_>>, segments: &mut Vec<Segment>) {
    if pending.is_empty() {
        return;
    }
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, pending.drain(..));
    segments.push(Segment::Html(html));
}

/// Collects the text of the first H1 heading.
#[derive(Default)]
struct TitleCapture {
    buf: Option<String>,
    title: Option<String>,
}

impl TitleCapture {
    fn observe(&mut self, event: &Event<'_>) {
        if self.title.is_some() {
            return;
        }
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => self.buf = Some(String::new()),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                self.title = self.buf.take().map(|t| t.trim().to_owned());
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(buf) = self.buf.as_mut() {
                    buf.push_str(text);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Option<String> {
        self.title.filter(|t| !t.is_empty())
    }
}

/// Options parsed from a fence info string.
#[derive(Debug, PartialEq, Eq)]
struct FenceInfo {
    language: String,
    title: Option<String>,
    highlighted: BTreeSet<usize>,
    line_numbers: bool,
    copy: bool,
    header: bool,
}

impl FenceInfo {
    fn parse(info: &str) -> Self {
        let mut fence = Self {
            language: String::new(),
            title: None,
            highlighted: BTreeSet::new(),
            line_numbers: false,
            copy: true,
            header: true,
        };

        let words = split_fence_words(info);
        for (i, word) in words.iter().map(String::as_str).enumerate() {
            if let Some((key, value)) = word.split_once('=') {
                match key {
                    "title" => fence.title = Some(value.to_owned()),
                    "highlight" => fence.highlighted.extend(parse_line_spec(value)),
                    _ => tracing::debug!(key, "Ignoring unknown fence attribute"),
                }
                continue;
            }
            match word {
                "showLineNumbers" | "lineNumbers" => fence.line_numbers = true,
                "nocopy" => fence.copy = false,
                "noheader" => fence.header = false,
                _ if word.starts_with('{') => fence.highlighted.extend(parse_line_spec(word)),
                // `ts{1,3}` carries the highlight spec on the language
                _ if i == 0 => match word.split_once('{') {
                    Some((language, spec)) => {
                        fence.language = language.to_owned();
                        fence.highlighted.extend(parse_line_spec(spec));
                    }
                    None => fence.language = word.to_owned(),
                },
                _ => tracing::debug!(flag = word, "Ignoring unknown fence flag"),
            }
        }

        fence
    }

    fn into_snippet(self, mut text: String) -> CodeSnippet {
        if text.ends_with('\n') {
            text.pop();
        }
        let mut snippet = CodeSnippet::new(text, self.language)
            .with_line_numbers(self.line_numbers || !self.highlighted.is_empty())
            .with_highlighted_lines(self.highlighted)
            .with_copy(self.copy)
            .with_header(self.header);
        snippet.title = self.title;
        snippet
    }
}

/// Split on whitespace, keeping quoted runs together and dropping the quotes.
fn split_fence_words(info: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote = None;

    for c in info.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}
