//! Page contract and page sources.
//!
//! A [`Page`] is a self-contained unit rendered into the layout's content
//! slot. [`PageDirectory`] maps routes to markdown files on disk and falls
//! back to the not-found page for unknown routes.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use dv_renderer::{CodeBlock, escape_html};

use crate::markdown::MarkdownPage;
use crate::theme::ShellContext;

/// Error returned when a page source cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// I/O error reading a page file.
    #[error("Failed to read page {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renderable page.
pub trait Page: Send + Sync {
    /// Page title, if the page declares one.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Render the page body as HTML.
    fn render(&self, ctx: &ShellContext, out: &mut String);

    /// Code blocks embedded in the page, in document order.
    fn code_blocks(&self) -> &[CodeBlock] {
        &[]
    }

    /// Whether the page renders on its own, outside the layout shell.
    fn standalone(&self) -> bool {
        false
    }
}

/// Page backed by a fixed HTML fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticPage {
    title: Option<String>,
    html: String,
    standalone: bool,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            title: None,
            html: html.into(),
            standalone: false,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Render without the header and sidebar.
    #[must_use]
    pub fn without_shell(mut self) -> Self {
        self.standalone = true;
        self
    }

    /// Page shown for routes without content. It replaces the whole shell.
    pub fn not_found(path: &str) -> Self {
        let mut html = String::from(r#"<div class="not-found"><h1>404</h1>"#);
        write!(
            html,
            r#"<p>Oops! Page not found</p><p class="not-found-path"><code>{}</code></p><a href="/">Return to Home</a></div>"#,
            escape_html(path)
        )
        .unwrap();
        Self::new(html).with_title("Page not found").without_shell()
    }
}

impl Page for StaticPage {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn render(&self, _ctx: &ShellContext, out: &mut String) {
        out.push_str(&self.html);
    }

    fn standalone(&self) -> bool {
        self.standalone
    }
}

/// Directory of markdown pages, one file per route.
#[derive(Clone, Debug)]
pub struct PageDirectory {
    root: PathBuf,
}

impl PageDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Markdown file for a route: `/` maps to `index.md`, `/a/b` to `a/b.md`.
    ///
    /// Returns `None` for routes that cannot name a page (relative paths,
    /// empty or dot segments, trailing slashes).
    pub fn source_path(&self, route: &str) -> Option<PathBuf> {
        let route = route.strip_prefix('/')?;
        if route.is_empty() {
            return Some(self.root.join("index.md"));
        }
        let valid = route
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != ".." && !seg.contains('\\'));
        valid.then(|| self.root.join(format!("{route}.md")))
    }

    /// Load the page for `route`.
    ///
    /// Routes without a markdown file resolve to [`StaticPage::not_found`].
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Io`] if the page file exists but cannot be read.
    pub fn load(&self, route: &str, ctx: &ShellContext) -> Result<Box<dyn Page>, PageError> {
        let Some(path) = self.source_path(route) else {
            tracing::info!(route, "Route does not name a page");
            return Ok(Box::new(StaticPage::not_found(route)));
        };

        match std::fs::read_to_string(&path) {
            Ok(markdown) => {
                tracing::debug!(route, path = %path.display(), "Loaded page");
                Ok(Box::new(MarkdownPage::parse(&markdown, ctx)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(route, path = %path.display(), "No page for route");
                Ok(Box::new(StaticPage::not_found(route)))
            }
            Err(source) => Err(PageError::Io { path, source }),
        }
    }
}
