//! Router seam.
//!
//! The shell only needs the current path and a way to navigate; route
//! matching is left to the page source.

/// Source of the current path.
pub trait Router {
    /// Current location path (e.g. `/installation`).
    fn current_path(&self) -> &str;

    /// Navigate to `href`.
    fn navigate(&mut self, href: &str);
}

/// In-memory router with a history stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryRouter {
    history: Vec<String>,
}

impl MemoryRouter {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: vec![initial.into()],
        }
    }

    /// Visited paths, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Router for MemoryRouter {
    fn current_path(&self) -> &str {
        self.history.last().map_or("/", String::as_str)
    }

    fn navigate(&mut self, href: &str) {
        // Re-selecting the current item does not grow the history
        if self.current_path() != href {
            self.history.push(href.to_owned());
        }
    }
}
