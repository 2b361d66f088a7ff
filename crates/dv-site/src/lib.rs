//! Documentation shell for dv.
//!
//! This crate provides:
//! - [`Navigation`]: ordered sections of navigation items
//! - [`DocSidebar`]: the navigation with the active item for a path
//! - [`DocLayout`]: header, responsive sidebar and content slot, with the
//!   mobile sidebar state machine and an optional [`VersionBadge`]
//! - [`Page`] implementations: [`MarkdownPage`] and [`StaticPage`], loaded
//!   per route by [`PageDirectory`]
//! - [`Router`] and [`ShellContext`]: the seams the shell is rendered through
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dv_site::{DocLayout, MemoryRouter, Navigation, PageDirectory, ShellContext};
//!
//! let layout = DocLayout::new("Nestify", Navigation::builtin(), Vec::new());
//! let router = MemoryRouter::new("/installation");
//! let ctx = ShellContext::plain();
//!
//! let page = PageDirectory::new("docs").load("/installation", &ctx)?;
//! let mut html = String::new();
//! layout.render(&router, page.as_ref(), &ctx, &mut html);
//! # Ok(())
//! # }
//! ```

mod layout;
mod markdown;
mod navigation;
mod page;
mod router;
mod sidebar;
mod theme;
mod version;

pub use layout::{DocLayout, HeaderLink, LayoutEvent, LinkIcon, SidebarVisibility};
pub use markdown::MarkdownPage;
pub use navigation::{NavIcon, NavItem, NavSection, Navigation, NavigationError};
pub use page::{Page, PageDirectory, PageError, StaticPage};
pub use router::{MemoryRouter, Router};
pub use sidebar::{DocSidebar, SidebarItem, SidebarSection, SidebarView};
pub use theme::{ParseThemeError, ShellContext, Theme};
pub use version::{
    RegistryVersionSource, VersionBadge, VersionError, VersionSource, VersionState,
};
