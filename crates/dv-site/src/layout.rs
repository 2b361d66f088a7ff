//! Documentation page shell.
//!
//! [`DocLayout`] renders the sticky header, the sidebar and the content slot
//! around one page. On narrow viewports the sidebar is a modal toggled from
//! the header; its visibility is the only state the layout owns besides the
//! optional version badge.
//!
//! The sidebar is rendered twice: the always-present responsive instance, and
//! while open, a modal instance behind a backdrop that closes it on click.

use std::fmt::Write;
use std::sync::Arc;

use dv_config::{Config, LinkConfig};
use dv_renderer::{escape_html, write_icon};

use crate::navigation::{Navigation, NavigationError};
use crate::page::Page;
use crate::router::Router;
use crate::sidebar::DocSidebar;
use crate::theme::ShellContext;
use crate::version::{VersionBadge, VersionSource};

/// Mobile sidebar visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SidebarVisibility {
    #[default]
    Closed,
    Open,
}

impl SidebarVisibility {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }
}

/// User interaction with the shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutEvent {
    /// Header menu button.
    ToggleMenu,
    /// Click on the modal backdrop.
    BackdropClick,
    /// Click on a sidebar item.
    SelectItem(String),
    /// Header theme button.
    ToggleTheme,
}

/// Icon of an external header link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkIcon {
    Github,
    Npm,
    External,
}

impl LinkIcon {
    /// Resolve an icon name. Unknown names use the generic external icon.
    pub fn from_name(name: &str) -> Self {
        match name {
            "github" => Self::Github,
            "npm" => Self::Npm,
            _ => Self::External,
        }
    }

    fn sprite_name(self) -> &'static str {
        match self {
            Self::Github => "github",
            // The npm link uses the generic external-link glyph
            Self::Npm | Self::External => "external-link",
        }
    }
}

/// External link in the header navigation cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderLink {
    pub label: String,
    pub href: String,
    pub icon: LinkIcon,
}

impl From<&LinkConfig> for HeaderLink {
    fn from(link: &LinkConfig) -> Self {
        Self {
            label: link.label.clone(),
            href: link.href.clone(),
            icon: LinkIcon::from_name(&link.icon),
        }
    }
}

/// Page shell: header, sidebar and content slot.
#[derive(Debug)]
pub struct DocLayout {
    brand: String,
    navigation: Navigation,
    links: Vec<HeaderLink>,
    sidebar: SidebarVisibility,
    version: Option<VersionBadge>,
}

impl DocLayout {
    pub fn new(brand: impl Into<String>, navigation: Navigation, links: Vec<HeaderLink>) -> Self {
        Self {
            brand: brand.into(),
            navigation,
            links,
            sidebar: SidebarVisibility::Closed,
            version: None,
        }
    }

    /// Build the layout from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured navigation is invalid.
    pub fn from_config(config: &Config) -> Result<Self, NavigationError> {
        let navigation = Navigation::from_config(config.navigation.as_deref())?;
        let links = config.links.iter().map(HeaderLink::from).collect();
        Ok(Self::new(&config.site_resolved.brand, navigation, links))
    }

    /// Start the best-effort version fetch. Must be called within a tokio
    /// runtime; the fetch is aborted when the layout is dropped.
    #[must_use]
    pub fn with_version_source(mut self, source: Arc<dyn VersionSource>) -> Self {
        self.version = Some(VersionBadge::spawn(source));
        self
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn sidebar(&self) -> SidebarVisibility {
        self.sidebar
    }

    pub fn version_badge(&self) -> Option<&VersionBadge> {
        self.version.as_ref()
    }

    pub fn version_badge_mut(&mut self) -> Option<&mut VersionBadge> {
        self.version.as_mut()
    }

    /// Apply a user event.
    ///
    /// Theme changes are written to `ctx`, which every later render reads.
    pub fn handle(&mut self, event: LayoutEvent, router: &mut dyn Router, ctx: &mut ShellContext) {
        match event {
            LayoutEvent::ToggleMenu => self.sidebar = self.sidebar.toggled(),
            LayoutEvent::BackdropClick => self.sidebar = SidebarVisibility::Closed,
            LayoutEvent::SelectItem(href) => {
                self.sidebar = SidebarVisibility::Closed;
                router.navigate(&href);
            }
            LayoutEvent::ToggleTheme => ctx.theme = ctx.theme.toggled(),
        }
        tracing::debug!(
            sidebar = self.sidebar.as_str(),
            theme = ctx.theme.as_str(),
            path = router.current_path(),
            "Layout event handled"
        );
    }

    /// Render the shell around `page` for the router's current path.
    ///
    /// Standalone pages (such as the not-found page) are rendered bare.
    pub fn render(&self, router: &dyn Router, page: &dyn Page, ctx: &ShellContext, out: &mut String) {
        if page.standalone() {
            page.render(ctx, out);
            return;
        }

        let current_path = router.current_path();
        let sidebar = DocSidebar::new(&self.navigation).view(current_path);

        write!(
            out,
            r#"<div class="doc-layout" data-theme="{}" data-sidebar="{}">"#,
            ctx.theme,
            self.sidebar.as_str()
        )
        .unwrap();

        self.write_header(ctx, out);

        out.push_str(r#"<div class="layout-body"><aside class="sidebar">"#);
        sidebar.write_html(out);
        out.push_str("</aside>");

        if self.sidebar.is_open() {
            out.push_str(r#"<div class="sidebar-backdrop" data-action="close-sidebar"></div>"#);
            out.push_str(
                r#"<aside id="mobile-sidebar" class="sidebar-modal" role="dialog" aria-modal="true">"#,
            );
            sidebar.write_html(out);
            out.push_str("</aside>");
        }

        out.push_str(r#"<main class="content"><div class="content-inner">"#);
        page.render(ctx, out);
        out.push_str("</div></main></div></div>");
    }

    /// Render a complete HTML document.
    pub fn render_document(
        &self,
        router: &dyn Router,
        page: &dyn Page,
        ctx: &ShellContext,
        out: &mut String,
    ) {
        let title = match page.title() {
            Some(title) => format!("{title} - {}", self.brand),
            None => self.brand.clone(),
        };
        write!(
            out,
            r#"<!DOCTYPE html><html lang="en" data-theme="{}"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{}</title></head><body>"#,
            ctx.theme,
            escape_html(&title)
        )
        .unwrap();
        self.render(router, page, ctx, out);
        out.push_str("</body></html>\n");
    }

    fn write_header(&self, ctx: &ShellContext, out: &mut String) {
        let (menu_icon, menu_label) = if self.sidebar.is_open() {
            ("x", "Close menu")
        } else {
            ("menu", "Open menu")
        };

        out.push_str(r#"<header class="site-header">"#);
        write!(
            out,
            r#"<button type="button" class="menu-toggle" data-action="toggle-menu" aria-controls="mobile-sidebar" aria-expanded="{}" aria-label="{menu_label}">"#,
            self.sidebar.is_open()
        )
        .unwrap();
        write_icon(menu_icon, out);
        out.push_str("</button>");

        write!(
            out,
            r#"<a class="brand" href="/">{}</a>"#,
            escape_html(&self.brand)
        )
        .unwrap();

        if let Some(version) = self.version.as_ref().and_then(VersionBadge::version) {
            write!(
                out,
                r#"<span class="version-badge">v{}</span>"#,
                escape_html(&version)
            )
            .unwrap();
        }

        out.push_str(r#"<nav class="header-links">"#);
        ctx.theme.write_toggle(out);
        for link in &self.links {
            write!(
                out,
                r#"<a class="header-link" href="{}" target="_blank" rel="noopener noreferrer">"#,
                escape_html(&link.href)
            )
            .unwrap();
            write_icon(link.icon.sprite_name(), out);
            write!(
                out,
                r#"<span class="sr-only">{}</span></a>"#,
                escape_html(&link.label)
            )
            .unwrap();
        }
        out.push_str("</nav></header>");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::page::StaticPage;
    use crate::router::MemoryRouter;
    use crate::theme::Theme;
    use crate::version::VersionError;
    use pretty_assertions::assert_eq;

    fn layout() -> DocLayout {
        let config = Config::default();
        DocLayout::from_config(&config).unwrap()
    }

    fn render(layout: &DocLayout, router: &MemoryRouter) -> String {
        let mut out = String::new();
        let page = StaticPage::new("<p>page body</p>");
        layout.render(router, &page, &ShellContext::plain(), &mut out);
        out
    }

    struct FixedVersion;

    impl VersionSource for FixedVersion {
        fn latest_version(&self) -> Result<Option<String>, VersionError> {
            Ok(Some("1.4.2".to_owned()))
        }
    }

    #[test]
    fn test_initially_closed() {
        let layout = layout();
        assert_eq!(layout.sidebar(), SidebarVisibility::Closed);
        assert_eq!(layout.brand(), "Nestify");
    }

    #[test]
    fn test_toggle_menu() {
        let mut layout = layout();
        let mut router = MemoryRouter::default();
        let mut ctx = ShellContext::plain();

        layout.handle(LayoutEvent::ToggleMenu, &mut router, &mut ctx);
        assert_eq!(layout.sidebar(), SidebarVisibility::Open);
        layout.handle(LayoutEvent::ToggleMenu, &mut router, &mut ctx);
        assert_eq!(layout.sidebar(), SidebarVisibility::Closed);
    }

    #[test]
    fn test_toggle_theme() {
        let mut layout = layout();
        let mut router = MemoryRouter::default();
        let mut ctx = ShellContext::plain();
        assert_eq!(ctx.theme, Theme::System);

        layout.handle(LayoutEvent::ToggleTheme, &mut router, &mut ctx);
        assert_eq!(ctx.theme, Theme::Dark);
        layout.handle(LayoutEvent::ToggleTheme, &mut router, &mut ctx);
        assert_eq!(ctx.theme, Theme::Light);
        assert_eq!(layout.sidebar(), SidebarVisibility::Closed);

        let mut out = String::new();
        layout.render(&router, &StaticPage::new(""), &ctx, &mut out);
        assert!(out.contains(r#"<div class="doc-layout" data-theme="light""#));
        assert!(out.contains(r#"data-action="toggle-theme" data-theme="light""#));
    }

    #[test]
    fn test_backdrop_closes() {
        let mut layout = layout();
        let mut router = MemoryRouter::default();
        let mut ctx = ShellContext::plain();

        layout.handle(LayoutEvent::ToggleMenu, &mut router, &mut ctx);
        layout.handle(LayoutEvent::BackdropClick, &mut router, &mut ctx);
        assert_eq!(layout.sidebar(), SidebarVisibility::Closed);

        // Backdrop click while closed is a no-op
        layout.handle(LayoutEvent::BackdropClick, &mut router, &mut ctx);
        assert_eq!(layout.sidebar(), SidebarVisibility::Closed);
    }

    #[test]
    fn test_select_item_closes_and_navigates() {
        let mut layout = layout();
        let mut router = MemoryRouter::default();
        let mut ctx = ShellContext::plain();

        layout.handle(LayoutEvent::ToggleMenu, &mut router, &mut ctx);
        layout.handle(LayoutEvent::SelectItem("/docker".to_owned()), &mut router, &mut ctx);

        assert_eq!(layout.sidebar(), SidebarVisibility::Closed);
        assert_eq!(router.current_path(), "/docker");
    }

    #[test]
    fn test_closed_renders_one_sidebar() {
        let html = render(&layout(), &MemoryRouter::default());

        assert_eq!(html.matches(r#"<nav class="doc-sidebar">"#).count(), 1);
        assert!(!html.contains("close-sidebar"));
        assert!(html.contains(r#"data-sidebar="closed""#));
        assert!(html.contains("icon-menu"));
        assert!(html.contains(r#"<main class="content"><div class="content-inner"><p>page body</p></div></main>"#));
    }

    #[test]
    fn test_open_renders_modal_sidebar() {
        let mut layout = layout();
        let mut router = MemoryRouter::new("/installation");
        let mut ctx = ShellContext::plain();
        layout.handle(LayoutEvent::ToggleMenu, &mut router, &mut ctx);

        let html = render(&layout, &router);

        assert_eq!(html.matches(r#"<nav class="doc-sidebar">"#).count(), 2);
        let backdrop = html
            .find(r#"<div class="sidebar-backdrop" data-action="close-sidebar">"#)
            .unwrap();
        let modal = html.find(r#"aria-modal="true""#).unwrap();
        assert!(backdrop < modal);
        assert!(html.contains("icon-x"));
        assert!(html.contains(r#"aria-expanded="true""#));
        // Both instances mark the same active item
        assert_eq!(html.matches(r#"aria-current="page""#).count(), 2);
    }

    #[test]
    fn test_not_found_renders_without_shell() {
        let mut layout = layout();
        let mut router = MemoryRouter::new("/nowhere");
        let mut ctx = ShellContext::plain().with_theme(Theme::Dark);
        layout.handle(LayoutEvent::ToggleMenu, &mut router, &mut ctx);

        let mut out = String::new();
        let page = StaticPage::not_found(router.current_path());
        layout.render_document(&router, &page, &ctx, &mut out);

        assert!(out.contains("<title>Page not found - Nestify</title>"));
        assert!(out.contains(r#"<html lang="en" data-theme="dark">"#));
        assert!(out.contains(r#"<div class="not-found"><h1>404</h1>"#));
        assert!(!out.contains("site-header"));
        assert!(!out.contains("doc-sidebar"));
    }

    #[test]
    fn test_header_links_and_brand() {
        let html = render(&layout(), &MemoryRouter::default());

        assert!(html.contains(r#"<a class="brand" href="/">Nestify</a>"#));
        assert!(html.contains(r#"href="https://github.com/mugabodannyshafi/nestify" target="_blank" rel="noopener noreferrer""#));
        assert!(html.contains(r#"<span class="sr-only">NPM</span>"#));
        assert!(html.contains("icon-github"));
        assert!(html.contains(r#"data-action="toggle-theme""#));
        assert!(!html.contains("version-badge"));
    }

    #[test]
    fn test_document_title() {
        let layout = layout();
        let page = StaticPage::new("").with_title("Docker <Configuration>");
        let ctx = ShellContext::plain().with_theme(Theme::Dark);
        let mut out = String::new();
        layout.render_document(&MemoryRouter::default(), &page, &ctx, &mut out);

        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains(r#"<html lang="en" data-theme="dark">"#));
        assert!(out.contains("<title>Docker &lt;Configuration&gt; - Nestify</title>"));
    }

    #[test]
    fn test_link_icons() {
        assert_eq!(LinkIcon::from_name("github"), LinkIcon::Github);
        assert_eq!(LinkIcon::from_name("npm"), LinkIcon::Npm);
        assert_eq!(LinkIcon::from_name("docs"), LinkIcon::External);
    }

    #[tokio::test]
    async fn test_version_badge_rendered() {
        let mut layout = layout().with_version_source(Arc::new(FixedVersion));
        layout
            .version_badge_mut()
            .unwrap()
            .settle(Duration::from_secs(5))
            .await;

        let html = render(&layout, &MemoryRouter::default());
        assert!(html.contains(r#"<span class="version-badge">v1.4.2</span>"#));
    }
}
