//! Sidebar navigation component.
//!
//! [`DocSidebar`] renders a [`Navigation`] for the current path. Exactly the
//! item whose href equals the current path is active; prefixes never match.

use std::fmt::Write;

use dv_renderer::{escape_html, write_icon};
use serde::Serialize;

use crate::navigation::{NavIcon, Navigation};

/// Sidebar over a navigation model.
#[derive(Clone, Copy, Debug)]
pub struct DocSidebar<'a> {
    navigation: &'a Navigation,
}

impl<'a> DocSidebar<'a> {
    pub fn new(navigation: &'a Navigation) -> Self {
        Self { navigation }
    }

    /// Compute the sidebar view for `current_path`.
    pub fn view(&self, current_path: &str) -> SidebarView {
        let sections = self
            .navigation
            .sections()
            .iter()
            .map(|section| SidebarSection {
                title: section.title.clone(),
                items: section
                    .items
                    .iter()
                    .map(|item| SidebarItem {
                        title: item.title.clone(),
                        href: item.href.clone(),
                        icon: item.icon,
                        active: item.href == current_path,
                    })
                    .collect(),
            })
            .collect();
        SidebarView { sections }
    }

    /// Render the sidebar for `current_path` as HTML.
    pub fn render(&self, current_path: &str, out: &mut String) {
        self.view(current_path).write_html(out);
    }
}

/// Rendered sidebar item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    pub title: String,
    pub href: String,
    pub icon: NavIcon,
    pub active: bool,
}

/// Rendered sidebar section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarSection {
    pub title: String,
    pub items: Vec<SidebarItem>,
}

/// Computed sidebar state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarView {
    pub sections: Vec<SidebarSection>,
}

impl SidebarView {
    /// Href of the active item, if any.
    pub fn active_href(&self) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .find(|item| item.active)
            .map(|item| item.href.as_str())
    }

    pub fn write_html(&self, out: &mut String) {
        out.push_str(r#"<nav class="doc-sidebar">"#);
        for section in &self.sections {
            write!(
                out,
                r#"<div class="sidebar-section"><h4 class="sidebar-section-title">{}</h4><div class="sidebar-items">"#,
                escape_html(&section.title)
            )
            .unwrap();
            for item in &section.items {
                let href = escape_html(&item.href);
                if item.active {
                    write!(
                        out,
                        r#"<a class="sidebar-item active" href="{href}" data-href="{href}" aria-current="page">"#
                    )
                    .unwrap();
                } else {
                    write!(
                        out,
                        r#"<a class="sidebar-item" href="{href}" data-href="{href}">"#
                    )
                    .unwrap();
                }
                write_icon(item.icon.name(), out);
                write!(out, "{}</a>", escape_html(&item.title)).unwrap();
            }
            out.push_str("</div></div>");
        }
        out.push_str("</nav>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{NavItem, NavSection};
    use pretty_assertions::assert_eq;

    fn nav() -> Navigation {
        Navigation::new(vec![NavSection::new(
            "Guide",
            vec![
                NavItem::new("Installation", "/installation", NavIcon::Download),
                NavItem::new("Installation Guide", "/installation-guide", NavIcon::Rocket),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn test_exactly_one_active() {
        let nav = nav();
        let view = DocSidebar::new(&nav).view("/installation");

        let active: Vec<_> = view.sections[0].items.iter().map(|i| i.active).collect();
        assert_eq!(active, vec![true, false]);
        assert_eq!(view.active_href(), Some("/installation"));
    }

    #[test]
    fn test_prefix_is_not_active() {
        let nav = nav();
        let view = DocSidebar::new(&nav).view("/installation-guide");
        assert_eq!(view.active_href(), Some("/installation-guide"));

        let view = DocSidebar::new(&nav).view("/install");
        assert_eq!(view.active_href(), None);
    }

    #[test]
    fn test_unknown_path_has_no_active_item() {
        let nav = Navigation::builtin();
        let view = DocSidebar::new(&nav).view("/does-not-exist");
        assert_eq!(view.active_href(), None);
        assert_eq!(view.sections.len(), 3);
    }

    #[test]
    fn test_html_marks_active_item() {
        let nav = nav();
        let mut out = String::new();
        DocSidebar::new(&nav).render("/installation", &mut out);

        assert!(out.starts_with(r#"<nav class="doc-sidebar">"#));
        assert!(out.contains(
            r#"<a class="sidebar-item active" href="/installation" data-href="/installation" aria-current="page">"#
        ));
        assert!(out.contains(r#"<a class="sidebar-item" href="/installation-guide""#));
        assert_eq!(out.matches("aria-current").count(), 1);
        assert!(out.contains("icon-download"));
        assert!(out.contains(r#"<h4 class="sidebar-section-title">Guide</h4>"#));
    }

    #[test]
    fn test_view_serialization() {
        let nav = nav();
        let json = serde_json::to_value(DocSidebar::new(&nav).view("/installation")).unwrap();
        assert_eq!(json["sections"][0]["items"][0]["active"], true);
        assert_eq!(json["sections"][0]["items"][0]["icon"], "download");
    }
}
