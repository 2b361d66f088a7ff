//! Navigation model: ordered sections of navigation items.
//!
//! The model is built once at startup, either from the built-in default or
//! from `[[navigation]]` entries in `dv.toml`, and is immutable afterwards.

use std::collections::HashSet;
use std::str::FromStr;

use dv_config::NavSectionConfig;
use serde::Serialize;

/// Navigation model error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    /// Two items share the same destination path.
    #[error("duplicate navigation href: {0}")]
    DuplicateHref(String),
    /// Icon name is not part of the navigation icon set.
    #[error("unknown navigation icon: {0}")]
    UnknownIcon(String),
}

/// Symbolic icon shown next to a navigation item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavIcon {
    Home,
    Download,
    Rocket,
    FolderTree,
    Container,
    TestTube,
    Settings,
    Terminal,
    Users,
    Scale,
    Map,
}

impl NavIcon {
    /// Icon name as used in the icon sprite.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Download => "download",
            Self::Rocket => "rocket",
            Self::FolderTree => "folder-tree",
            Self::Container => "container",
            Self::TestTube => "test-tube",
            Self::Settings => "settings",
            Self::Terminal => "terminal",
            Self::Users => "users",
            Self::Scale => "scale",
            Self::Map => "map",
        }
    }
}

impl FromStr for NavIcon {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "download" => Ok(Self::Download),
            "rocket" => Ok(Self::Rocket),
            "folder-tree" => Ok(Self::FolderTree),
            "container" => Ok(Self::Container),
            "test-tube" => Ok(Self::TestTube),
            "settings" => Ok(Self::Settings),
            "terminal" => Ok(Self::Terminal),
            "users" => Ok(Self::Users),
            "scale" => Ok(Self::Scale),
            "map" => Ok(Self::Map),
            _ => Err(NavigationError::UnknownIcon(s.to_owned())),
        }
    }
}

/// Navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Destination path.
    pub href: String,
    pub icon: NavIcon,
}

impl NavItem {
    pub fn new(title: impl Into<String>, href: impl Into<String>, icon: NavIcon) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            icon,
        }
    }
}

/// Titled group of navigation items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: String,
    pub items: Vec<NavItem>,
}

impl NavSection {
    pub fn new(title: impl Into<String>, items: Vec<NavItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }
}

/// Ordered navigation sections with unique item hrefs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Navigation {
    sections: Vec<NavSection>,
}

impl Navigation {
    /// Build a navigation model.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::DuplicateHref`] if two items share a href.
    pub fn new(sections: Vec<NavSection>) -> Result<Self, NavigationError> {
        let mut seen = HashSet::new();
        for item in sections.iter().flat_map(|s| &s.items) {
            if !seen.insert(item.href.as_str()) {
                return Err(NavigationError::DuplicateHref(item.href.clone()));
            }
        }
        Ok(Self { sections })
    }

    /// Build from `[[navigation]]` config entries, or the built-in model
    /// when none are configured.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown icon names or duplicate hrefs.
    pub fn from_config(sections: Option<&[NavSectionConfig]>) -> Result<Self, NavigationError> {
        let Some(sections) = sections else {
            return Ok(Self::builtin());
        };

        let sections = sections
            .iter()
            .map(|section| {
                let items = section
                    .items
                    .iter()
                    .map(|item| Ok(NavItem::new(&item.title, &item.href, item.icon.parse()?)))
                    .collect::<Result<Vec<_>, NavigationError>>()?;
                Ok(NavSection::new(&section.title, items))
            })
            .collect::<Result<Vec<_>, NavigationError>>()?;

        Self::new(sections)
    }

    /// Built-in navigation for the Nestify documentation.
    #[must_use]
    pub fn builtin() -> Self {
        use NavIcon::{
            Container, Download, FolderTree, Home, Map, Rocket, Scale, Settings, Terminal,
            TestTube, Users,
        };

        let sections = vec![
            NavSection::new(
                "Getting Started",
                vec![
                    NavItem::new("Introduction", "/", Home),
                    NavItem::new("Installation", "/installation", Download),
                    NavItem::new("Quick Start", "/quick-start", Rocket),
                ],
            ),
            NavSection::new(
                "Guide",
                vec![
                    NavItem::new("Project Structure", "/project-structure", FolderTree),
                    NavItem::new("Docker Configuration", "/docker", Container),
                    NavItem::new("Testing", "/testing", TestTube),
                    NavItem::new("Environment Variables", "/environment", Settings),
                ],
            ),
            NavSection::new(
                "Reference",
                vec![
                    NavItem::new("Commands", "/commands", Terminal),
                    NavItem::new("Contributing", "/contributing", Users),
                    NavItem::new("Roadmap", "/roadmap", Map),
                    NavItem::new("License", "/license", Scale),
                ],
            ),
        ];

        Self { sections }
    }

    pub fn sections(&self) -> &[NavSection] {
        &self.sections
    }

    /// All items in display order.
    pub fn items(&self) -> impl Iterator<Item = &NavItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// Item whose href equals `path` exactly.
    pub fn active_item(&self, path: &str) -> Option<&NavItem> {
        self.items().find(|item| item.href == path)
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_config::NavItemConfig;
    use pretty_assertions::assert_eq;

    fn item_config(title: &str, href: &str, icon: &str) -> NavItemConfig {
        NavItemConfig {
            title: title.to_owned(),
            href: href.to_owned(),
            icon: icon.to_owned(),
        }
    }

    #[test]
    fn test_builtin_navigation() {
        let nav = Navigation::builtin();
        let titles: Vec<_> = nav.sections().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Getting Started", "Guide", "Reference"]);
        assert_eq!(nav.items().count(), 11);
        assert_eq!(nav.items().next().map(|i| i.href.as_str()), Some("/"));
    }

    #[test]
    fn test_builtin_hrefs_unique() {
        let nav = Navigation::builtin();
        assert!(Navigation::new(nav.sections().to_vec()).is_ok());
    }

    #[test]
    fn test_duplicate_href_rejected() {
        let sections = vec![
            NavSection::new("A", vec![NavItem::new("One", "/one", NavIcon::Home)]),
            NavSection::new("B", vec![NavItem::new("Again", "/one", NavIcon::Map)]),
        ];
        assert_eq!(
            Navigation::new(sections),
            Err(NavigationError::DuplicateHref("/one".to_owned()))
        );
    }

    #[test]
    fn test_active_item_exact_match() {
        let nav = Navigation::builtin();
        assert_eq!(
            nav.active_item("/installation").map(|i| i.title.as_str()),
            Some("Installation")
        );
        assert!(nav.active_item("/installation-guide").is_none());
        assert!(nav.active_item("/installation/").is_none());
        assert!(nav.active_item("").is_none());
    }

    #[test]
    fn test_icon_names_roundtrip() {
        for icon in [NavIcon::FolderTree, NavIcon::TestTube, NavIcon::Home] {
            assert_eq!(icon.name().parse::<NavIcon>(), Ok(icon));
        }
        assert_eq!(
            "github".parse::<NavIcon>(),
            Err(NavigationError::UnknownIcon("github".to_owned()))
        );
    }

    #[test]
    fn test_from_config() {
        let sections = vec![NavSectionConfig {
            title: "Docs".to_owned(),
            items: vec![
                item_config("Home", "/", "home"),
                item_config("Tests", "/testing", "test-tube"),
            ],
        }];
        let nav = Navigation::from_config(Some(&sections)).unwrap();

        assert_eq!(nav.sections().len(), 1);
        assert_eq!(nav.sections()[0].items[1].icon, NavIcon::TestTube);
    }

    #[test]
    fn test_from_config_unknown_icon() {
        let sections = vec![NavSectionConfig {
            title: "Docs".to_owned(),
            items: vec![item_config("Home", "/", "house")],
        }];
        assert_eq!(
            Navigation::from_config(Some(&sections)),
            Err(NavigationError::UnknownIcon("house".to_owned()))
        );
    }

    #[test]
    fn test_from_config_none_is_builtin() {
        assert_eq!(Navigation::from_config(None).unwrap(), Navigation::builtin());
    }

    #[test]
    fn test_navigation_serialization() {
        let json = serde_json::to_value(Navigation::builtin()).unwrap();
        assert_eq!(json["sections"][1]["items"][0]["title"], "Project Structure");
        assert_eq!(json["sections"][1]["items"][0]["icon"], "folder-tree");
    }
}
