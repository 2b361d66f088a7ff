//! Configuration management for dv.
//!
//! Parses `dv.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `version.registry_url`
//! - `links[].href`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown pages directory.
    pub pages_dir: Option<PathBuf>,
    /// Override highlighting theme.
    pub theme: Option<String>,
    /// Override version badge fetch.
    pub version_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dv.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Code block configuration.
    pub code: CodeConfig,
    /// Version badge configuration.
    pub version: VersionConfig,
    /// External links shown in the header.
    pub links: Vec<LinkConfig>,
    /// Navigation sections. `None` selects the built-in navigation.
    pub navigation: Option<Vec<NavSectionConfig>>,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct SiteConfigRaw {
    brand: String,
    pages_dir: Option<String>,
}

impl Default for SiteConfigRaw {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_owned(),
            pages_dir: None,
        }
    }
}

const DEFAULT_BRAND: &str = "Nestify";

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Brand shown in the header.
    pub brand: String,
    /// Directory holding one markdown file per route.
    pub pages_dir: PathBuf,
}

/// Code block configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    /// Highlighting theme name (syntect default theme set).
    pub theme: String,
    /// Delay before the "Copied" indicator reverts, in milliseconds.
    pub copy_reset_ms: u64,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_owned(),
            copy_reset_ms: 2000,
        }
    }
}

/// Version badge configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// Whether the shell fetches the latest published version on mount.
    pub enabled: bool,
    /// Package registry endpoint returning JSON with a `version` field.
    pub registry_url: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            registry_url: "https://registry.npmjs.org/@mugabodannyshafi/nestify/latest".to_owned(),
            timeout_secs: 5,
        }
    }
}

/// External link shown in the header navigation cluster.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LinkConfig {
    /// Accessible label.
    pub label: String,
    /// Absolute URL.
    pub href: String,
    /// Icon name (`github`, `npm`, `external`).
    #[serde(default = "default_link_icon")]
    pub icon: String,
}

fn default_link_icon() -> String {
    "external".to_owned()
}

fn default_links() -> Vec<LinkConfig> {
    vec![
        LinkConfig {
            label: "GitHub".to_owned(),
            href: "https://github.com/mugabodannyshafi/nestify".to_owned(),
            icon: "github".to_owned(),
        },
        LinkConfig {
            label: "NPM".to_owned(),
            href: "https://www.npmjs.com/package/@mugabodannyshafi/nestify".to_owned(),
            icon: "npm".to_owned(),
        },
    ]
}

/// Navigation section as written in `dv.toml`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NavSectionConfig {
    /// Section heading.
    pub title: String,
    /// Items in display order.
    pub items: Vec<NavItemConfig>,
}

/// Navigation item as written in `dv.toml`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NavItemConfig {
    /// Display title.
    pub title: String,
    /// Destination path (must start with `/`).
    pub href: String,
    /// Icon name.
    pub icon: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`version.registry_url`").
        field: String,
        /// Error message (e.g., "${`REGISTRY_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dv.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(pages_dir) = &settings.pages_dir {
            self.site_resolved.pages_dir.clone_from(pages_dir);
        }
        if let Some(theme) = &settings.theme {
            self.code.theme.clone_from(theme);
        }
        if let Some(enabled) = settings.version_enabled {
            self.version.enabled = enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            code: CodeConfig::default(),
            version: VersionConfig::default(),
            links: default_links(),
            navigation: None,
            site_resolved: SiteConfig {
                brand: DEFAULT_BRAND.to_owned(),
                pages_dir: base.join("docs"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site_resolved.brand, "site.brand")?;
        self.validate_code()?;
        self.validate_version()?;
        self.validate_links()?;
        self.validate_navigation()?;
        Ok(())
    }

    fn validate_code(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.code.theme, "code.theme")?;
        if self.code.copy_reset_ms == 0 {
            return Err(ConfigError::Validation(
                "code.copy_reset_ms must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_version(&self) -> Result<(), ConfigError> {
        // A disabled badge may keep a stale or empty URL around
        if !self.version.enabled {
            return Ok(());
        }
        require_non_empty(&self.version.registry_url, "version.registry_url")?;
        require_http_url(&self.version.registry_url, "version.registry_url")?;
        if self.version.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "version.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_links(&self) -> Result<(), ConfigError> {
        if self.links.len() < 2 {
            return Err(ConfigError::Validation(
                "at least two [[links]] entries are required".to_owned(),
            ));
        }
        for link in &self.links {
            require_non_empty(&link.label, "links.label")?;
            require_http_url(&link.href, "links.href")?;
        }
        Ok(())
    }

    fn validate_navigation(&self) -> Result<(), ConfigError> {
        let Some(sections) = &self.navigation else {
            return Ok(());
        };
        if sections.is_empty() {
            return Err(ConfigError::Validation(
                "navigation must contain at least one section".to_owned(),
            ));
        }
        for section in sections {
            require_non_empty(&section.title, "navigation.title")?;
            for item in &section.items {
                require_non_empty(&item.title, "navigation.items.title")?;
                if !item.href.starts_with('/') {
                    return Err(ConfigError::Validation(format!(
                        "navigation.items.href must start with '/': {}",
                        item.href
                    )));
                }
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.version.registry_url =
            expand::expand_env(&self.version.registry_url, "version.registry_url")?;

        for link in &mut self.links {
            link.href = expand::expand_env(&link.href, "links.href")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.site_resolved = SiteConfig {
            brand: self.site.brand.clone(),
            pages_dir: config_dir.join(self.site.pages_dir.as_deref().unwrap_or("docs")),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site_resolved.brand, "Nestify");
        assert_eq!(config.site_resolved.pages_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.code.theme, "base16-ocean.dark");
        assert_eq!(config.code.copy_reset_ms, 2000);
        assert!(config.version.enabled);
        assert_eq!(config.links.len(), 2);
        assert!(config.navigation.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.code.copy_reset_ms, 2000);
        assert_eq!(config.links, default_links());
    }

    #[test]
    fn test_parse_code_config() {
        let toml = r#"
[code]
theme = "InspiredGitHub"
copy_reset_ms = 1500
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.code.theme, "InspiredGitHub");
        assert_eq!(config.code.copy_reset_ms, 1500);
    }

    #[test]
    fn test_parse_navigation_config() {
        let toml = r#"
[[navigation]]
title = "Getting Started"
items = [
    { title = "Introduction", href = "/", icon = "home" },
    { title = "Installation", href = "/installation", icon = "download" },
]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sections = config.navigation.unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items[1].href, "/installation");
        assert_eq!(sections[0].items[1].icon, "download");
    }

    #[test]
    fn test_parse_links_default_icon() {
        let toml = r#"
[[links]]
label = "Docs"
href = "https://example.com/docs"

[[links]]
label = "Source"
href = "https://example.com/src"
icon = "github"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.links[0].icon, "external");
        assert_eq!(config.links[1].icon, "github");
    }

    #[test]
    fn test_load_resolves_pages_dir_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dv.toml");
        std::fs::write(
            &path,
            r#"
[site]
brand = "Acme"
pages_dir = "content"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.site_resolved.brand, "Acme");
        assert_eq!(config.site_resolved.pages_dir, dir.path().join("content"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/dv.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dv.toml");
        std::fs::write(&path, "[code\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_expand_env_vars_registry_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DV_TEST_REGISTRY", "https://registry.example.com");
        }
        let mut config: Config = toml::from_str(
            r#"
[version]
registry_url = "${DV_TEST_REGISTRY}/pkg/latest"
"#,
        )
        .unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(
            config.version.registry_url,
            "https://registry.example.com/pkg/latest"
        );
        unsafe {
            std::env::remove_var("DV_TEST_REGISTRY");
        }
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            pages_dir: Some(PathBuf::from("/custom/pages")),
            theme: Some("Solarized (light)".to_owned()),
            version_enabled: Some(false),
        });
        assert_eq!(
            config.site_resolved.pages_dir,
            PathBuf::from("/custom/pages")
        );
        assert_eq!(config.code.theme, "Solarized (light)");
        assert!(!config.version.enabled);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.site_resolved.pages_dir, PathBuf::from("/test/docs"));
        assert!(config.version.enabled);
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_brand() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.brand = String::new();
        assert_validation_error(&config, &["site.brand", "empty"]);
    }

    #[test]
    fn test_validate_copy_reset_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.code.copy_reset_ms = 0;
        assert_validation_error(&config, &["code.copy_reset_ms"]);
    }

    #[test]
    fn test_validate_registry_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.version.registry_url = "ftp://registry.example.com".to_owned();
        assert_validation_error(&config, &["version.registry_url", "http"]);
    }

    #[test]
    fn test_validate_disabled_version_skips_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.version.enabled = false;
        config.version.registry_url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_two_links() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.links.truncate(1);
        assert_validation_error(&config, &["two", "links"]);
    }

    #[test]
    fn test_validate_navigation_href_must_be_absolute() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.navigation = Some(vec![NavSectionConfig {
            title: "Guide".to_owned(),
            items: vec![NavItemConfig {
                title: "Docker".to_owned(),
                href: "docker".to_owned(),
                icon: "container".to_owned(),
            }],
        }]);
        assert_validation_error(&config, &["navigation.items.href", "docker"]);
    }

    #[test]
    fn test_validate_navigation_empty_sections() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.navigation = Some(Vec::new());
        assert_validation_error(&config, &["navigation", "at least one section"]);
    }
}
