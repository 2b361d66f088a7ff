//! `dv nav` command implementation.

use std::path::PathBuf;

use clap::Args;
use dv_config::Config;
use dv_site::{DocSidebar, Navigation};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mark the item matching this path as active.
    #[arg(long)]
    current: Option<String>,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the navigation model is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let navigation = Navigation::from_config(config.navigation.as_deref())?;
        let json = navigation_json(&navigation, self.current.as_deref())?;
        Output::new().result(&json)?;
        Ok(())
    }
}

fn navigation_json(navigation: &Navigation, current: Option<&str>) -> serde_json::Result<String> {
    match current {
        Some(path) => serde_json::to_string_pretty(&DocSidebar::new(navigation).view(path)),
        None => serde_json::to_string_pretty(navigation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_json() {
        let json = navigation_json(&Navigation::builtin(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sections"][0]["title"], "Getting Started");
        assert_eq!(value["sections"][0]["items"][0]["href"], "/");
        assert!(value["sections"][0]["items"][0].get("active").is_none());
    }

    #[test]
    fn test_navigation_json_with_current() {
        let json = navigation_json(&Navigation::builtin(), Some("/docker")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sections"][1]["items"][1]["href"], "/docker");
        assert_eq!(value["sections"][1]["items"][1]["active"], true);
        assert_eq!(value["sections"][1]["items"][0]["active"], false);
    }
}
