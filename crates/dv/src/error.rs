//! CLI error types.

use dv_config::ConfigError;
use dv_renderer::HighlightError;
use dv_site::{NavigationError, PageError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Highlight(#[from] HighlightError),

    #[error("{0}")]
    Navigation(#[from] NavigationError),

    #[error("{0}")]
    Page(#[from] PageError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
