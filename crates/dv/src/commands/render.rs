//! `dv render` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use dv_config::{CliSettings, Config};
use dv_renderer::{NoClipboard, SyntectTokenizer};
use dv_site::{
    DocLayout, LayoutEvent, MemoryRouter, PageDirectory, RegistryVersionSource, Router,
    ShellContext, Theme, VersionState,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Route to render.
    #[arg(default_value = "/")]
    path: String,

    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown pages directory (overrides config).
    #[arg(short, long, env = "DV_PAGES_DIR")]
    pages_dir: Option<PathBuf>,

    /// Color scheme: light, dark or system.
    #[arg(long, default_value = "system")]
    theme: Theme,

    /// Highlighting theme (overrides config).
    #[arg(long)]
    code_theme: Option<String>,

    /// Render with the mobile sidebar open.
    #[arg(long)]
    open_sidebar: bool,

    /// Skip the latest version fetch.
    #[arg(long)]
    no_version: bool,

    /// Write the document to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the page cannot be read,
    /// or the output cannot be written.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            pages_dir: self.pages_dir,
            theme: self.code_theme,
            version_enabled: self.no_version.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let tokenizer = SyntectTokenizer::new(&config.code.theme)?;
        let mut ctx = ShellContext::new(Arc::new(tokenizer), Arc::new(NoClipboard))
            .with_theme(self.theme)
            .with_copy_reset_after(Duration::from_millis(config.code.copy_reset_ms));

        let mut layout = DocLayout::from_config(&config)?;
        if config.version.enabled {
            let source = RegistryVersionSource::from_config(&config.version);
            layout = layout.with_version_source(Arc::new(source));
        }

        let mut router = MemoryRouter::new(self.path);
        if self.open_sidebar {
            layout.handle(LayoutEvent::ToggleMenu, &mut router, &mut ctx);
        }

        let pages = PageDirectory::new(&config.site_resolved.pages_dir);
        let page = pages.load(router.current_path(), &ctx)?;
        tracing::info!(
            path = router.current_path(),
            history = ?router.history(),
            code_blocks = page.code_blocks().len(),
            "Rendering page"
        );

        // The badge is best-effort: render without it once the timeout passes
        if let Some(badge) = layout.version_badge_mut() {
            let timeout = Duration::from_secs(config.version.timeout_secs);
            if badge.settle(timeout).await == VersionState::Pending {
                output.warning("Version fetch timed out, rendering without badge");
            }
        }

        let mut html = String::new();
        layout.render_document(&router, page.as_ref(), &ctx, &mut html);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.info(&format!(
                    "Rendered {} ({} code blocks) to {}",
                    router.current_path(),
                    page.code_blocks().len(),
                    path.display()
                ));
            }
            None => output.result(&html)?,
        }

        Ok(())
    }
}
