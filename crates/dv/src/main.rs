//! dv CLI - Documentation viewer.
//!
//! Provides commands for:
//! - `render`: Render the documentation shell for one route
//! - `nav`: Print the navigation model as JSON
//! - `highlight`: Render a single source file as a code block

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{HighlightArgs, NavArgs, RenderArgs};
use error::CliError;
use output::Output;

/// dv - Documentation viewer.
#[derive(Parser)]
#[command(name = "dv", version, about)]
struct Cli {
    /// Enable verbose output (INFO logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the documentation shell for a route.
    Render(RenderArgs),
    /// Print the navigation model as JSON.
    Nav(NavArgs),
    /// Render a source file as a highlighted code block.
    Highlight(HighlightArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        match command {
            Commands::Render(args) => args.execute().await,
            Commands::Nav(args) => args.execute(),
            Commands::Highlight(args) => args.execute(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from(["dv", "-v", "render", "/installation", "--open-sidebar"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Render(_)));
    }

    #[test]
    fn test_parse_highlight_requires_file() {
        assert!(Cli::try_parse_from(["dv", "highlight"]).is_err());
    }

    #[test]
    fn test_parse_invalid_theme() {
        assert!(Cli::try_parse_from(["dv", "render", "--theme", "blue"]).is_err());
    }
}
