//! `dv highlight` command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use dv_config::{CliSettings, Config};
use dv_renderer::{
    CodeBlock, CodeSnippet, Language, NoClipboard, SyntectTokenizer, parse_line_spec,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the highlight command.
#[derive(Args)]
pub(crate) struct HighlightArgs {
    /// Source file to render.
    file: PathBuf,

    /// Language tag (default: guessed from the file extension).
    #[arg(short, long)]
    lang: Option<String>,

    /// Title shown in the code block header.
    #[arg(short, long)]
    title: Option<String>,

    /// Show line numbers.
    #[arg(short = 'n', long)]
    line_numbers: bool,

    /// Lines to highlight, e.g. `2,5-7` (implies --line-numbers).
    #[arg(long)]
    highlight: Option<String>,

    /// Hide the copy control.
    #[arg(long)]
    no_copy: bool,

    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Highlighting theme (overrides config).
    #[arg(long)]
    code_theme: Option<String>,
}

impl HighlightArgs {
    /// Execute the highlight command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the theme is unknown.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            theme: self.code_theme.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let tokenizer = SyntectTokenizer::new(&config.code.theme)?;

        let text = std::fs::read_to_string(&self.file)?;
        let block = CodeBlock::new(self.snippet(text), Arc::new(NoClipboard));

        let mut html = String::new();
        block.render(&tokenizer, &mut html);
        Output::new().result(&html)?;
        Ok(())
    }

    fn snippet(&self, text: String) -> CodeSnippet {
        let language = self
            .lang
            .clone()
            .unwrap_or_else(|| language_for_path(&self.file));
        let highlighted = self
            .highlight
            .as_deref()
            .map(parse_line_spec)
            .unwrap_or_default();

        let mut snippet = CodeSnippet::new(text, language)
            .with_line_numbers(self.line_numbers || !highlighted.is_empty())
            .with_highlighted_lines(highlighted)
            .with_copy(!self.no_copy);
        snippet.title.clone_from(&self.title);
        snippet
    }
}

/// Language tag for a file, from its name or extension.
fn language_for_path(path: &Path) -> String {
    let is_dockerfile = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case("dockerfile"));
    if is_dockerfile {
        return Language::Dockerfile.tag().to_owned();
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(Language::Text, |ext| {
            Language::from_extension(&ext.to_ascii_lowercase())
        })
        .tag()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use pretty_assertions::assert_eq;

    fn args(file: &str) -> HighlightArgs {
        HighlightArgs {
            file: PathBuf::from(file),
            lang: None,
            title: None,
            line_numbers: false,
            highlight: None,
            no_copy: false,
            config: None,
            code_theme: None,
        }
    }

    #[test]
    fn test_language_for_path() {
        assert_eq!(language_for_path(Path::new("src/app.module.ts")), "typescript");
        assert_eq!(language_for_path(Path::new("docker-compose.yml")), "yaml");
        assert_eq!(language_for_path(Path::new("Dockerfile")), "dockerfile");
        assert_eq!(language_for_path(Path::new("README")), "text");
        assert_eq!(language_for_path(Path::new("main.RS")), "rust");
    }

    #[test]
    fn test_snippet_from_args() {
        let mut args = args("docker-compose.yml");
        args.title = Some("docker-compose.yml".to_owned());
        args.highlight = Some("2,4-5".to_owned());

        let snippet = args.snippet("services:\n".to_owned());
        assert_eq!(snippet.language, "yaml");
        assert_eq!(snippet.title.as_deref(), Some("docker-compose.yml"));
        assert!(snippet.show_line_numbers);
        assert_eq!(snippet.highlighted_lines, BTreeSet::from([2, 4, 5]));
        assert!(snippet.show_copy);
    }

    #[test]
    fn test_explicit_language_wins() {
        let mut args = args("script.txt");
        args.lang = Some("bash".to_owned());
        args.no_copy = true;

        let snippet = args.snippet(String::new());
        assert_eq!(snippet.language, "bash");
        assert!(!snippet.show_copy);
        assert!(!snippet.show_line_numbers);
    }
}
