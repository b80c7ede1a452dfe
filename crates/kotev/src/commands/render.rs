//! `kotev render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use kotev_config::{CliSettings, Config};
use kotev_renderer::Renderer;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: read stdin; `-` also reads stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover kotev.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language of `/italic/` text (overrides config).
    #[arg(long)]
    lang: Option<String>,

    /// Disable smart punctuation.
    #[arg(long)]
    no_smart_punctuation: bool,

    /// Deepest nesting of `markdown`-flagged elements to render (overrides config).
    #[arg(long)]
    max_depth: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, rendering or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            italic_lang: self.lang,
            smart_punctuation: self.no_smart_punctuation.then_some(false),
            max_depth: self.max_depth,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let markdown = read_input(self.input.as_deref(), std::io::stdin().lock())?;
        let renderer = Renderer::new(config.render_options());
        let html = renderer.render(&markdown)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{html}\n"))?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => write_html(std::io::stdout().lock(), &html)?,
        }

        if self.verbose {
            output.info(&format!(
                "Rendered {} bytes of Markdown into {} bytes of HTML",
                markdown.len(),
                html.len()
            ));
        }

        Ok(())
    }
}

/// Read the document from `path`, or from `stdin` when there is none.
fn read_input(path: Option<&Path>, mut stdin: impl Read) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            tracing::info!(path = %path.display(), "Reading input");
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut markdown = String::new();
            stdin.read_to_string(&mut markdown)?;
            Ok(markdown)
        }
    }
}

fn write_html(mut writer: impl Write, html: &str) -> Result<(), CliError> {
    writer.write_all(html.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
