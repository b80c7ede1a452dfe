//! Kotev CLI.
//!
//! `kotev render` turns a Kotev document (Markdown with `/italic/`,
//! `_cite_`, `{: attributes}` and `--source` lines) into an HTML fragment.
//! Settings come from `kotev.toml`, found in the working directory or one of
//! its parents, and from command-line flags, which win.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::RenderArgs;
use output::Output;

/// Render Markdown for mixed Hebrew and English writing to HTML.
#[derive(Parser)]
#[command(name = "kotev", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a file, or stdin, to an HTML fragment on stdout or in a file.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

    // Logs go to stderr so they never mix with HTML on stdout.
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
