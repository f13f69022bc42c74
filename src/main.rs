//! # Glint - A Syntax-Highlighting Code Editor
//!
//! Opens a file (or an empty buffer) in the glint code editor widget.
//!
//! ## Quick Start
//!
//! ```bash
//! # Empty JSX buffer
//! cargo run
//!
//! # Open a file; the language follows its extension
//! cargo run -- path/to/component.jsx
//!
//! # Dark theme, half-second debounce
//! cargo run -- --theme dark --debounce 500 src/main.rs
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glint_core::Config;
use glint_syntax::LanguageId;
use glint_ui::{run, Flags, Theme};

/// Glint - a syntax-highlighting code editor
#[derive(Parser, Debug)]
#[command(name = "glint")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Language to highlight as (jsx, rust, python, json)
    #[arg(short, long)]
    language: Option<String>,

    /// Theme name (light, dark) or path to a JSON theme
    #[arg(short, long)]
    theme: Option<String>,

    /// Milliseconds of quiet before a change is reported
    #[arg(short, long, value_name = "MS")]
    debounce: Option<u64>,

    /// Placeholder shown while the buffer is empty
    #[arg(short, long)]
    placeholder: Option<String>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Glint v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(),
    };

    let code = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => String::new(),
    };

    let language = resolve_language(&args, &config);
    let theme = resolve_theme(args.theme.as_deref().unwrap_or(&config.ui.theme))?;
    let debounce = args
        .debounce
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.editor.debounce_interval());

    tracing::debug!(
        "Language: {}, theme: {}, debounce: {:?}",
        language,
        theme.name,
        debounce
    );

    let flags = Flags {
        code,
        file: args.file.map(|p| p.display().to_string()),
        language: Some(language),
        theme: Some(theme),
        debounce: Some(debounce),
        placeholder: args.placeholder.or(config.editor.placeholder),
        font_size: Some(config.editor.font_size),
        window_width: config.ui.window_width,
        window_height: config.ui.window_height,
    };

    run(flags).map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

/// `--language`, then the file extension, then the config default.
fn resolve_language(args: &Args, config: &Config) -> String {
    if let Some(language) = &args.language {
        return language.clone();
    }
    args.file
        .as_ref()
        .and_then(|p| LanguageId::from_path(&p.to_string_lossy()))
        .map(|id| id.name().to_string())
        .unwrap_or_else(|| config.editor.language.clone())
}

/// A built-in theme name, else a path to a JSON theme.
fn resolve_theme(name: &str) -> anyhow::Result<Theme> {
    if let Some(theme) = Theme::named(name) {
        return Ok(theme);
    }
    Theme::load(Path::new(name)).with_context(|| format!("Failed to load theme {}", name))
}
