//! Galleria CLI - scan a photo library into a browsable directory tree.
//!
//! Galleria walks one directory of a photo library, extracts EXIF and IPTC
//! metadata from every photo, previews each subdirectory, and prints the
//! result as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Scan a directory of the configured library
//! galleria scan 2020/summer
//!
//! # Scan another library, one JSON record per photo
//! galleria scan . --root ~/Photos --format jsonl --output photos.jsonl
//!
//! # View configuration
//! galleria config show
//! ```

use clap::{Parser, Subcommand};
use galleria_core::Config;
use std::path::PathBuf;

mod cli;
mod logging;

/// Galleria - concurrent photo library crawler and metadata extractor.
#[derive(Parser, Debug)]
#[command(name = "galleria")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "GALLERIA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a library directory and print its tree
    Scan(cli::scan::ScanArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    // The subscriber depends on the config, so load problems go to stderr directly.
    let config = Config::load_or_default(&config_path).unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config from {}: {e}\n  \
             Falling back to defaults.",
            config_path.display()
        );
        Config::default()
    });
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Galleria v{}", galleria_core::VERSION);

    match cli.command {
        Commands::Scan(args) => cli::scan::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, &config_path).await,
    }
}
