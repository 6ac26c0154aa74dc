//! Thumbnail - stores uploaded images and their thumbnails by content hash.
//!
//! Images arrive as multipart uploads, base64 JSON strings, or remote URLs.
//! Each one is checked to be JPEG or PNG, re-encoded, shrunk into a 100×100
//! thumbnail, and written as `<hash>.<ext>` plus `thumb_<hash>.<ext>`.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service
//! thumbnail serve
//!
//! # Process one local image into the upload directory
//! thumbnail process photo.jpg
//!
//! # Fetch and process a remote image
//! thumbnail process --url https://example.com/cat.png
//!
//! # View configuration
//! thumbnail config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thumbnail_core::Config;

mod cli;
mod error;
mod ingress;
mod logging;
mod server;

/// Thumbnail - content-addressed image storage with thumbnails.
#[derive(Parser, Debug)]
#[command(name = "thumbnail")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default search path
    #[arg(long, global = true, env = "THUMBNAIL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP ingestion service
    Serve(cli::serve::ServeArgs),

    /// Process a single image from a file, stdin, or URL
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => match Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `thumbnail config path`."
                );
                Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Thumbnail v{}", thumbnail_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Process(args) => cli::process::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}
