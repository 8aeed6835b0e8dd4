//! taggr CLI - image tagging with a pretrained ONNX tagger model.
//!
//! Classifies an image against a fixed tag vocabulary and prints ranked
//! predictions split into general, character, and rating groups.
//!
//! # Usage
//!
//! ```bash
//! # Tag a single image using paths from the config file
//! taggr tag image.jpg
//!
//! # Explicit artifact paths, JSON output
//! taggr tag image.jpg --model model.onnx --tags selected_tags.csv \
//!     --labels config.json --json
//!
//! # View configuration
//! taggr config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// taggr - image tagging with a pretrained ONNX tagger model.
#[derive(Parser, Debug)]
#[command(name = "taggr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag an image and print the ranked predictions
    Tag(cli::tag::TagArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match taggr_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `taggr config path`."
            );
            taggr_core::Config::default()
        }
    };
    logging::init(&config, cli.verbose, cli.json_logs);

    tracing::debug!("taggr v{}", taggr_core::VERSION);

    match cli.command {
        Commands::Tag(args) => cli::tag::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
