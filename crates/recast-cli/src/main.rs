//! Recast CLI
//!
//! Transforms JSON records with transformers declared in a host config file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use recast_core::JsonOptions;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod field_transformer;
mod host;

/// Recast - shape records into API responses
#[derive(Parser)]
#[command(name = "recast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "recast.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the default configuration file
    Init {
        /// Directory or file to write (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// List transformer groups
    Groups,

    /// Transform a JSON document and print the result
    Transform {
        /// Input JSON file, or `-` for stdin
        input: String,

        /// Transformer group to resolve defaults from
        #[arg(short, long)]
        group: Option<String>,

        /// Transformer to use instead of the group default (required for arrays)
        #[arg(short, long)]
        transformer: Option<String>,

        /// Related data to include, comma separated
        #[arg(short, long, value_delimiter = ',')]
        include: Vec<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,

        /// Escape `/` as `\/`
        #[arg(long)]
        escape_slashes: bool,

        /// Escape non-ASCII characters as `\uXXXX`
        #[arg(long)]
        escape_unicode: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for transform output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { path } => {
            commands::init::run(&path)?;
        }
        Commands::Groups => {
            commands::groups::run(&cli.config)?;
        }
        Commands::Transform {
            input,
            group,
            transformer,
            include,
            pretty,
            escape_slashes,
            escape_unicode,
        } => {
            let mut options = JsonOptions::NONE;
            for (set, flag) in [
                (pretty, JsonOptions::PRETTY_PRINT),
                (escape_slashes, JsonOptions::ESCAPE_SLASHES),
                (escape_unicode, JsonOptions::ESCAPE_UNICODE),
            ] {
                if set {
                    options = options | flag;
                }
            }

            commands::transform::run(
                &cli.config,
                &input,
                group.as_deref(),
                transformer.as_deref(),
                &include,
                options,
            )?;
        }
    }

    Ok(())
}
