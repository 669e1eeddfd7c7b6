//! rxwire CLI
//!
//! Generates observable wrappers and signal binders from a type catalog.

use std::io::IsTerminal;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// rxwire - reactive bindings from event metadata
#[derive(Parser)]
#[command(name = "rxwire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory or configuration file
    #[arg(short, long, env = "RXWIRE_CONFIG", default_value = ".")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    /// Human readable
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new rxwire project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Generate bindings into the output directory
    Generate {
        /// Catalog file or directory (overrides the project setting)
        #[arg(long)]
        catalog: Option<String>,

        /// Output directory (overrides the project setting)
        #[arg(short, long)]
        output: Option<String>,

        /// Synthesize types concurrently
        #[arg(long)]
        concurrent: bool,
    },

    /// Run a full pass without writing files and report diagnostics
    Check {
        /// Catalog file or directory (overrides the project setting)
        #[arg(long)]
        catalog: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Generate {
            catalog,
            output,
            concurrent,
        } => {
            commands::generate::run(
                &cli.config,
                catalog.as_deref(),
                output.as_deref(),
                concurrent,
            )
            .await?;
        }
        Commands::Check { catalog, json } => {
            commands::check::run(&cli.config, catalog.as_deref(), json).await?;
        }
    }

    Ok(())
}
