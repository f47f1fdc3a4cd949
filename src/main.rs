//! Trawl main entry point
//!
//! This is the command-line interface for the Trawl page extractor.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use trawl::config::{load_config_with_hash, Config};
use trawl::{Response, Trawler};
use tracing_subscriber::EnvFilter;

/// Trawl: a paginated crawler and query-driven page extractor
///
/// Searches a site (or a known search engine) for a query, or walks a
/// site's "next page" links summarising each page. Results are printed
/// as JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(version)]
#[command(about = "A paginated crawler and query-driven page extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a site for a query; known engines are rendered in a browser
    Search {
        /// Site or engine to search (scheme optional)
        site: String,

        /// Text to look for
        query: String,
    },

    /// Walk a site's pagination, summarising each page
    Scroll {
        /// Site to start from (scheme optional)
        site: String,

        /// Number of pages to visit
        #[arg(short, long, allow_negative_numbers = true)]
        pages: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_ref())?;
    let trawler = Trawler::new(&config).context("Failed to initialise trawler")?;

    let succeeded = match cli.command {
        Command::Search { site, query } => print(&trawler.search(&site, &query).await)?,
        Command::Scroll { site, pages } => print(&trawler.scroll(&site, pages).await)?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Loads the configuration file, or defaults when none is given
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Prints a payload as JSON and reports whether it was a success
fn print<T: Serialize>(response: &Response<T>) -> anyhow::Result<bool> {
    let json = serde_json::to_string_pretty(response).context("Failed to serialize response")?;
    println!("{}", json);
    Ok(response.is_success())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trawl=info,warn"),
            1 => EnvFilter::new("trawl=debug,info"),
            2 => EnvFilter::new("trawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
