//! Binary entry point for eventsense.
//!
//! This binary provides the CLI interface for natural-language event search.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use eventsense::config::EventSenseConfig;
use eventsense::observability;
use eventsense::{Coordinates, SearchOptions};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Eventsense - natural-language event search.
#[derive(Parser)]
#[command(name = "eventsense")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "EVENTSENSE_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Turn a request into a search spec without querying the catalog.
    Parse {
        /// The request text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Earlier conversation used as extra tag context.
        #[arg(long)]
        context: Option<String>,

        /// Resolve relative dates against this day (YYYY-MM-DD).
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Search the catalog.
    Search {
        /// The request text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Earlier conversation used as extra tag context.
        #[arg(long)]
        context: Option<String>,

        /// Explicit centre latitude (requires --lng).
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Explicit centre longitude (requires --lat).
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Keep catalog order instead of ranking by relevance.
        #[arg(long)]
        no_rank: bool,
    },

    /// Print the tag vocabulary.
    Taxonomy {
        /// Print as JSON instead of an outline.
        #[arg(long)]
        json: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = observability::init_from_env(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match EventSenseConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &EventSenseConfig) -> Result<ExitCode> {
    match command {
        Commands::Parse {
            text,
            context,
            today,
        } => cmd_parse(config, &text.join(" "), context, today),
        Commands::Search {
            text,
            context,
            lat,
            lng,
            no_rank,
        } => cmd_search(config, &text.join(" "), context, lat.zip(lng), no_rank),
        Commands::Taxonomy { json } => cmd_taxonomy(config, json),
    }
}

fn cmd_parse(
    config: &EventSenseConfig,
    text: &str,
    context: Option<String>,
    today: Option<NaiveDate>,
) -> Result<ExitCode> {
    let assembler = config.assembler().context("building query assembler")?;
    let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let query = assembler.assemble_at(text, context.as_deref(), today);
    print_json(&query)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_search(
    config: &EventSenseConfig,
    text: &str,
    context: Option<String>,
    center: Option<(f64, f64)>,
    no_rank: bool,
) -> Result<ExitCode> {
    let assembler = config.assembler().context("building query assembler")?;
    let retrieval = config
        .retrieval_service()
        .context("building retrieval service")?;

    let query = assembler.assemble_at(
        text,
        context.as_deref(),
        chrono::Local::now().date_naive(),
    );
    let options = SearchOptions {
        query_text: (!no_rank).then(|| query.text.clone()),
        coordinates: center.map(|(lat, lng)| Coordinates::new(lat, lng)),
    };
    if let Some(explicit) = options.coordinates {
        anyhow::ensure!(explicit.is_valid(), "coordinates out of range: {explicit}");
    }

    let outcome = retrieval.search(&query.spec, &options);
    print_json(&outcome)?;
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_taxonomy(config: &EventSenseConfig, json: bool) -> Result<ExitCode> {
    let taxonomy = config.taxonomy().context("loading taxonomy")?;
    if json {
        print_json(taxonomy.nodes())?;
    } else {
        print!("{}", taxonomy.outline());
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{rendered}");
    Ok(())
}
