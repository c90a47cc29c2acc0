mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "signup")]
#[command(version, about = "Check values against the registration form rules", long_about = None)]
struct Cli {
    /// Configuration file (default: ./signup.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate field values read from a TOML file
    Check {
        /// TOML file mapping field names to values
        values: PathBuf,

        /// Date to compute ages at, YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective rule table
    Rules,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Check { values, today, json } => {
            commands::check::execute(&config, &values, today, json)
        }
        Commands::Rules => {
            commands::rules::execute(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
