//! Upkeep CLI - replay and simulate device telemetry
//!
//! - `replay`: feed NDJSON telemetry through the maintenance engine and print
//!   one outcome per line, then a summary of upcoming maintenance
//! - `simulate`: generate a reproducible degrading telemetry stream
//! - `config`: print the effective configuration
//!
//! Results go to stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod record;

use commands::{replay, simulate};
pub use config::{CliConfig, LoggingConfig};
pub use error::{CliError, CliResult};
pub use record::ReplayRecord;

/// Upkeep CLI application
#[derive(Parser)]
#[command(name = "upkeep")]
#[command(about = "Upkeep - Predictive maintenance for device telemetry", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "UPKEEP_CONFIG", global = true)]
    config: Option<String>,

    /// Log level [default: logging.level from config, else info]
    #[arg(long, env = "UPKEEP_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "UPKEEP_LOG_JSON", global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Replay NDJSON telemetry through the engine
    Replay(replay::ReplayArgs),

    /// Write a synthetic NDJSON telemetry stream
    Simulate(simulate::SimulateArgs),

    /// Print the effective configuration as JSON
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config = CliConfig::load(cli.config.as_deref())?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level, cli.json || config.logging.json);

    match cli.command {
        Commands::Replay(args) => replay::execute(args, &config.engine),
        Commands::Simulate(args) => simulate::execute(args),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Install the global subscriber. Returns false when one was already set,
/// as happens when a host embeds `run_with_args`.
fn init_tracing(level: &str, json: bool) -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let result = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "keeping the existing tracing subscriber");
            false
        }
    }
}
