//! # SmartCart CLI
//!
//! Terminal storefront over `smartcart-core`: browse the catalog, quote a
//! cart, or replay scripted shopper intents across named sessions.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                             │
//! │  2. Load configuration: file → environment → validate                  │
//! │  3. Initialize tracing (RUST_LOG wins, else the configured filter)     │
//! │  4. Resolve catalog and output format                                  │
//! │  5. Dispatch the subcommand, print its output                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr; stdout carries only command output so `--format json`
//! can be piped.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod state;

pub use cli::{Cli, Command};
pub use error::{AppError, AppResult};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::CommandContext;
use crate::config::{CliConfig, LoadReport};

/// Runs the parsed command line and returns what should go to stdout.
pub fn run(cli: Cli) -> AppResult<String> {
    let (config, report) = CliConfig::load(cli.config)?;
    init_tracing(&config.logging.filter);
    log_load_report(&report);

    let ctx = CommandContext::from_config(&config, cli.format)?;
    commands::dispatch(&ctx, cli.command)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=smartcart_core=trace` - Show per-aggregation traces
/// - Default: the configured filter, `info,smartcart=debug` out of the box
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn log_load_report(report: &LoadReport) {
    match report.source {
        Some(ref path) => info!(?path, "configuration loaded from file"),
        None => info!("no config file, using defaults"),
    }
    for var in &report.applied {
        info!(var, "configuration overridden from environment");
    }
    for (var, value) in &report.ignored {
        warn!(var, value = %value, "ignoring invalid environment override");
    }
}
