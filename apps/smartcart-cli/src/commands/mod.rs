//! # Commands Module
//!
//! One module per subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (shared context, dispatch)
//! ├── catalog.rs  ◄─── Product listing, category filter
//! ├── quote.rs    ◄─── One-shot cart from --item flags
//! └── replay.rs   ◄─── Scripted intents across named sessions
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  smartcart quote --item 1x3 --tier gold                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CommandContext { catalog, rules, default customer, format }            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  quote::run(&ctx, items, tier) -> AppResult<String>                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  main prints the String to stdout                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never print. They return the rendered output so tests can
//! inspect it without spawning the binary.

pub mod catalog;
pub mod quote;
pub mod replay;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use smartcart_core::{Catalog, CustomerProfile, LoyaltyTier, PricingRules};
use tracing::info;

use crate::cli::Command;
use crate::config::{CliConfig, OutputFormat};
use crate::error::{AppError, AppResult};

/// Everything a command needs, resolved once from config and flags.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub catalog: Catalog,
    pub rules: Arc<PricingRules>,
    pub default_tier: LoyaltyTier,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Resolves the catalog and output settings.
    ///
    /// `format` from the command line wins over the configured one.
    pub fn from_config(config: &CliConfig, format: Option<OutputFormat>) -> AppResult<Self> {
        let catalog = match config.catalog.path {
            Some(ref path) => load_catalog(path)?,
            None => Catalog::sample(),
        };

        Ok(CommandContext {
            catalog,
            rules: PricingRules::standard(),
            default_tier: config.cart.default_tier,
            format: format.unwrap_or(config.output.format),
        })
    }

    /// Customer for a new cart: the flag if given, else the configured tier.
    pub fn customer(&self, tier: Option<LoyaltyTier>) -> CustomerProfile {
        CustomerProfile::new(tier.unwrap_or(self.default_tier))
    }

    /// Serializes `value` as pretty JSON with a trailing newline.
    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> AppResult<String> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        Ok(json)
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        CommandContext {
            catalog: Catalog::sample(),
            rules: PricingRules::standard(),
            default_tier: CustomerProfile::default().loyalty_tier,
            format: OutputFormat::Text,
        }
    }
}

/// Reads a JSON catalog file.
pub fn load_catalog(path: &Path) -> AppResult<Catalog> {
    let json = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    let catalog = Catalog::from_json(&json)?;
    info!(?path, products = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Runs one subcommand and returns what should go to stdout.
pub fn dispatch(ctx: &CommandContext, command: Command) -> AppResult<String> {
    match command {
        Command::Catalog { category } => catalog::run(ctx, category),
        Command::Quote { items, tier } => quote::run(ctx, &items, tier),
        Command::Replay {
            script,
            tier,
            session,
        } => replay::run(ctx, &script, tier, session.as_deref()),
    }
}
