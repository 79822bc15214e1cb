//! Command-line surface of the `smartcart` binary.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use smartcart_core::{CatalogId, Category, LoyaltyTier};

use crate::config::OutputFormat;
use crate::error::AppError;

#[derive(Debug, Parser)]
#[command(name = "smartcart", author, version, about = "Price shopping carts from the terminal", long_about = None)]
pub struct Cli {
    /// Config file (default: platform config dir, smartcart.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format, overrides the configured one
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog products
    Catalog {
        /// Only show one category
        #[arg(long)]
        category: Option<Category>,
    },

    /// Build a cart from the given items and print its breakdown
    Quote {
        /// Item to add, as <id> or <id>x<quantity>; repeatable
        #[arg(long = "item", short = 'i', value_name = "ID[xQTY]", required = true)]
        items: Vec<ItemSpec>,

        /// Customer loyalty tier, overrides the configured default
        #[arg(long)]
        tier: Option<LoyaltyTier>,
    },

    /// Apply a JSON script of cart intents and print every session
    Replay {
        /// JSON array of intents
        script: PathBuf,

        /// Tier that new sessions start with
        #[arg(long)]
        tier: Option<LoyaltyTier>,

        /// Only print this session
        #[arg(long)]
        session: Option<String>,
    },
}

/// One `--item` argument: a catalog id and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub id: CatalogId,
    pub quantity: i64,
}

impl FromStr for ItemSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidArgument(format!("'{}' is not <id> or <id>x<quantity>", s));

        let (id, quantity) = match s.trim().split_once(['x', 'X']) {
            Some((id, qty)) => (id, qty.trim().parse::<i64>().map_err(|_| invalid())?),
            None => (s.trim(), 1),
        };
        let id = id.trim().parse::<CatalogId>().map_err(|_| invalid())?;

        Ok(ItemSpec { id, quantity })
    }
}
