//! `smartcart catalog`: list products, optionally one category.

use smartcart_core::{CatalogItem, Category};
use tracing::debug;

use super::CommandContext;
use crate::config::OutputFormat;
use crate::error::AppResult;
use crate::render::CatalogView;

pub fn run(ctx: &CommandContext, category: Option<Category>) -> AppResult<String> {
    let items: Vec<&CatalogItem> = match category {
        Some(category) => ctx.catalog.by_category(category).collect(),
        None => ctx.catalog.items().iter().collect(),
    };
    debug!(?category, count = items.len(), "listing catalog");

    match ctx.format {
        OutputFormat::Text => Ok(CatalogView { items }.to_string()),
        OutputFormat::Json => ctx.to_json(&items),
    }
}
