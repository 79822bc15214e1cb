//! `smartcart quote`: price a one-off cart.
//!
//! Unlike `replay`, a quote is all-or-nothing: the first item the cart
//! rejects (unknown id, bad quantity) fails the whole command.

use smartcart_core::LoyaltyTier;
use tracing::info;

use super::CommandContext;
use crate::cli::ItemSpec;
use crate::config::OutputFormat;
use crate::error::AppResult;
use crate::render::BreakdownView;
use crate::state::CartState;

pub fn run(ctx: &CommandContext, items: &[ItemSpec], tier: Option<LoyaltyTier>) -> AppResult<String> {
    let state = CartState::new(ctx.customer(tier), ctx.rules.clone());

    for spec in items {
        let item = ctx.catalog.require(spec.id)?;
        state.with_cart_mut(|cart| cart.add_item(item, spec.quantity))?;
    }

    state.with_cart(|cart| {
        let breakdown = cart.breakdown();
        info!(
            lines = breakdown.items.len(),
            final_total = %breakdown.final_total,
            "quote computed"
        );

        match ctx.format {
            OutputFormat::Text => Ok(BreakdownView {
                breakdown,
                customer: cart.customer(),
                rules: cart.rules(),
            }
            .to_string()),
            OutputFormat::Json => ctx.to_json(breakdown),
        }
    })
}
