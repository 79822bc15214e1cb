//! # Line Item Pricer
//!
//! Prices one raw line item in isolation.
//!
//! ## Algorithm
//! ```text
//! LineItem { Gaming Laptop ($1200, Electronics), qty 3 }
//!      │
//!      ├── base_price    = 1200 × 3           = 3600
//!      ├── tax_amount    = 3600 × tax(Elec)   =  360   (10%)
//!      ├── item_discount = 3600 × promo(Elec) =  540   (15%, qty > 2)
//!      └── total_price   = 3600 + 360 - 540   = 3420
//! ```
//!
//! Tax and the item discount are both taken from the base price. The input is
//! never mutated.

use crate::rules::PricingRules;
use crate::types::{LineItem, PricedLineItem};

/// Prices a single line item against the given rules.
pub fn price_line_item(line: &LineItem, rules: &PricingRules) -> PricedLineItem {
    let category = line.item.category;
    let base_price = line.item.unit_price * line.quantity;
    let tax_amount = base_price.apply_rate(rules.tax.rate_for(category));
    let item_discount = base_price.apply_rate(rules.item_discounts.rate_for(category, line.quantity));
    let total_price = base_price + tax_amount - item_discount;

    PricedLineItem {
        item: line.item.clone(),
        quantity: line.quantity,
        base_price,
        tax_amount,
        item_discount,
        total_price,
    }
}

/// Prices every line item, preserving order.
pub fn price_line_items(lines: &[LineItem], rules: &PricingRules) -> Vec<PricedLineItem> {
    lines.iter().map(|line| price_line_item(line, rules)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
