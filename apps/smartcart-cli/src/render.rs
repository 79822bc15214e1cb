//! # Text Rendering
//!
//! Plain-text views of catalogs and breakdowns. JSON output does not go
//! through here: it is the serde form of the core types.
//!
//! Amounts print rounded to cents; the underlying values stay exact.

use std::fmt;

use smartcart_core::{CatalogItem, CustomerProfile, PricingBreakdown, PricingRules};

/// A catalog listing, grouped by category in the order given.
pub struct CatalogView<'a> {
    pub items: Vec<&'a CatalogItem>,
}

impl fmt::Display for CatalogView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return writeln!(f, "No products.");
        }

        writeln!(f, "{:>4}  {:<28} {:<12} {:>10}", "ID", "Product", "Category", "Price")?;
        for item in &self.items {
            writeln!(
                f,
                "{:>4}  {:<28} {:<12} {:>10}",
                item.id,
                item.name,
                item.category.as_str(),
                item.unit_price.to_string()
            )?;
        }
        Ok(())
    }
}

/// A priced cart, with the rule descriptions that explain each number.
pub struct BreakdownView<'a> {
    pub breakdown: &'a PricingBreakdown,
    pub customer: &'a CustomerProfile,
    pub rules: &'a PricingRules,
}

impl fmt::Display for BreakdownView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.breakdown;
        writeln!(f, "Customer: {}", self.rules.loyalty.label(self.customer.loyalty_tier))?;

        if b.items.is_empty() {
            writeln!(f, "Cart is empty.")?;
            return writeln!(f, "{:<24}{:>12}", "Total:", b.final_total.to_string());
        }

        writeln!(
            f,
            "{:>4}  {:<28} {:>11} {:>10} {:>11} {:>11}  {}",
            "Qty", "Item", "Base", "Tax", "Discount", "Total", "Tax rule"
        )?;
        for line in &b.items {
            let discount = if line.has_discount() {
                (-line.item_discount).to_string()
            } else {
                "-".to_string()
            };
            writeln!(
                f,
                "{:>4}  {:<28} {:>11} {:>10} {:>11} {:>11}  {}",
                line.quantity,
                line.item.name,
                line.base_price.to_string(),
                line.tax_amount.to_string(),
                discount,
                line.total_price.to_string(),
                self.rules.tax.describe(line.category()),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "{:<24}{:>12}", "Subtotal:", b.subtotal.to_string())?;
        writeln!(f, "{:<24}{:>12}", "Tax:", b.total_tax.to_string())?;
        writeln!(f, "{:<24}{:>12}", "Item discounts:", (-b.total_item_discounts).to_string())?;
        writeln!(f, "{:<24}{:>12}", "Bulk discount:", (-b.bulk_discount).to_string())?;
        writeln!(f, "{:<24}{:>12}", "Loyalty discount:", (-b.loyalty_discount).to_string())?;
        writeln!(f, "{:<24}{:>12}", "Total:", b.final_total.to_string())?;
        if b.has_any_discounts() {
            writeln!(f, "{:<24}{:>12}", "You save:", b.total_savings().to_string())?;
        }
        Ok(())
    }
}
