//! # Cart Aggregator
//!
//! Folds priced line items into cart totals, then applies cart-level
//! discounts in a fixed order.
//!
//! ## Order of Application
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. subtotal, total_tax, total_item_discounts  = Σ over line items      │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  2. after_items = subtotal + total_tax - total_item_discounts           │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  3. bulk_discount = after_items > 200 ? after_items × 10% : 0           │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  4. after_bulk = after_items - bulk_discount                            │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  5. loyalty_discount = after_bulk × loyalty(tier)                       │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  6. final_total = max(0, after_bulk - loyalty_discount)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loyalty is computed on the amount *after* bulk, so the two discounts
//! compound rather than add.

use tracing::trace;

use crate::money::Money;
use crate::pricing::price_line_items;
use crate::rules::PricingRules;
use crate::types::{CustomerProfile, LineItem, PricedLineItem, PricingBreakdown};

/// Aggregates already-priced line items into a breakdown.
pub fn aggregate(
    items: Vec<PricedLineItem>,
    customer: &CustomerProfile,
    rules: &PricingRules,
) -> PricingBreakdown {
    if items.is_empty() {
        return PricingBreakdown::empty();
    }

    let subtotal: Money = items.iter().map(|i| i.base_price).sum();
    let total_tax: Money = items.iter().map(|i| i.tax_amount).sum();
    let total_item_discounts: Money = items.iter().map(|i| i.item_discount).sum();

    let after_items = subtotal + total_tax - total_item_discounts;
    let bulk_discount = rules.bulk.discount_for(after_items);
    let after_bulk = after_items - bulk_discount;
    let loyalty_discount = after_bulk.apply_rate(rules.loyalty.rate_for(customer.loyalty_tier));
    let final_total = (after_bulk - loyalty_discount).clamp_non_negative();

    trace!(
        %subtotal,
        %total_tax,
        %total_item_discounts,
        %bulk_discount,
        %loyalty_discount,
        %final_total,
        "cart aggregated"
    );

    PricingBreakdown {
        subtotal,
        total_tax,
        total_item_discounts,
        bulk_discount,
        loyalty_discount,
        final_total,
        items,
    }
}

/// Runs the full pipeline: price every line, then aggregate.
pub fn compute_breakdown(
    lines: &[LineItem],
    customer: &CustomerProfile,
    rules: &PricingRules,
) -> PricingBreakdown {
    aggregate(price_line_items(lines, rules), customer, rules)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{BulkDiscountRule, ItemDiscountTable, LoyaltyRuleTable, TaxRuleTable};
    use crate::types::{CatalogItem, Category, LoyaltyTier, Rate};
    use rust_decimal_macros::dec;

    fn laptop() -> CatalogItem {
        CatalogItem::new(1, "Gaming Laptop", Category::Electronics, Money::from_major(1200))
    }

    fn clean_code() -> CatalogItem {
        CatalogItem::new(6, "Clean Code", Category::Books, Money::from_major(40))
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let breakdown = compute_breakdown(&[], &CustomerProfile::default(), &PricingRules::standard());
        assert_eq!(breakdown, PricingBreakdown::empty());
    }

    #[test]
    fn test_three_laptops_silver() {
        let lines = vec![LineItem::new(laptop(), 3)];
        let breakdown = compute_breakdown(
            &lines,
            &CustomerProfile::new(LoyaltyTier::Silver),
            &PricingRules::standard(),
        );

        assert_eq!(breakdown.subtotal, Money::from_major(3600));
        assert_eq!(breakdown.total_tax, Money::from_major(360));
        assert_eq!(breakdown.total_item_discounts, Money::from_major(540));
        assert_eq!(breakdown.bulk_discount, Money::from_major(342));
        assert_eq!(breakdown.loyalty_discount.amount(), dec!(307.8));
        assert_eq!(breakdown.final_total.amount(), dec!(2770.2));
        assert_eq!(breakdown.items.len(), 1);
        assert_eq!(breakdown.items[0].total_price, Money::from_major(3420));
    }

    #[test]
    fn test_one_book_bronze() {
        let lines = vec![LineItem::new(clean_code(), 1)];
        let breakdown = compute_breakdown(
            &lines,
            &CustomerProfile::new(LoyaltyTier::Bronze),
            &PricingRules::standard(),
        );

        assert_eq!(breakdown.subtotal, Money::from_major(40));
        assert!(breakdown.total_tax.is_zero());
        assert!(breakdown.total_item_discounts.is_zero());
        assert!(breakdown.bulk_discount.is_zero());
        assert_eq!(breakdown.loyalty_discount, Money::from_major(2));
        assert_eq!(breakdown.final_total, Money::from_major(38));
    }

    #[test]
    fn test_bulk_cliff_at_exactly_threshold() {
        // 5 books at $40 = $200, tax free: not above the threshold
        let lines = vec![LineItem::new(clean_code(), 5)];
        let rules = PricingRules::standard();
        let breakdown = compute_breakdown(&lines, &CustomerProfile::new(LoyaltyTier::Gold), &rules);

        assert!(breakdown.bulk_discount.is_zero());
        assert_eq!(breakdown.loyalty_discount, Money::from_major(30));
        assert_eq!(breakdown.final_total, Money::from_major(170));

        let lines = vec![
            LineItem::new(clean_code(), 5),
            LineItem::new(CatalogItem::new(13, "Bookmark", Category::Books, Money::from_cents(1)), 1),
        ];
        let breakdown = compute_breakdown(&lines, &CustomerProfile::new(LoyaltyTier::Gold), &rules);
        assert!(breakdown.bulk_discount.is_positive());
    }

    #[test]
    fn test_loyalty_applies_after_bulk() {
        let lines = vec![LineItem::new(clean_code(), 10)]; // $400
        let breakdown = compute_breakdown(
            &lines,
            &CustomerProfile::new(LoyaltyTier::Gold),
            &PricingRules::standard(),
        );

        assert_eq!(breakdown.bulk_discount, Money::from_major(40));
        // 15% of 360, not of 400
        assert_eq!(breakdown.loyalty_discount, Money::from_major(54));
        assert_eq!(breakdown.final_total, Money::from_major(306));
        assert_eq!(breakdown.total_savings(), Money::from_major(94));
    }

    #[test]
    fn test_mixed_cart_sums_lines() {
        let lines = vec![
            LineItem::new(laptop(), 1),
            LineItem::new(clean_code(), 2),
            LineItem::new(
                CatalogItem::new(9, "Premium T-Shirt", Category::Clothing, Money::from_major(35)),
                2,
            ),
        ];
        let breakdown = compute_breakdown(
            &lines,
            &CustomerProfile::new(LoyaltyTier::Silver),
            &PricingRules::standard(),
        );

        assert_eq!(breakdown.subtotal, Money::from_major(1350));
        assert_eq!(breakdown.total_tax.amount(), dec!(123.5));
        assert!(breakdown.total_item_discounts.is_zero());
        let after_items = breakdown.subtotal + breakdown.total_tax;
        assert_eq!(breakdown.bulk_discount, after_items.apply_rate(Rate::from_percent(10)));
    }

    #[test]
    fn test_final_total_is_clamped() {
        // A 100% item promotion plus loyalty still cannot go below zero
        let rules = PricingRules::new(
            TaxRuleTable::new(vec![]).unwrap(),
            ItemDiscountTable::new(vec![crate::rules::ItemDiscountRule::new(
                Category::Books,
                crate::rules::QuantityCondition::AtLeast(1),
                Rate::from_percent(100),
                "free books",
            )])
            .unwrap(),
            BulkDiscountRule::new(Money::from_major(200), Rate::from_percent(10)).unwrap(),
            LoyaltyRuleTable::new(vec![]).unwrap(),
        );
        let breakdown = compute_breakdown(
            &[LineItem::new(clean_code(), 3)],
            &CustomerProfile::default(),
            &rules,
        );

        assert!(breakdown.final_total.is_zero());
        assert!(!breakdown.final_total.is_negative());
    }

    #[test]
    fn test_final_total_bounds_hold_for_many_carts() {
        let rules = PricingRules::standard();
        let catalog = crate::catalog::Catalog::sample();
        for tier in LoyaltyTier::ALL {
            for (n, item) in catalog.items().iter().enumerate() {
                let lines = vec![
                    LineItem::new(item.clone(), (n as i64 % 5) + 1),
                    LineItem::new(clean_code(), 1),
                ];
                let breakdown = compute_breakdown(&lines, &CustomerProfile::new(tier), &rules);
                assert!(!breakdown.final_total.is_negative());
                assert!(breakdown.final_total <= breakdown.subtotal + breakdown.total_tax);
            }
        }
    }
}
