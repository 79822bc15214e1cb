//! # Cart State Store
//!
//! Holds the authoritative raw cart and keeps its priced breakdown current.
//!
//! ## Recompute Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Intent                   Cart Method            State Change           │
//! │  ──────                   ───────────            ────────────           │
//! │                                                                         │
//! │  Add to cart ───────────► add_item() ──────────► merge or push          │
//! │  Change quantity ───────► update_quantity() ───► set, or remove if ≤ 0  │
//! │  Remove ────────────────► remove_item() ───────► retain != id           │
//! │  Pick loyalty tier ─────► update_customer() ───► replace profile        │
//! │  Clear ─────────────────► clear() ─────────────► items.clear()          │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                   refresh(): price → aggregate → swap breakdown         │
//! │                              version += 1                               │
//! │                                                                         │
//! │  Read ──────────────────► breakdown() / line_items()  (borrow, no work) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation that changes state rebuilds the breakdown before it
//! returns, and the new breakdown replaces the old one in a single
//! assignment. A caller can never observe a breakdown that lags behind the
//! items or the customer profile. Rejected mutations change nothing.

use std::sync::Arc;

use tracing::debug;

use crate::breakdown::compute_breakdown;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::rules::PricingRules;
use crate::types::{
    CatalogId, CatalogItem, Category, CustomerProfile, LineItem, PricedLineItem, PricingBreakdown,
};
use crate::validation::{validate_cart_size, validate_price, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by catalog id (adding the same item increases quantity)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` distinct items
/// - `breakdown` is always `compute_breakdown(items, customer, rules)`
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<LineItem>,
    customer: CustomerProfile,
    rules: Arc<PricingRules>,
    breakdown: PricingBreakdown,
    version: u64,
}

impl Cart {
    /// Creates an empty cart for a Silver customer with the standard rules.
    pub fn new() -> Self {
        Self::with_rules(PricingRules::standard())
    }

    /// Creates an empty cart priced with custom rules.
    pub fn with_rules(rules: Arc<PricingRules>) -> Self {
        Self::for_customer(CustomerProfile::default(), rules)
    }

    /// Creates an empty cart for a known customer. Starts at version 0.
    pub fn for_customer(customer: CustomerProfile, rules: Arc<PricingRules>) -> Self {
        Cart {
            items: Vec::new(),
            customer,
            rules,
            breakdown: PricingBreakdown::empty(),
            version: 0,
        }
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Adds a catalog item or increases its quantity if already present.
    ///
    /// ## Behavior
    /// - Item already in cart: quantity increases by `quantity`, the catalog
    ///   data captured on first add is kept
    /// - Item not in cart: appended as a new line
    ///
    /// ## Errors
    /// - `quantity <= 0` or above the per-item maximum
    /// - Unit price negative or above `MAX_UNIT_PRICE`
    /// - Merged quantity above the per-item maximum
    /// - Cart already holds the maximum number of distinct items
    pub fn add_item(&mut self, item: &CatalogItem, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price(item.unit_price)?;

        if let Some(line) = self.items.iter_mut().find(|l| l.catalog_id() == item.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            debug!(catalog_id = item.id, quantity = new_qty, "line item quantity increased");
            self.refresh();
            return Ok(());
        }

        validate_cart_size(self.items.len())
            .map_err(|_| CoreError::CartTooLarge { max: MAX_CART_ITEMS })?;
        self.items.push(LineItem::new(item.clone(), quantity));
        debug!(catalog_id = item.id, quantity, "line item added");

        self.refresh();
        Ok(())
    }

    /// Removes the line for `id`.
    ///
    /// Returns `false` (and changes nothing) when the item is not in the cart.
    pub fn remove_item(&mut self, id: CatalogId) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|l| l.catalog_id() != id);

        if self.items.len() == initial_len {
            debug!(catalog_id = id, "remove ignored, item not in cart");
            return false;
        }

        debug!(catalog_id = id, "line item removed");
        self.refresh();
        true
    }

    /// Replaces the quantity of the line for `id`.
    ///
    /// ## Behavior
    /// - Item not in cart: no-op, returns `Ok(false)` whatever the quantity
    /// - `quantity <= 0`: same as [`Cart::remove_item`]
    /// - Otherwise: quantity replaced, returns `Ok(true)`
    ///
    /// ## Errors
    /// - `quantity` above the per-item maximum (cart left untouched)
    pub fn update_quantity(&mut self, id: CatalogId, quantity: i64) -> CoreResult<bool> {
        let Some(index) = self.items.iter().position(|l| l.catalog_id() == id) else {
            debug!(catalog_id = id, "update ignored, item not in cart");
            return Ok(false);
        };

        if quantity <= 0 {
            return Ok(self.remove_item(id));
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let line = &mut self.items[index];
        if line.quantity == quantity {
            return Ok(true);
        }

        line.quantity = quantity;
        debug!(catalog_id = id, quantity, "line item quantity updated");
        self.refresh();
        Ok(true)
    }

    /// Replaces the customer profile wholesale.
    pub fn update_customer(&mut self, customer: CustomerProfile) {
        if self.customer == customer {
            return;
        }

        debug!(tier = %customer.loyalty_tier, "customer profile updated");
        self.customer = customer;
        self.refresh();
    }

    /// Empties the cart. The customer profile is kept.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }

        debug!(lines = self.items.len(), "cart cleared");
        self.items.clear();
        self.refresh();
    }

    /// Rebuilds the breakdown and publishes it in one assignment.
    fn refresh(&mut self) {
        let breakdown = compute_breakdown(&self.items, &self.customer, &self.rules);
        self.breakdown = breakdown;
        self.version += 1;
        debug!(
            version = self.version,
            final_total = %self.breakdown.final_total,
            "breakdown recomputed"
        );
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current priced breakdown.
    pub fn breakdown(&self) -> &PricingBreakdown {
        &self.breakdown
    }

    /// Priced line items, in the order they were first added.
    pub fn line_items(&self) -> &[PricedLineItem] {
        &self.breakdown.items
    }

    /// Raw line items.
    pub fn raw_items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn customer(&self) -> &CustomerProfile {
        &self.customer
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Increments once per state-changing mutation; no-ops leave it alone.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.items.iter().any(|l| l.item.category == category)
    }

    /// Mean unit price over distinct lines, zero for an empty cart.
    pub fn average_unit_price(&self) -> Money {
        if self.items.is_empty() {
            return Money::zero();
        }
        let total: Money = self.items.iter().map(|l| l.item.unit_price).sum();
        Money::new(total.amount() / rust_decimal::Decimal::from(self.items.len()))
    }

    pub fn items_by_category(&self, category: Category) -> Vec<&PricedLineItem> {
        self.line_items()
            .iter()
            .filter(|l| l.category() == category)
            .collect()
    }

    /// Sum of line totals for one category.
    pub fn total_by_category(&self, category: Category) -> Money {
        self.items_by_category(category)
            .into_iter()
            .map(|l| l.total_price)
            .sum()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::ValidationError;
    use crate::types::LoyaltyTier;
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        Catalog::sample()
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.breakdown(), &PricingBreakdown::empty());
        assert!(cart.line_items().is_empty());
        assert_eq!(cart.version(), 0);
        assert_eq!(cart.customer().loyalty_tier, LoyaltyTier::Silver);
    }

    #[test]
    fn test_for_customer_starts_clean() {
        let cart = Cart::for_customer(CustomerProfile::new(LoyaltyTier::Gold), PricingRules::standard());
        assert_eq!(cart.customer().loyalty_tier, LoyaltyTier::Gold);
        assert_eq!(cart.version(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_three_laptops_silver() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(1).unwrap(), 3).unwrap();

        let breakdown = cart.breakdown();
        assert_eq!(breakdown.subtotal, Money::from_major(3600));
        assert_eq!(breakdown.total_tax, Money::from_major(360));
        assert_eq!(breakdown.total_item_discounts, Money::from_major(540));
        assert_eq!(breakdown.bulk_discount, Money::from_major(342));
        assert_eq!(breakdown.loyalty_discount.amount(), dec!(307.8));
        assert_eq!(breakdown.final_total.amount(), dec!(2770.2));
    }

    #[test]
    fn test_one_book_bronze() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.update_customer(CustomerProfile::new(LoyaltyTier::Bronze));
        cart.add_item(catalog.get(6).unwrap(), 1).unwrap();

        assert_eq!(cart.breakdown().loyalty_discount, Money::from_major(2));
        assert_eq!(cart.breakdown().final_total, Money::from_major(38));
    }

    #[test]
    fn test_add_same_item_merges() {
        let catalog = catalog();
        let laptop = catalog.get(1).unwrap();

        let mut split = Cart::new();
        split.add_item(laptop, 1).unwrap();
        split.add_item(laptop, 2).unwrap();

        let mut single = Cart::new();
        single.add_item(laptop, 3).unwrap();

        assert_eq!(split.unique_item_count(), 1);
        assert_eq!(split.item_count(), 3);
        assert_eq!(split.breakdown(), single.breakdown());
    }

    #[test]
    fn test_merge_keeps_first_captured_item() {
        let mut cart = Cart::new();
        let original = CatalogItem::new(30, "Notebook", Category::Books, Money::from_major(10));
        let repriced = CatalogItem::new(30, "Notebook", Category::Books, Money::from_major(12));

        cart.add_item(&original, 1).unwrap();
        cart.add_item(&repriced, 1).unwrap();

        assert_eq!(cart.line_items()[0].base_price, Money::from_major(20));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(6).unwrap(), 2).unwrap();
        let before = cart.breakdown().clone();
        let version = cart.version();

        for bad in [0, -1, -5] {
            let err = cart.add_item(catalog.get(6).unwrap(), bad).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::MustBePositive { .. })
            ));
        }

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.breakdown(), &before);
        assert_eq!(cart.version(), version);
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let mut cart = Cart::new();
        let bogus = CatalogItem::new(40, "Bogus", Category::Books, Money::from_major(-5));
        assert!(cart.add_item(&bogus, 1).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_price_over_max() {
        let mut cart = Cart::new();
        let huge = CatalogItem::new(
            50,
            "Yacht",
            Category::Electronics,
            Money::new(dec!(100000000000000000000000000)),
        );

        assert!(matches!(
            cart.add_item(&huge, 1),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.breakdown(), &PricingBreakdown::empty());
        assert_eq!(cart.version(), 0);
    }

    #[test]
    fn test_full_cart_at_max_price_prices_without_overflow() {
        let mut cart = Cart::new();
        cart.update_customer(CustomerProfile::new(LoyaltyTier::Gold));
        for id in 0..MAX_CART_ITEMS as CatalogId {
            let item = CatalogItem::new(
                id + 1000,
                "Flagship",
                Category::Electronics,
                Money::from_major(crate::MAX_UNIT_PRICE),
            );
            cart.add_item(&item, MAX_ITEM_QUANTITY).unwrap();
        }

        let breakdown = cart.breakdown();
        let expected_subtotal = Money::from_major(crate::MAX_UNIT_PRICE)
            * MAX_ITEM_QUANTITY
            * MAX_CART_ITEMS as i64;
        assert_eq!(breakdown.subtotal, expected_subtotal);
        assert!(breakdown.final_total.is_positive());
        assert!(breakdown.final_total < breakdown.subtotal + breakdown.total_tax);
    }

    #[test]
    fn test_add_rejects_merged_quantity_over_max() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(9).unwrap(), MAX_ITEM_QUANTITY).unwrap();

        let err = cart.add_item(catalog.get(9).unwrap(), 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert_eq!(cart.item_count(), MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_add_rejects_too_many_lines() {
        let mut cart = Cart::new();
        for id in 0..MAX_CART_ITEMS as CatalogId {
            let item = CatalogItem::new(id + 100, "Filler", Category::Books, Money::from_major(1));
            cart.add_item(&item, 1).unwrap();
        }

        let extra = CatalogItem::new(1, "One Too Many", Category::Books, Money::from_major(1));
        assert!(matches!(
            cart.add_item(&extra, 1),
            Err(CoreError::CartTooLarge { .. })
        ));
        assert_eq!(cart.unique_item_count(), MAX_CART_ITEMS);
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(2).unwrap(), 1).unwrap();
        let before = cart.breakdown().clone();
        let version = cart.version();

        assert!(!cart.remove_item(99));
        assert_eq!(cart.breakdown(), &before);
        assert_eq!(cart.version(), version);
    }

    #[test]
    fn test_remove_item() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(2).unwrap(), 1).unwrap();
        cart.add_item(catalog.get(6).unwrap(), 1).unwrap();

        assert!(cart.remove_item(2));
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.breakdown().subtotal, Money::from_major(40));
    }

    #[test]
    fn test_update_to_zero_equals_remove() {
        let catalog = catalog();
        let mut updated = Cart::new();
        let mut removed = Cart::new();
        for cart in [&mut updated, &mut removed] {
            cart.add_item(catalog.get(3).unwrap(), 2).unwrap();
            cart.add_item(catalog.get(7).unwrap(), 1).unwrap();
        }

        assert!(updated.update_quantity(3, 0).unwrap());
        assert!(removed.remove_item(3));

        assert_eq!(updated.raw_items(), removed.raw_items());
        assert_eq!(updated.breakdown(), removed.breakdown());
    }

    #[test]
    fn test_update_negative_quantity_removes() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(3).unwrap(), 2).unwrap();

        assert!(cart.update_quantity(3, -4).unwrap());
        assert!(cart.is_empty());
        assert_eq!(cart.breakdown(), &PricingBreakdown::empty());
    }

    #[test]
    fn test_update_missing_item_is_noop() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(3).unwrap(), 2).unwrap();
        let version = cart.version();

        assert!(!cart.update_quantity(42, 5).unwrap());
        assert!(!cart.update_quantity(42, 0).unwrap());
        assert!(!cart.update_quantity(42, MAX_ITEM_QUANTITY + 1).unwrap());
        assert_eq!(cart.version(), version);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_update_quantity_reprices() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(2).unwrap(), 2).unwrap();
        assert!(cart.breakdown().total_item_discounts.is_zero());

        assert!(cart.update_quantity(2, 3).unwrap());
        assert_eq!(cart.line_items()[0].quantity, 3);
        assert_eq!(cart.breakdown().total_item_discounts.amount(), dec!(67.5));
    }

    #[test]
    fn test_update_rejects_quantity_over_max() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(2).unwrap(), 2).unwrap();

        assert!(cart.update_quantity(2, MAX_ITEM_QUANTITY + 1).is_err());
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_tier_change_only_moves_loyalty_and_total() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(1).unwrap(), 3).unwrap();
        cart.add_item(catalog.get(10).unwrap(), 1).unwrap();
        let silver = cart.breakdown().clone();

        cart.update_customer(CustomerProfile::new(LoyaltyTier::Gold));
        let gold = cart.breakdown();

        assert_eq!(gold.subtotal, silver.subtotal);
        assert_eq!(gold.total_tax, silver.total_tax);
        assert_eq!(gold.total_item_discounts, silver.total_item_discounts);
        assert_eq!(gold.bulk_discount, silver.bulk_discount);
        assert_eq!(gold.items, silver.items);
        assert!(gold.loyalty_discount > silver.loyalty_discount);
        assert!(gold.final_total < silver.final_total);
    }

    #[test]
    fn test_same_customer_is_not_a_change() {
        let mut cart = Cart::new();
        cart.update_customer(CustomerProfile::default());
        assert_eq!(cart.version(), 0);
    }

    #[test]
    fn test_clear_keeps_customer() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.update_customer(CustomerProfile::new(LoyaltyTier::Gold));
        cart.add_item(catalog.get(4).unwrap(), 1).unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.breakdown(), &PricingBreakdown::empty());
        assert_eq!(cart.customer().loyalty_tier, LoyaltyTier::Gold);
    }

    #[test]
    fn test_breakdown_is_idempotent() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(1).unwrap(), 1).unwrap();
        cart.add_item(catalog.get(12).unwrap(), 2).unwrap();

        let first = cart.breakdown().clone();
        let second = cart.breakdown().clone();
        assert_eq!(first, second);
        assert_eq!(
            first,
            compute_breakdown(cart.raw_items(), cart.customer(), cart.rules())
        );
    }

    #[test]
    fn test_version_counts_state_changes() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(1).unwrap(), 1).unwrap();
        cart.add_item(catalog.get(1).unwrap(), 1).unwrap();
        cart.update_quantity(1, 5).unwrap();
        cart.update_customer(CustomerProfile::new(LoyaltyTier::Bronze));
        cart.clear();
        cart.clear();
        assert_eq!(cart.version(), 5);
    }

    #[test]
    fn test_category_queries() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(2).unwrap(), 1).unwrap(); // headphones 150
        cart.add_item(catalog.get(9).unwrap(), 2).unwrap(); // t-shirt 35
        cart.add_item(catalog.get(12).unwrap(), 1).unwrap(); // shoes 150

        assert!(cart.has_category(Category::Clothing));
        assert!(!cart.has_category(Category::Books));
        assert_eq!(cart.items_by_category(Category::Clothing).len(), 2);
        // 70 + 3.50 tax + 150 + 7.50 tax
        assert_eq!(cart.total_by_category(Category::Clothing), Money::from_major(231));
        assert!(cart.total_by_category(Category::Books).is_zero());
        // (150 + 35 + 150) / 3
        assert_eq!(cart.average_unit_price(), Money::new(dec!(335) / dec!(3)));
    }

    #[test]
    fn test_average_unit_price_empty() {
        assert!(Cart::new().average_unit_price().is_zero());
    }
}
