//! # Domain Types
//!
//! Core domain types used throughout SmartCart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │    LineItem     │   │ PricedLineItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  item           │──►│  base_price     │       │
//! │  │  name           │   │  quantity ≥ 1   │   │  tax_amount     │       │
//! │  │  category       │   └─────────────────┘   │  item_discount  │       │
//! │  │  unit_price     │                         │  total_price    │       │
//! │  └─────────────────┘                         └────────┬────────┘       │
//! │                                                       ▼                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │ CustomerProfile │   │PricingBreakdown │       │
//! │  │  Electronics    │   │  loyalty_tier   │──►│  subtotal ...   │       │
//! │  │  Books          │   │  Bronze/Silver/ │   │  final_total    │       │
//! │  │  Clothing       │   │  Gold           │   │  items          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `LineItem` is owned by the cart and mutated in place. `PricedLineItem` and
//! `PricingBreakdown` are read-only snapshots, rebuilt whole on every change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Catalog identifier, unique within a catalog.
pub type CatalogId = u32;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10%, 1500 bps = 15%
///
/// Integer storage keeps rule tables exact and comparable; the conversion to
/// a decimal fraction only happens inside [`Money::apply_rate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage (15 → 15%).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        Rate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a decimal fraction (1000 bps → 0.1).
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4).normalize()
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// Renders as a percentage: `10%`, `8.25%`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", Decimal::new(i64::from(self.0), 2).normalize())
    }
}

// =============================================================================
// Category
// =============================================================================

/// Product category. Tax and item discount rules are keyed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    Electronics,
    Books,
    Clothing,
}

impl Category {
    /// Every declared category, in display order.
    pub const ALL: [Category; 3] = [Category::Electronics, Category::Books, Category::Clothing];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Books => "Books",
            Category::Clothing => "Clothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "category".to_string(),
                reason: format!("unknown category '{}', expected one of: electronics, books, clothing", s),
            })
    }
}

// =============================================================================
// Loyalty Tier
// =============================================================================

/// Customer loyalty tier. Loyalty discount rules are keyed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
}

impl LoyaltyTier {
    /// Every declared tier, lowest first.
    pub const ALL: [LoyaltyTier; 3] = [LoyaltyTier::Bronze, LoyaltyTier::Silver, LoyaltyTier::Gold];

    pub const fn as_str(&self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "Bronze",
            LoyaltyTier::Silver => "Silver",
            LoyaltyTier::Gold => "Gold",
        }
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoyaltyTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoyaltyTier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "loyalty tier".to_string(),
                reason: format!("unknown tier '{}', expected one of: bronze, silver, gold", s),
            })
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A purchasable product. Created by the storefront, never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    pub id: CatalogId,
    pub name: String,
    pub category: Category,
    /// Price of one unit, non-negative.
    pub unit_price: Money,
}

impl CatalogItem {
    pub fn new(id: CatalogId, name: impl Into<String>, category: Category, unit_price: Money) -> Self {
        CatalogItem {
            id,
            name: name.into(),
            category,
            unit_price,
        }
    }
}

// =============================================================================
// Customer Profile
// =============================================================================

/// The shopper the cart is priced for. Replaced wholesale, never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerProfile {
    pub loyalty_tier: LoyaltyTier,
}

impl CustomerProfile {
    pub const fn new(loyalty_tier: LoyaltyTier) -> Self {
        CustomerProfile { loyalty_tier }
    }
}

/// New sessions start at Silver.
impl Default for CustomerProfile {
    fn default() -> Self {
        CustomerProfile::new(LoyaltyTier::Silver)
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// A raw cart entry: one catalog item and how many of it.
///
/// ## Invariants (maintained by [`crate::Cart`])
/// - `quantity >= 1`
/// - At most one entry per `item.id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog data captured when the item was first added.
    pub item: CatalogItem,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(item: CatalogItem, quantity: i64) -> Self {
        LineItem { item, quantity }
    }

    #[inline]
    pub fn catalog_id(&self) -> CatalogId {
        self.item.id
    }
}

/// A line item with its prices worked out.
///
/// `total_price = base_price + tax_amount - item_discount`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedLineItem {
    pub item: CatalogItem,
    pub quantity: i64,
    /// `unit_price × quantity`
    pub base_price: Money,
    pub tax_amount: Money,
    pub item_discount: Money,
    pub total_price: Money,
}

impl PricedLineItem {
    #[inline]
    pub fn catalog_id(&self) -> CatalogId {
        self.item.id
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.item.category
    }

    /// Whether an item-level discount applied to this line.
    #[inline]
    pub fn has_discount(&self) -> bool {
        self.item_discount.is_positive()
    }
}

// =============================================================================
// Pricing Breakdown
// =============================================================================

/// The full priced result for a cart.
///
/// ## Invariant
/// `final_total = max(0, subtotal + total_tax - total_item_discounts
///                        - bulk_discount - loyalty_discount)`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingBreakdown {
    pub subtotal: Money,
    pub total_tax: Money,
    pub total_item_discounts: Money,
    pub bulk_discount: Money,
    pub loyalty_discount: Money,
    pub final_total: Money,
    /// Priced line items, in cart order.
    pub items: Vec<PricedLineItem>,
}

impl PricingBreakdown {
    /// The breakdown of an empty cart: every amount zero, no items.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sum of item, bulk and loyalty discounts.
    pub fn total_savings(&self) -> Money {
        self.total_item_discounts + self.bulk_discount + self.loyalty_discount
    }

    pub fn has_any_discounts(&self) -> bool {
        self.total_savings().is_positive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
