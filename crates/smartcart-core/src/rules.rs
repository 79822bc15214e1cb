//! # Pricing Rules
//!
//! Lookup tables that drive every tax and discount decision.
//!
//! ## Rule Tables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Standard Rule Set                                    │
//! │                                                                         │
//! │  TAX (per category)           ITEM DISCOUNT (per category)              │
//! │  ─────────────────            ─────────────────────────────             │
//! │  Electronics  10%             Electronics, quantity > 2   15%           │
//! │  Books         0%                                                       │
//! │  Clothing      5%             BULK (cart-wide)                          │
//! │                               ─────────────────                         │
//! │  LOYALTY (per tier)           amount > 200   10%                        │
//! │  ─────────────────                                                      │
//! │  Bronze  5%                                                             │
//! │  Silver 10%                                                             │
//! │  Gold   15%                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Adding a category or a new item-level promotion is a data change in
//! [`PricingRules::standard`], not a code change in the pricer or aggregator.
//!
//! ## Missing Rules
//! A lookup with no matching rule returns [`Rate::zero`] and logs a warning.
//! A gap in a table must never abort a breakdown.

use std::sync::{Arc, LazyLock};

use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Category, LoyaltyTier, Rate};
use crate::validation::validate_rate_bps;

static STANDARD_RULES: LazyLock<Arc<PricingRules>> =
    LazyLock::new(|| Arc::new(PricingRules::build_standard()));

// =============================================================================
// Tax Rules
// =============================================================================

/// Flat tax rate for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxRule {
    pub category: Category,
    pub rate: Rate,
    pub description: String,
}

impl TaxRule {
    pub fn new(category: Category, rate: Rate, description: impl Into<String>) -> Self {
        TaxRule {
            category,
            rate,
            description: description.into(),
        }
    }
}

/// Category → tax rate. At most one rule per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxRuleTable {
    rules: Vec<TaxRule>,
}

impl TaxRuleTable {
    pub fn new(rules: Vec<TaxRule>) -> CoreResult<Self> {
        for (i, rule) in rules.iter().enumerate() {
            validate_rate_bps(rule.rate.bps())?;
            if rules[..i].iter().any(|r| r.category == rule.category) {
                return Err(CoreError::InvalidRule(format!(
                    "duplicate tax rule for {}",
                    rule.category
                )));
            }
        }
        Ok(TaxRuleTable { rules })
    }

    pub fn rule_for(&self, category: Category) -> Option<&TaxRule> {
        self.rules.iter().find(|r| r.category == category)
    }

    /// Tax rate for a category, zero when no rule exists.
    pub fn rate_for(&self, category: Category) -> Rate {
        match self.rule_for(category) {
            Some(rule) => rule.rate,
            None => {
                warn!(%category, "no tax rule for category, falling back to zero rate");
                Rate::zero()
            }
        }
    }

    /// Human-readable description, e.g. "10% Electronics Tax".
    pub fn describe(&self, category: Category) -> &str {
        self.rule_for(category)
            .map_or("No tax", |r| r.description.as_str())
    }

    /// Declared categories that have no rule.
    pub fn missing_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.rule_for(*c).is_none())
            .collect()
    }

    pub fn rules(&self) -> &[TaxRule] {
        &self.rules
    }
}

// =============================================================================
// Loyalty Rules
// =============================================================================

/// Discount rate for one loyalty tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoyaltyRule {
    pub tier: LoyaltyTier,
    pub rate: Rate,
    pub label: String,
}

impl LoyaltyRule {
    pub fn new(tier: LoyaltyTier, rate: Rate, label: impl Into<String>) -> Self {
        LoyaltyRule {
            tier,
            rate,
            label: label.into(),
        }
    }
}

/// Tier → loyalty discount rate. At most one rule per tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoyaltyRuleTable {
    rules: Vec<LoyaltyRule>,
}

impl LoyaltyRuleTable {
    pub fn new(rules: Vec<LoyaltyRule>) -> CoreResult<Self> {
        for (i, rule) in rules.iter().enumerate() {
            validate_rate_bps(rule.rate.bps())?;
            if rules[..i].iter().any(|r| r.tier == rule.tier) {
                return Err(CoreError::InvalidRule(format!(
                    "duplicate loyalty rule for {}",
                    rule.tier
                )));
            }
        }
        Ok(LoyaltyRuleTable { rules })
    }

    pub fn rule_for(&self, tier: LoyaltyTier) -> Option<&LoyaltyRule> {
        self.rules.iter().find(|r| r.tier == tier)
    }

    /// Loyalty rate for a tier, zero when no rule exists.
    pub fn rate_for(&self, tier: LoyaltyTier) -> Rate {
        match self.rule_for(tier) {
            Some(rule) => rule.rate,
            None => {
                warn!(%tier, "no loyalty rule for tier, falling back to zero rate");
                Rate::zero()
            }
        }
    }

    /// Dropdown label, e.g. "Gold (15% loyalty discount)".
    pub fn label(&self, tier: LoyaltyTier) -> &str {
        self.rule_for(tier).map_or(tier.as_str(), |r| r.label.as_str())
    }

    pub fn missing_tiers(&self) -> Vec<LoyaltyTier> {
        LoyaltyTier::ALL
            .into_iter()
            .filter(|t| self.rule_for(*t).is_none())
            .collect()
    }

    pub fn rules(&self) -> &[LoyaltyRule] {
        &self.rules
    }
}

// =============================================================================
// Item Discount Rules
// =============================================================================

/// Quantity predicate of an item-level discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityCondition {
    /// Strictly more than `n` units.
    MoreThan(i64),
    /// `n` units or more.
    AtLeast(i64),
}

impl QuantityCondition {
    pub fn matches(&self, quantity: i64) -> bool {
        match *self {
            QuantityCondition::MoreThan(n) => quantity > n,
            QuantityCondition::AtLeast(n) => quantity >= n,
        }
    }
}

/// A per-category promotion: when `condition` holds for the line quantity,
/// `rate` of the base price is taken off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDiscountRule {
    pub category: Category,
    pub condition: QuantityCondition,
    pub rate: Rate,
    pub description: String,
}

impl ItemDiscountRule {
    pub fn new(
        category: Category,
        condition: QuantityCondition,
        rate: Rate,
        description: impl Into<String>,
    ) -> Self {
        ItemDiscountRule {
            category,
            condition,
            rate,
            description: description.into(),
        }
    }

    pub fn applies_to(&self, category: Category, quantity: i64) -> bool {
        self.category == category && self.condition.matches(quantity)
    }
}

/// Ordered item discount rules; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemDiscountTable {
    rules: Vec<ItemDiscountRule>,
}

impl ItemDiscountTable {
    /// Rates are capped at 100% so a discount never exceeds the base price.
    pub fn new(rules: Vec<ItemDiscountRule>) -> CoreResult<Self> {
        for rule in &rules {
            validate_rate_bps(rule.rate.bps())?;
        }
        Ok(ItemDiscountTable { rules })
    }

    pub fn rule_for(&self, category: Category, quantity: i64) -> Option<&ItemDiscountRule> {
        self.rules.iter().find(|r| r.applies_to(category, quantity))
    }

    /// Discount rate for a line, zero when no promotion applies.
    pub fn rate_for(&self, category: Category, quantity: i64) -> Rate {
        self.rule_for(category, quantity)
            .map_or(Rate::zero(), |r| r.rate)
    }

    pub fn rules(&self) -> &[ItemDiscountRule] {
        &self.rules
    }
}

// =============================================================================
// Bulk Discount Rule
// =============================================================================

/// Cart-wide discount once the post-item amount passes a single threshold.
///
/// Cliff edge, not tiered: exactly `threshold` gets nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkDiscountRule {
    pub threshold: Money,
    pub rate: Rate,
}

impl BulkDiscountRule {
    pub fn new(threshold: Money, rate: Rate) -> CoreResult<Self> {
        validate_rate_bps(rate.bps())?;
        Ok(BulkDiscountRule { threshold, rate })
    }

    pub fn discount_for(&self, amount: Money) -> Money {
        if amount > self.threshold {
            amount.apply_rate(self.rate)
        } else {
            Money::zero()
        }
    }
}

// =============================================================================
// Pricing Rules
// =============================================================================

/// Every table the pricer and aggregator consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRules {
    pub tax: TaxRuleTable,
    pub item_discounts: ItemDiscountTable,
    pub bulk: BulkDiscountRule,
    pub loyalty: LoyaltyRuleTable,
}

impl PricingRules {
    /// Bundles custom tables. Gaps are allowed but reported.
    pub fn new(
        tax: TaxRuleTable,
        item_discounts: ItemDiscountTable,
        bulk: BulkDiscountRule,
        loyalty: LoyaltyRuleTable,
    ) -> Self {
        let missing_categories = tax.missing_categories();
        if !missing_categories.is_empty() {
            warn!(?missing_categories, "tax table is incomplete");
        }
        let missing_tiers = loyalty.missing_tiers();
        if !missing_tiers.is_empty() {
            warn!(?missing_tiers, "loyalty table is incomplete");
        }

        PricingRules {
            tax,
            item_discounts,
            bulk,
            loyalty,
        }
    }

    /// The process-wide standard rule set, built once on first use.
    pub fn standard() -> Arc<PricingRules> {
        Arc::clone(&STANDARD_RULES)
    }

    fn build_standard() -> PricingRules {
        PricingRules {
            tax: TaxRuleTable {
                rules: vec![
                    TaxRule::new(Category::Electronics, Rate::from_percent(10), "10% Electronics Tax"),
                    TaxRule::new(Category::Books, Rate::zero(), "Tax-Free Books"),
                    TaxRule::new(Category::Clothing, Rate::from_percent(5), "5% Clothing Tax"),
                ],
            },
            item_discounts: ItemDiscountTable {
                rules: vec![ItemDiscountRule::new(
                    Category::Electronics,
                    QuantityCondition::MoreThan(2),
                    Rate::from_percent(15),
                    "15% off Electronics when buying more than 2",
                )],
            },
            bulk: BulkDiscountRule {
                threshold: Money::from_major(200),
                rate: Rate::from_percent(10),
            },
            loyalty: LoyaltyRuleTable {
                rules: vec![
                    LoyaltyRule::new(LoyaltyTier::Bronze, Rate::from_percent(5), "Bronze (5% loyalty discount)"),
                    LoyaltyRule::new(LoyaltyTier::Silver, Rate::from_percent(10), "Silver (10% loyalty discount)"),
                    LoyaltyRule::new(LoyaltyTier::Gold, Rate::from_percent(15), "Gold (15% loyalty discount)"),
                ],
            },
        }
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        PricingRules::build_standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
