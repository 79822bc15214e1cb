//! # smartcart-core: Pure Pricing Logic for SmartCart
//!
//! This crate is the **heart** of SmartCart. It turns a set of line items and
//! a customer profile into a fully priced breakdown, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SmartCart Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (smartcart-cli, web UI, ...)          │   │
//! │  │    add / update / remove line item   set loyalty tier           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ intents            ▲ breakdown        │
//! │  ┌─────────────────────────────▼────────────────────┴──────────────┐   │
//! │  │               ★ smartcart-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   cart ──► pricing ──► breakdown                                │   │
//! │  │  (state)   (per line)  (cart totals, bulk, loyalty)             │   │
//! │  │                 │            │                                  │   │
//! │  │                 └──► rules ◄─┘   (tax, item, bulk, loyalty)     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, LineItem, PricingBreakdown, ...)
//! - [`money`] - Money type backed by exact decimals
//! - [`rules`] - Tax, item discount, bulk and loyalty rule tables
//! - [`pricing`] - Line item pricer
//! - [`breakdown`] - Cart aggregator
//! - [`cart`] - Cart state store
//! - [`catalog`] - Purchasable items supplied by the storefront
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary checks run before any mutation
//!
//! ## Example Usage
//!
//! ```rust
//! use smartcart_core::{Cart, Catalog, CustomerProfile, LoyaltyTier, Money};
//!
//! let catalog = Catalog::sample();
//! let mut cart = Cart::new();
//! cart.update_customer(CustomerProfile::new(LoyaltyTier::Bronze));
//! cart.add_item(catalog.get(6).unwrap(), 1).unwrap(); // Clean Code, $40
//!
//! assert_eq!(cart.breakdown().loyalty_discount, Money::from_major(2));
//! assert_eq!(cart.breakdown().final_total, Money::from_major(38));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod breakdown;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use smartcart_core::Money` instead of
// `use smartcart_core::money::Money`

pub use cart::Cart;
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rules::PricingRules;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price a catalog item may carry, in whole currency units.
///
/// A full cart at this price, times the largest rule rate, stays far inside
/// `Decimal`'s range, so pricing never overflows.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000;
