//! # Cart State
//!
//! A shared handle to one session's cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Intent                  Cart Call                  Effect              │
//! │  ──────                  ─────────                  ──────              │
//! │                                                                         │
//! │  add ────────────────► add_item() ──────────────► merge or append      │
//! │  update ─────────────► update_quantity() ───────► set, or remove at 0  │
//! │  remove ─────────────► remove_item() ───────────► drop the line        │
//! │  customer ───────────► update_customer() ───────► reprice everything   │
//! │  clear ──────────────► clear() ─────────────────► empty breakdown      │
//! │                                                                         │
//! │  NOTE: Every call holds the cart lock for its whole duration, so a     │
//! │        reader never sees items and breakdown out of step.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smartcart_core::{Cart, CustomerProfile, PricingBreakdown, PricingRules};

/// Thread-safe wrapper for one cart.
///
/// Cloning the handle shares the same cart.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates an empty cart for `customer`, priced with `rules`.
    pub fn new(customer: CustomerProfile, rules: Arc<PricingRules>) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::for_customer(customer, rules))),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = cart_state.with_cart(|cart| cart.breakdown().final_total);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&item, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut self.lock())
    }

    /// Snapshot of the current breakdown.
    pub fn breakdown(&self) -> PricingBreakdown {
        self.with_cart(|cart| cart.breakdown().clone())
    }

    // Every cart mutation either completes or returns before touching state
    // (prices are bounded at entry, so repricing cannot overflow), so a
    // poisoned lock still guards a consistent cart.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CartState {
    fn default() -> Self {
        CartState::new(CustomerProfile::default(), PricingRules::standard())
    }
}
