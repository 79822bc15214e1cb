//! # Session Registry
//!
//! Maps session names to independent carts.
//!
//! Carts never interact: each has its own lock, customer and version. The
//! registry lock only covers the name lookup, so work on one session never
//! waits on another.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smartcart_core::{CustomerProfile, PricingRules};
use tracing::debug;

use super::CartState;
use crate::error::{AppError, AppResult};

/// Session used when an intent does not name one.
pub const DEFAULT_SESSION: &str = "default";

/// Registry of named carts sharing one rule set.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<BTreeMap<String, CartState>>,
    customer: CustomerProfile,
    rules: Arc<PricingRules>,
}

impl SessionRegistry {
    /// New sessions start with `customer` and are priced with `rules`.
    pub fn new(customer: CustomerProfile, rules: Arc<PricingRules>) -> Self {
        SessionRegistry {
            sessions: Mutex::new(BTreeMap::new()),
            customer,
            rules,
        }
    }

    /// Returns the cart for `name`, creating an empty one on first use.
    pub fn open(&self, name: &str) -> CartState {
        let mut sessions = self.lock();
        if let Some(state) = sessions.get(name) {
            return state.clone();
        }

        debug!(session = name, tier = %self.customer.loyalty_tier, "session opened");
        let state = CartState::new(self.customer, Arc::clone(&self.rules));
        sessions.insert(name.to_string(), state.clone());
        state
    }

    /// Returns the cart for an existing session.
    pub fn get(&self, name: &str) -> AppResult<CartState> {
        self.lock()
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::UnknownSession(name.to_string()))
    }

    /// Session names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Every session with its cart, in name order.
    pub fn sessions(&self) -> Vec<(String, CartState)> {
        self.lock()
            .iter()
            .map(|(name, state)| (name.clone(), state.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, CartState>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        SessionRegistry::new(CustomerProfile::default(), PricingRules::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcart_core::{Catalog, LoyaltyTier, Money};

    #[test]
    fn test_open_creates_once() {
        let registry = SessionRegistry::default();
        let first = registry.open("alice");
        let book = Catalog::sample().require(6).unwrap().clone();
        first.with_cart_mut(|cart| cart.add_item(&book, 2)).unwrap();

        let again = registry.open("alice");
        assert_eq!(again.with_cart(|c| c.item_count()), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new(
            CustomerProfile::new(LoyaltyTier::Bronze),
            PricingRules::standard(),
        );
        let catalog = Catalog::sample();

        registry
            .open("alice")
            .with_cart_mut(|cart| cart.add_item(catalog.require(1).unwrap(), 3))
            .unwrap();
        registry
            .open("bob")
            .with_cart_mut(|cart| cart.add_item(catalog.require(6).unwrap(), 1))
            .unwrap();

        let bob = registry.get("bob").unwrap();
        assert_eq!(bob.breakdown().final_total, Money::from_major(38));
        assert_eq!(registry.get("alice").unwrap().with_cart(|c| c.unique_item_count()), 1);
        assert_eq!(registry.names(), vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_get_unknown_session() {
        let registry = SessionRegistry::default();
        assert!(registry.is_empty());
        assert!(matches!(registry.get("ghost"), Err(AppError::UnknownSession(name)) if name == "ghost"));
    }

    #[test]
    fn test_parallel_sessions() {
        let registry = SessionRegistry::default();
        let catalog = Catalog::sample();

        std::thread::scope(|s| {
            for n in 0..4 {
                let registry = &registry;
                let catalog = &catalog;
                s.spawn(move || {
                    let state = registry.open(&format!("shopper-{}", n));
                    for id in 5..=8 {
                        state
                            .with_cart_mut(|cart| cart.add_item(catalog.require(id).unwrap(), 1))
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(registry.len(), 4);
        for (_, state) in registry.sessions() {
            // Four tax-free books: 45 + 40 + 55 + 50
            assert_eq!(state.breakdown().subtotal, Money::from_major(190));
            assert_eq!(state.with_cart(|c| c.version()), 4);
        }
    }
}
