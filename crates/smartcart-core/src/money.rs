//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Why not integer cents either?                                          │
//! │    $3078.00 × 10% loyalty = $307.80 fine, but                           │
//! │    $33.15 × 5% = $1.6575 → rounding per step drifts the total          │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal, exact through the whole pipeline        │
//! │    Round ONCE, for display, with Bankers Rounding                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use smartcart_core::money::Money;
//! use smartcart_core::types::Rate;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line = price * 3;                // $32.97
//! let tax = line.apply_rate(Rate::from_bps(500)); // 5% = $1.6485, exact
//! assert_eq!(tax.rounded(), Money::from_cents(165));
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

/// Decimal places shown to customers.
pub const DISPLAY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in major currency units (dollars).
///
/// ## Design Decisions
/// - **Decimal (signed)**: Allows negative values for discount lines
/// - **Single field tuple struct**: Zero-cost abstraction over Decimal
/// - **Serialized as a string**: `"3420.00"` survives JSON without float loss
///
/// ## Where Money is Used
/// ```text
/// CatalogItem.unit_price ──► base_price ──► tax / item discount ──► total
///                                 │
///                                 ▼
///           subtotal ──► bulk discount ──► loyalty discount ──► final_total
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use smartcart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub fn from_major(major: i64) -> Self {
        Money(Decimal::from(major))
    }

    /// Returns the exact underlying amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `self` if positive, zero otherwise.
    ///
    /// The final total of a breakdown goes through this clamp.
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Applies a percentage rate and returns the resulting portion.
    ///
    /// Exact: `amount × bps / 10000`, no rounding. Callers keep amounts
    /// within `MAX_UNIT_PRICE`-bounded carts, where this cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use smartcart_core::money::Money;
    /// use smartcart_core::types::Rate;
    ///
    /// let after_bulk = Money::from_major(3078);
    /// let loyalty = after_bulk.apply_rate(Rate::from_bps(1000)); // 10%
    /// assert_eq!(loyalty, Money::from_cents(30780)); // $307.80
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        if rate.is_zero() {
            return Money::zero();
        }
        Money(self.0 * rate.as_fraction())
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Rounds to cents using Bankers Rounding (round half to even).
    ///
    /// ## Bankers Rounding Explained
    /// ```text
    /// Standard rounding always rounds 0.5 UP, causing systematic bias:
    ///   0.005 → 0.01, 0.015 → 0.02, 0.025 → 0.03 (always up = +bias)
    ///
    /// Bankers Rounding rounds 0.5 to nearest EVEN cent:
    ///   0.005 → 0.00, 0.015 → 0.02, 0.025 → 0.02 (alternates = no bias)
    /// ```
    ///
    /// Only presentation uses this; breakdown fields stay exact.
    pub fn rounded(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointNearestEven),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money rounded to cents.
///
/// ## Note
/// For debugging and plain-text output. Localized currency formatting is a
/// presentation concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constructors_agree() {
        assert_eq!(Money::from_cents(120000), Money::from_major(1200));
        assert_eq!(Money::new(dec!(10.99)), Money::from_cents(1099));
        assert_eq!(Money::from_cents(1099).amount(), dec!(10.99));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_major(5).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::new(dec!(307.8)).to_string(), "$307.80");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10);
        let b = Money::from_major(5);

        assert_eq!(a + b, Money::from_major(15));
        assert_eq!(a - b, Money::from_major(5));
        assert_eq!(a * 3, Money::from_major(30));
        assert_eq!(-b, Money::from_major(-5));
    }

    #[test]
    fn test_apply_rate_is_exact() {
        let amount = Money::new(dec!(33.15));
        let portion = amount.apply_rate(Rate::from_bps(500));
        assert_eq!(portion.amount(), dec!(1.6575));
    }

    #[test]
    fn test_apply_zero_rate() {
        let amount = Money::from_major(40);
        assert!(amount.apply_rate(Rate::zero()).is_zero());
    }

    #[test]
    fn test_bankers_rounding() {
        assert_eq!(Money::new(dec!(0.005)).rounded(), Money::zero());
        assert_eq!(Money::new(dec!(0.015)).rounded(), Money::from_cents(2));
        assert_eq!(Money::new(dec!(0.025)).rounded(), Money::from_cents(2));
        assert_eq!(Money::new(dec!(1.6575)).rounded(), Money::from_cents(166));
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_major(-3).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_major(3).clamp_non_negative(), Money::from_major(3));
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_major(1), Money::from_cents(50), Money::from_major(2)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_cents(350));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), Money::from_cents(100));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(1099)).unwrap();
        assert_eq!(json, "\"10.99\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::from_cents(1099));
    }
}
