//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                            │
//! │                                                                        │
//! │  In JavaScript/floating point:                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                          │
//! │                                                                        │
//! │  GST inclusive pricing divides: ₹1000 / 1.18 = ₹847.4576271186...     │
//! │  That quotient must stay UNROUNDED while line taxes accumulate,        │
//! │  then round ONCE at the output boundary.                               │
//! │                                                                        │
//! │  OUR SOLUTION: rust_decimal                                            │
//! │    Exact base-10 arithmetic, 28 significant digits, no drift.          │
//! │    `rounded()` is called exactly once, when a breakdown is emitted.    │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price = Money::from_rupees(499);           // ₹499.00
//! let total = price * 3;                         // ₹1497.00
//! assert_eq!(total, Money::from_rupees(1497));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in rupees.
///
/// ## Design Decisions
/// - **Decimal (exact)**: GST math divides; binary floats would drift
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **Serializes as a string**: `"847.46"` - lossless across JSON
///
/// Intermediate values carry full precision; [`Money::rounded`] snaps to
/// 2 decimal places and is only applied when a result leaves the evaluator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS, Default,
)]
#[ts(export)]
pub struct Money(#[ts(as = "String")] Decimal);

impl Money {
    /// Creates a Money value from a raw decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_rupees(1000); // ₹1000.00
    /// ```
    #[inline]
    pub fn from_rupees(rupees: i64) -> Self {
        Money(Decimal::from(rupees))
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_rupees_paise(10, 50); // ₹10.50
    /// ```
    #[inline]
    pub fn from_rupees_paise(rupees: i64, paise: u32) -> Self {
        Money(Decimal::from(rupees) + Decimal::new(paise as i64, 2))
    }

    /// Returns the raw decimal amount (full precision).
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Checks if the value is negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to 2 decimal places (banker's rounding).
    ///
    /// Applied exactly once, at the output boundary. Intermediate
    /// accumulation stays unrounded to avoid cumulative error across lines.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let exact = Money::new("847.4576271186".parse::<Decimal>().unwrap());
    /// assert_eq!(exact.rounded(), Money::new("847.46".parse().unwrap()));
    /// ```
    #[inline]
    pub fn rounded(&self) -> Self {
        Money(self.0.round_dp(2))
    }

    /// Returns the smaller of two amounts. Used for discount caps.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Multiplies by a fraction (e.g. a percentage expressed as 0.18).
    #[inline]
    pub fn mul_fraction(self, fraction: Decimal) -> Self {
        Money(self.0 * fraction)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The storefront formats amounts itself
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0.round_dp(2))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }
}

/// Summation over line amounts.
impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupees() {
        let money = Money::from_rupees(1000);
        assert_eq!(money.amount(), Decimal::from(1000));
    }

    #[test]
    fn test_from_rupees_paise() {
        let money = Money::from_rupees_paise(10, 99);
        assert_eq!(money, Money::new("10.99".parse().unwrap()));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_rupees_paise(10, 99)), "₹10.99");
        assert_eq!(format!("{}", Money::from_rupees(5)), "₹5");
        assert_eq!(format!("{}", Money::zero()), "₹0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(5);

        assert_eq!(a + b, Money::from_rupees(15));
        assert_eq!(a - b, Money::from_rupees(5));
        assert_eq!(a * 3, Money::from_rupees(30));
    }

    #[test]
    fn test_rounded_keeps_two_decimals() {
        let exact = Money::new("152.5423728813559322".parse().unwrap());
        assert_eq!(exact.rounded(), Money::new("152.54".parse().unwrap()));
    }

    #[test]
    fn test_min_for_caps() {
        let raw = Money::from_rupees(200);
        let cap = Money::from_rupees(100);
        assert_eq!(raw.min(cap), cap);
        assert_eq!(cap.min(raw), cap);
    }

    #[test]
    fn test_sum_accumulates_unrounded() {
        let parts = vec![
            Money::new("0.333333".parse().unwrap()),
            Money::new("0.333333".parse().unwrap()),
            Money::new("0.333334".parse().unwrap()),
        ];
        let total: Money = parts.into_iter().sum();
        assert_eq!(total, Money::from_rupees(1));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_rupees(1);
        assert!(positive.is_positive());

        let negative = Money::from_rupees(1) - Money::from_rupees(2);
        assert!(negative.is_negative());
    }
}
