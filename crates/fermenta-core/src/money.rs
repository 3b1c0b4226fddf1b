//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Pesos                                        │
//! │    The store currency has no decimal subdivision, so every amount   │
//! │    is an exact i64 count of pesos. Discounts round explicitly.      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fermenta_core::money::Money;
//!
//! let kit = Money::from_pesos(18_000);
//! let two_kits = kit * 2;
//! assert_eq!(two_kits.pesos(), 36_000);
//!
//! // 10% quantity discount on the pair
//! assert_eq!(two_kits.percent_of(10).pesos(), 3_600);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Promotional prices are pushed up to the next multiple of this step…
const CHARM_STEP: i64 = 1_000;
/// …then pulled back by this offset, landing on a conventional 990 ending.
const CHARM_OFFSET: i64 = 10;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole pesos (the store currency has no minor unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts subtract, so intermediate math can dip
///   negative even though displayed prices never do
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for the persisted snapshot and views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from a whole-peso amount.
    ///
    /// ## Example
    /// ```rust
    /// use fermenta_core::money::Money;
    ///
    /// let price = Money::from_pesos(12_990);
    /// assert_eq!(price.pesos(), 12_990);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos)
    }

    /// Returns the value in whole pesos.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Computes `percent`% of this amount, rounded to the nearest peso.
    ///
    /// This is the quantity-discount amount, not the discounted price:
    /// subtract the result from the original to get the price after
    /// discount.
    ///
    /// ## Implementation
    /// Integer math with i128 widening: `(pesos × percent + 50) / 100`.
    /// The +50 rounds half away from zero, matching how the published
    /// discount table is quoted.
    ///
    /// ## Example
    /// ```rust
    /// use fermenta_core::money::Money;
    ///
    /// let subtotal = Money::from_pesos(17_000);
    /// assert_eq!(subtotal.percent_of(10).pesos(), 1_700);
    /// ```
    pub fn percent_of(&self, percent: u8) -> Money {
        let amount = (self.0 as i128 * percent as i128 + 50) / 100;
        Money::from_pesos(amount as i64)
    }

    /// Rounds up to the next multiple of 1 000 and subtracts 10, so the
    /// result ends in the conventional `…990` promotional suffix.
    ///
    /// Amounts of zero or less map to zero. An exact multiple of 1 000 is
    /// treated as already reached, so `24 000 → 23 990`.
    ///
    /// Only discounted combo totals are presented this way; individual
    /// products always show their exact computed price.
    ///
    /// ## Example
    /// ```rust
    /// use fermenta_core::money::Money;
    ///
    /// assert_eq!(Money::from_pesos(24_630).charm_rounded().pesos(), 24_990);
    /// assert_eq!(Money::from_pesos(20_001).charm_rounded().pesos(), 20_990);
    /// assert_eq!(Money::zero().charm_rounded().pesos(), 0);
    /// ```
    pub const fn charm_rounded(&self) -> Money {
        if self.0 <= 0 {
            return Money(0);
        }
        let ceiling = (self.0 + CHARM_STEP - 1) / CHARM_STEP * CHARM_STEP;
        Money(ceiling - CHARM_OFFSET)
    }

    /// Multiplies by a unit count.
    #[inline]
    pub const fn times(&self, count: u32) -> Self {
        Money(self.0 * count as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display groups thousands with dots, the local convention: `$12.990`.
///
/// This is the exact text the order formatter and views emit; there is no
/// separate frontend formatting pass for money.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}${}", sign, grouped)
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pesos() {
        let money = Money::from_pesos(12_990);
        assert_eq!(money.pesos(), 12_990);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(format!("{}", Money::from_pesos(12_990)), "$12.990");
        assert_eq!(format!("{}", Money::from_pesos(990)), "$990");
        assert_eq!(format!("{}", Money::from_pesos(1_234_567)), "$1.234.567");
        assert_eq!(format!("{}", Money::from_pesos(0)), "$0");
        assert_eq!(format!("{}", Money::from_pesos(-5_500)), "-$5.500");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pesos(10_000);
        let b = Money::from_pesos(4_500);

        assert_eq!((a + b).pesos(), 14_500);
        assert_eq!((a - b).pesos(), 5_500);
        assert_eq!((a * 3).pesos(), 30_000);
        assert_eq!(a.times(2).pesos(), 20_000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [8_000, 9_000]
            .iter()
            .map(|p| Money::from_pesos(*p))
            .sum();
        assert_eq!(total.pesos(), 17_000);
    }

    #[test]
    fn test_percent_of() {
        // The pooled-group example from the discount table: 10% of 17 000
        let subtotal = Money::from_pesos(17_000);
        assert_eq!(subtotal.percent_of(10).pesos(), 1_700);

        // Rounds half away from zero
        assert_eq!(Money::from_pesos(1_250).percent_of(5).pesos(), 63);
        assert_eq!(Money::from_pesos(100).percent_of(0).pesos(), 0);
    }

    #[test]
    fn test_charm_rounded() {
        assert_eq!(Money::from_pesos(24_630).charm_rounded().pesos(), 24_990);
        assert_eq!(Money::from_pesos(20_001).charm_rounded().pesos(), 20_990);
        // Exact multiples stay in their own band
        assert_eq!(Money::from_pesos(24_000).charm_rounded().pesos(), 23_990);
        // Degenerate inputs collapse to zero
        assert_eq!(Money::zero().charm_rounded().pesos(), 0);
        assert_eq!(Money::from_pesos(-3_000).charm_rounded().pesos(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_pesos(100).is_positive());
        assert!(Money::from_pesos(-100).is_negative());
    }
}
