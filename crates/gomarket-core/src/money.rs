//! # Money Module
//!
//! Provides the `Money` type used for cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Catalog prices arrive as JSON numbers (f64):                           │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: convert each unit price to cents ONCE, then add         │
//! │  and multiply integers only.                                            │
//! │    19.99 → 1999 cents, × 3 = 5997 cents → "$59.97"                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The item itself keeps its `f64` price so the stored snapshot matches the
//! catalog exactly; only totals go through `Money`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_price, ValidationResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use gomarket_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a catalog price (major units, e.g. `10.99`) to cents.
    ///
    /// Rounds half away from zero: `0.125` becomes 13 cents. Negative
    /// prices (discount lines) are allowed.
    ///
    /// ## Errors
    /// - NaN or infinite prices
    /// - Prices too large in either direction to fit in cents
    ///
    /// ## Example
    /// ```rust
    /// use gomarket_core::money::Money;
    ///
    /// assert_eq!(Money::from_price(10.99).unwrap().cents(), 1099);
    /// assert_eq!(Money::from_price(-5.0).unwrap().cents(), -500);
    /// assert!(Money::from_price(f64::NAN).is_err());
    /// ```
    pub fn from_price(price: f64) -> ValidationResult<Self> {
        validate_price(price)?;

        let cents = (price * 100.0).round();
        if cents >= i64::MAX as f64 || cents < i64::MIN as f64 {
            return Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: i64::MIN / 100,
                max: i64::MAX / 100,
            });
        }

        Ok(Money(cents as i64))
    }

    /// Converts a catalog price to cents, clamping at the `i64` bounds.
    ///
    /// Used for totals, where a huge price must count as huge, not as zero.
    /// NaN maps to zero; a `Cart` never holds one.
    ///
    /// ## Example
    /// ```rust
    /// use gomarket_core::money::Money;
    ///
    /// assert_eq!(Money::saturating_from_price(2.5).cents(), 250);
    /// assert_eq!(Money::saturating_from_price(1e300).cents(), i64::MAX);
    /// ```
    pub fn saturating_from_price(price: f64) -> Self {
        // float-to-int `as` saturates at the bounds and maps NaN to 0
        Money((price * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies a unit price by a cart quantity, saturating on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use gomarket_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34`.
///
/// ## Note
/// Good enough for logs and the single-currency storefront; the UI does its
/// own locale-aware formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Multiplication by a cart quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
