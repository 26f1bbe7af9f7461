//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The remote API speaks decimal soles (`"price": 10.99`), and the       │
//! │  original client did all of its math on those floats.                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Céntimos                                         │
//! │    Floats exist only at the serde boundary (see [`as_soles`]).          │
//! │    Everything past deserialization is exact i64 arithmetic.             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sigev_core::money::Money;
//!
//! // Create from céntimos (preferred)
//! let price = Money::from_cents(1099); // S/ 10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                     // S/ 21.98
//! let total = price + Money::from_cents(500);  // S/ 15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in céntimos (S/ 0.01, the smallest sol unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support (as céntimos; use [`as_soles`] for the
///   API's decimal representation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from céntimos.
    ///
    /// ## Example
    /// ```rust
    /// use sigev_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents S/ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (soles and céntimos).
    ///
    /// ## Example
    /// ```rust
    /// use sigev_core::money::Money;
    ///
    /// let price = Money::from_soles(10, 99); // S/ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_soles(-5, 50)` = -S/ 5.50, not -S/ 4.50
    #[inline]
    pub const fn from_soles(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in céntimos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (soles) portion.
    #[inline]
    pub const fn soles(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (céntimos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use sigev_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // S/ 2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // S/ 8.97
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Azúcar 1kg S/ 2.99
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: S/ 8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns the value as decimal soles, for the wire only.
    ///
    /// The remote API transmits prices and totals as decimal numbers.
    /// Display code should prefer [`Money::soles`] / [`Money::cents_part`].
    #[inline]
    pub fn to_soles_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Builds a Money from the wire's decimal soles.
    ///
    /// Rounds half away from zero to the nearest céntimo, so `10.995`
    /// becomes 1100 céntimos and `-10.995` becomes -1100.
    #[inline]
    pub fn from_soles_f64(soles: f64) -> Self {
        Money((soles * 100.0).round() as i64)
    }
}

// =============================================================================
// Wire Serialization (decimal soles)
// =============================================================================

/// Serde adapter mapping `Money` to the API's decimal-soles numbers.
///
/// ## Usage
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct Product {
///     #[serde(with = "sigev_core::money::as_soles")]
///     price: Money,
/// }
/// ```
///
/// Floats cross this boundary and nowhere else.
pub mod as_soles {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(money.to_soles_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let soles = f64::deserialize(deserializer)?;
        Ok(Money::from_soles_f64(soles))
    }

    /// Same adapter for `Option<Money>` fields.
    pub mod option {
        use super::super::Money;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(money: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match money {
                Some(m) => serializer.serialize_some(&m.to_soles_f64()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let soles = Option::<f64>::deserialize(deserializer)?;
            Ok(soles.map(Money::from_soles_f64))
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for reports and logs. Frontend hosts format for locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}S/ {}.{:02}", sign, self.soles().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Sum of an iterator of Money values.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
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
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.soles(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_soles() {
        let money = Money::from_soles(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_soles(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "S/ 10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "S/ 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-S/ 5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "S/ 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.cents(), 897);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 50].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 400);
    }

    #[test]
    fn test_wire_round_trip() {
        // The invoice threshold is the value the wire conversion must
        // never distort.
        let m = Money::from_soles_f64(700.0);
        assert_eq!(m.cents(), 70_000);
        assert_eq!(m.to_soles_f64(), 700.0);

        let m = Money::from_soles_f64(10.99);
        assert_eq!(m.cents(), 1099);
    }

    #[test]
    fn test_wire_rounding() {
        assert_eq!(Money::from_soles_f64(10.995).cents(), 1100);
        assert_eq!(Money::from_soles_f64(-10.995).cents(), -1100);
        // Classic float artifact: 0.1 + 0.2
        assert_eq!(Money::from_soles_f64(0.1 + 0.2).cents(), 30);
    }

    #[test]
    fn test_as_soles_serde() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wire {
            #[serde(with = "super::as_soles")]
            price: Money,
        }

        let wire: Wire = serde_json::from_str(r#"{"price": 700.0}"#).unwrap();
        assert_eq!(wire.price.cents(), 70_000);

        let json = serde_json::to_string(&Wire {
            price: Money::from_cents(2550),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":25.5}"#);
    }
}
