//! # Checked Arithmetic
//!
//! Traits and utilities for safe decimal arithmetic.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//! - [`round_half_up`] - Fixed-scale rounding used for prices and rates
//! - [`ratio`] - Division rounded half-up to a fixed number of places
//!
//! Prices are reported at 2 decimal places; rates (deviation, volatility,
//! profit rate) at 4.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::domain::value_objects::arithmetic::{ratio, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let a = Decimal::new(100, 0);
//! let b = Decimal::new(3, 0);
//! assert!(a.safe_div(b).is_ok());
//!
//! // (105 - 100) / 100 at 4 places
//! let rate = ratio(Decimal::new(5, 0), Decimal::new(100, 0), 4).unwrap();
//! assert_eq!(rate, Decimal::new(500, 4));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Scale used for reported prices.
pub const PRICE_SCALE: u32 = 2;

/// Scale used for rates such as deviation, volatility and profit rate.
pub const RATE_SCALE: u32 = 4;

/// Failure of a checked decimal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic operation resulted in underflow.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Rounds `value` to `dp` decimal places, ties away from zero.
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::value_objects::arithmetic::round_half_up;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_half_up(Decimal::new(12345, 4), 3), Decimal::new(1235, 3));
/// assert_eq!(round_half_up(Decimal::new(-12345, 4), 3), Decimal::new(-1235, 3));
/// ```
#[inline]
#[must_use]
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides and rounds the quotient half-up to `dp` decimal places.
///
/// # Errors
///
/// Returns `ArithmeticError::DivisionByZero` if the denominator is zero and
/// `ArithmeticError::Overflow` if the quotient cannot be represented.
#[inline]
pub fn ratio(numerator: Decimal, denominator: Decimal, dp: u32) -> ArithmeticResult<Decimal> {
    numerator
        .safe_div(denominator)
        .map(|quotient| round_half_up(quotient, dp))
}

/// Trait for checked arithmetic operations.
///
/// Provides safe arithmetic methods that return `Result` instead of
/// panicking on overflow, underflow, or division by zero.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely subtract two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would underflow.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely divide two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    mod arithmetic_error {
        use super::*;

        #[test]
        fn display_formats_correctly() {
            assert_eq!(ArithmeticError::Overflow.to_string(), "arithmetic overflow");
            assert_eq!(
                ArithmeticError::DivisionByZero.to_string(),
                "division by zero"
            );
            assert_eq!(ArithmeticError::Underflow.to_string(), "arithmetic underflow");
        }
    }

    mod rounding {
        use super::*;

        #[test]
        fn half_up_rounds_midpoint_away_from_zero() {
            assert_eq!(round_half_up(dec!(0.33335), RATE_SCALE), dec!(0.3334));
            assert_eq!(round_half_up(dec!(-0.06665), RATE_SCALE), dec!(-0.0667));
            assert_eq!(round_half_up(dec!(101.005), PRICE_SCALE), dec!(101.01));
        }

        #[test]
        fn below_midpoint_rounds_down() {
            assert_eq!(round_half_up(dec!(0.33333), RATE_SCALE), dec!(0.3333));
        }
    }

    mod ratio_tests {
        use super::*;

        #[test]
        fn deviation_of_two_hundred_against_one_fifty() {
            assert_eq!(ratio(dec!(50), dec!(150), RATE_SCALE).unwrap(), dec!(0.3333));
        }

        #[test]
        fn negative_deviation_keeps_sign() {
            assert_eq!(
                ratio(dec!(-10), dec!(150), RATE_SCALE).unwrap(),
                dec!(-0.0667)
            );
        }

        #[test]
        fn by_zero_fails() {
            assert_eq!(
                ratio(dec!(1), Decimal::ZERO, RATE_SCALE),
                Err(ArithmeticError::DivisionByZero)
            );
        }
    }

    mod checked_arithmetic_decimal {
        use super::*;

        #[test]
        fn safe_add_works() {
            assert_eq!(dec!(100).safe_add(dec!(50)).unwrap(), dec!(150));
        }

        #[test]
        fn safe_sub_works() {
            assert_eq!(dec!(100).safe_sub(dec!(50)).unwrap(), dec!(50));
        }

        #[test]
        fn safe_mul_works() {
            assert_eq!(dec!(10).safe_mul(dec!(5)).unwrap(), dec!(50));
        }

        #[test]
        fn safe_mul_overflow_fails() {
            assert_eq!(
                Decimal::MAX.safe_mul(dec!(2)),
                Err(ArithmeticError::Overflow)
            );
        }

        #[test]
        fn safe_div_by_zero_fails() {
            assert_eq!(
                dec!(100).safe_div(Decimal::ZERO),
                Err(ArithmeticError::DivisionByZero)
            );
        }
    }
}
