//! # Trading Limits
//!
//! Per-venue order size bounds and trading/withdrawal caps.

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Order size bounds and cumulative caps enforced by a venue.
///
/// # Invariants
///
/// - `min_order_amount <= max_order_amount`
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::TradingLimits;
/// use rust_decimal::Decimal;
///
/// let limits = TradingLimits::default();
/// assert!(limits.is_order_amount_valid(Decimal::new(5_000, 0)));
/// assert!(!limits.is_order_amount_valid(Decimal::new(50, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingLimits {
    min_order_amount: Decimal,
    max_order_amount: Decimal,
    daily_trading_limit: Decimal,
    monthly_trading_limit: Decimal,
    daily_withdrawal_limit: Decimal,
    monthly_withdrawal_limit: Decimal,
    max_active_orders: u32,
}

impl Default for TradingLimits {
    fn default() -> Self {
        Self {
            min_order_amount: dec!(100),
            max_order_amount: dec!(10000000),
            daily_trading_limit: dec!(50000000),
            monthly_trading_limit: dec!(1000000000),
            daily_withdrawal_limit: dec!(10000000),
            monthly_withdrawal_limit: dec!(300000000),
            max_active_orders: 100,
        }
    }
}

impl TradingLimits {
    /// Creates limits with the given order bounds and default caps.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLimits` if `min > max` and
    /// `DomainError::InvalidAmount` if either bound is negative.
    pub fn new(min_order_amount: Decimal, max_order_amount: Decimal) -> DomainResult<Self> {
        if min_order_amount.is_sign_negative() || max_order_amount.is_sign_negative() {
            return Err(DomainError::invalid_amount(
                "order bounds cannot be negative",
            ));
        }
        if min_order_amount > max_order_amount {
            return Err(DomainError::InvalidLimits {
                min: min_order_amount,
                max: max_order_amount,
            });
        }
        Ok(Self {
            min_order_amount,
            max_order_amount,
            ..Self::default()
        })
    }

    /// Sets the daily and monthly trading caps.
    #[must_use]
    pub fn with_trading_caps(mut self, daily: Decimal, monthly: Decimal) -> Self {
        self.daily_trading_limit = daily;
        self.monthly_trading_limit = monthly;
        self
    }

    /// Sets the daily and monthly withdrawal caps.
    #[must_use]
    pub fn with_withdrawal_caps(mut self, daily: Decimal, monthly: Decimal) -> Self {
        self.daily_withdrawal_limit = daily;
        self.monthly_withdrawal_limit = monthly;
        self
    }

    /// Sets the maximum number of concurrently open orders.
    #[must_use]
    pub fn with_max_active_orders(mut self, max_active_orders: u32) -> Self {
        self.max_active_orders = max_active_orders;
        self
    }

    /// Returns the minimum order amount.
    #[inline]
    #[must_use]
    pub fn min_order_amount(&self) -> Decimal {
        self.min_order_amount
    }

    /// Returns the maximum order amount.
    #[inline]
    #[must_use]
    pub fn max_order_amount(&self) -> Decimal {
        self.max_order_amount
    }

    /// Returns the daily trading cap.
    #[inline]
    #[must_use]
    pub fn daily_trading_limit(&self) -> Decimal {
        self.daily_trading_limit
    }

    /// Returns the monthly trading cap.
    #[inline]
    #[must_use]
    pub fn monthly_trading_limit(&self) -> Decimal {
        self.monthly_trading_limit
    }

    /// Returns the daily withdrawal cap.
    #[inline]
    #[must_use]
    pub fn daily_withdrawal_limit(&self) -> Decimal {
        self.daily_withdrawal_limit
    }

    /// Returns the monthly withdrawal cap.
    #[inline]
    #[must_use]
    pub fn monthly_withdrawal_limit(&self) -> Decimal {
        self.monthly_withdrawal_limit
    }

    /// Returns the maximum number of open orders.
    #[inline]
    #[must_use]
    pub fn max_active_orders(&self) -> u32 {
        self.max_active_orders
    }

    /// Returns true if `amount` lies within the order bounds (inclusive).
    #[must_use]
    pub fn is_order_amount_valid(&self, amount: Decimal) -> bool {
        amount >= self.min_order_amount && amount <= self.max_order_amount
    }

    /// Returns true if `traded_today` has passed the daily cap.
    #[must_use]
    pub fn is_daily_trading_limit_exceeded(&self, traded_today: Decimal) -> bool {
        traded_today > self.daily_trading_limit
    }

    /// Returns true if `traded_this_month` has passed the monthly cap.
    #[must_use]
    pub fn is_monthly_trading_limit_exceeded(&self, traded_this_month: Decimal) -> bool {
        traded_this_month > self.monthly_trading_limit
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let limits = TradingLimits::default();
        assert_eq!(limits.min_order_amount(), dec!(100));
        assert_eq!(limits.max_order_amount(), dec!(10000000));
        assert_eq!(limits.daily_trading_limit(), dec!(50000000));
        assert_eq!(limits.monthly_trading_limit(), dec!(1000000000));
        assert_eq!(limits.daily_withdrawal_limit(), dec!(10000000));
        assert_eq!(limits.monthly_withdrawal_limit(), dec!(300000000));
        assert_eq!(limits.max_active_orders(), 100);
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        let err = TradingLimits::new(dec!(10), dec!(5)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidLimits { .. }));
    }

    #[test]
    fn new_rejects_negative_bounds() {
        assert!(TradingLimits::new(dec!(-1), dec!(5)).is_err());
    }

    #[test]
    fn order_amount_bounds_are_inclusive() {
        let limits = TradingLimits::new(dec!(10), dec!(20)).unwrap();
        assert!(limits.is_order_amount_valid(dec!(10)));
        assert!(limits.is_order_amount_valid(dec!(20)));
        assert!(!limits.is_order_amount_valid(dec!(20.01)));
    }

    #[test]
    fn cap_checks() {
        let limits = TradingLimits::default().with_trading_caps(dec!(1000), dec!(5000));
        assert!(!limits.is_daily_trading_limit_exceeded(dec!(1000)));
        assert!(limits.is_daily_trading_limit_exceeded(dec!(1000.01)));
        assert!(limits.is_monthly_trading_limit_exceeded(dec!(6000)));
    }
}
