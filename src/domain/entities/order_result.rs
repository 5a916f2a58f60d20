//! # Order Result
//!
//! Outcome of submitting one order to one venue.

use crate::domain::value_objects::{OrderSide, OrderStatus, Symbol, Timestamp, VenueId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A venue's answer to a single order.
///
/// `success` means the venue accepted the order; whether anything executed
/// is reported by [`OrderResult::is_executed`].
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::OrderResult;
/// use venue_liquidity::domain::value_objects::{OrderSide, Symbol, VenueId};
/// use rust_decimal::Decimal;
///
/// let result = OrderResult::filled(
///     VenueId::Mock,
///     "ord-1",
///     Symbol::new("SFRT").unwrap(),
///     OrderSide::Buy,
///     Decimal::new(10, 0),
///     Decimal::new(150, 0),
/// );
/// assert!(result.is_success());
/// assert!(result.is_fully_executed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    success: bool,
    order_id: Option<String>,
    venue_id: VenueId,
    symbol: Symbol,
    side: OrderSide,
    requested_amount: Decimal,
    executed_amount: Decimal,
    requested_price: Option<Decimal>,
    executed_price: Option<Decimal>,
    status: OrderStatus,
    error_message: Option<String>,
    timestamp: Timestamp,
}

impl OrderResult {
    /// Creates an accepted, still working order.
    #[must_use]
    pub fn submitted(
        venue_id: VenueId,
        order_id: impl Into<String>,
        symbol: Symbol,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> Self {
        Self {
            success: true,
            order_id: Some(order_id.into()),
            venue_id,
            symbol,
            side,
            requested_amount: amount,
            executed_amount: Decimal::ZERO,
            requested_price: price,
            executed_price: None,
            status: OrderStatus::Submitted,
            error_message: None,
            timestamp: Timestamp::now(),
        }
    }

    /// Creates a fully executed order.
    #[must_use]
    pub fn filled(
        venue_id: VenueId,
        order_id: impl Into<String>,
        symbol: Symbol,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            executed_amount: amount,
            executed_price: Some(price),
            status: OrderStatus::Filled,
            ..Self::submitted(venue_id, order_id, symbol, side, amount, Some(price))
        }
    }

    /// Creates a partially executed order.
    #[must_use]
    pub fn partial(
        venue_id: VenueId,
        order_id: impl Into<String>,
        symbol: Symbol,
        side: OrderSide,
        requested_amount: Decimal,
        executed_amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            executed_amount,
            executed_price: Some(price),
            status: OrderStatus::PartiallyFilled,
            ..Self::submitted(venue_id, order_id, symbol, side, requested_amount, Some(price))
        }
    }

    /// Creates a failed submission.
    #[must_use]
    pub fn failure(
        venue_id: VenueId,
        symbol: Symbol,
        side: OrderSide,
        amount: Decimal,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            order_id: None,
            venue_id,
            symbol,
            side,
            requested_amount: amount,
            executed_amount: Decimal::ZERO,
            requested_price: None,
            executed_price: None,
            status: OrderStatus::Failed,
            error_message: Some(message.into()),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an order the venue refused.
    #[must_use]
    pub fn rejected(
        venue_id: VenueId,
        symbol: Symbol,
        side: OrderSide,
        amount: Decimal,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: OrderStatus::Rejected,
            ..Self::failure(venue_id, symbol, side, amount, message)
        }
    }

    /// Returns true if the venue accepted the order.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the venue order id.
    #[inline]
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    /// Returns the venue.
    #[inline]
    #[must_use]
    pub fn venue_id(&self) -> VenueId {
        self.venue_id
    }

    /// Returns the symbol.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the side.
    #[inline]
    #[must_use]
    pub fn side(&self) -> OrderSide {
        self.side
    }

    /// Returns the requested quantity.
    #[inline]
    #[must_use]
    pub fn requested_amount(&self) -> Decimal {
        self.requested_amount
    }

    /// Returns the executed quantity.
    #[inline]
    #[must_use]
    pub fn executed_amount(&self) -> Decimal {
        self.executed_amount
    }

    /// Returns the requested (limit) price.
    #[inline]
    #[must_use]
    pub fn requested_price(&self) -> Option<Decimal> {
        self.requested_price
    }

    /// Returns the average execution price.
    #[inline]
    #[must_use]
    pub fn executed_price(&self) -> Option<Decimal> {
        self.executed_price
    }

    /// Returns the order status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the error message, if the submission failed.
    #[inline]
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns when the result was produced.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns true if any quantity executed.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.success && self.status.is_success()
    }

    /// Returns true if the whole quantity executed.
    #[must_use]
    pub fn is_fully_executed(&self) -> bool {
        self.success && self.status == OrderStatus::Filled
    }

    /// Returns true if only part of the quantity executed.
    #[must_use]
    pub fn is_partially_executed(&self) -> bool {
        self.success && self.status == OrderStatus::PartiallyFilled
    }
}

impl fmt::Display for OrderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderResult({} {} {} {}/{} {} on {})",
            self.order_id.as_deref().unwrap_or("-"),
            self.side,
            self.symbol,
            self.executed_amount,
            self.requested_amount,
            self.status,
            self.venue_id
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sfrt() -> Symbol {
        Symbol::new("SFRT").unwrap()
    }

    #[test]
    fn submitted_is_success_but_not_executed() {
        let result = OrderResult::submitted(
            VenueId::Mock,
            "o-1",
            sfrt(),
            OrderSide::Sell,
            dec!(10),
            Some(dec!(150)),
        );
        assert!(result.is_success());
        assert!(!result.is_executed());
        assert!(result.status().is_active());
        assert_eq!(result.executed_amount(), Decimal::ZERO);
    }

    #[test]
    fn partial_reports_partial_execution() {
        let result = OrderResult::partial(
            VenueId::Mock,
            "o-2",
            sfrt(),
            OrderSide::Buy,
            dec!(10),
            dec!(4),
            dec!(149),
        );
        assert!(result.is_executed());
        assert!(result.is_partially_executed());
        assert!(!result.is_fully_executed());
        assert_eq!(result.executed_amount(), dec!(4));
    }

    #[test]
    fn failure_carries_message() {
        let result = OrderResult::failure(VenueId::Huobi, sfrt(), OrderSide::Buy, dec!(1), "boom");
        assert!(!result.is_success());
        assert_eq!(result.status(), OrderStatus::Failed);
        assert_eq!(result.error_message(), Some("boom"));
        assert!(result.order_id().is_none());
    }

    #[test]
    fn rejected_is_terminal_failure() {
        let result =
            OrderResult::rejected(VenueId::Huobi, sfrt(), OrderSide::Buy, dec!(1), "no funds");
        assert!(result.status().is_failure());
        assert!(result.status().is_complete());
    }

    #[test]
    fn display_contains_venue_and_status() {
        let result =
            OrderResult::filled(VenueId::Okx, "o-3", sfrt(), OrderSide::Sell, dec!(2), dec!(3));
        let display = result.to_string();
        assert!(display.contains("okx"));
        assert!(display.contains("FILLED"));
    }
}
