//! # Liquidity Operations
//!
//! A requested order ([`LiquidityOperation`]) and the record of what
//! happened when it was dispatched ([`LiquidityResult`]).
//!
//! Both are immutable. A retry is a new operation with a new id.

use crate::domain::entities::order_result::OrderResult;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    LiquidityOperationType, OrderSide, Symbol, Timestamp, VenueId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Lowest priority.
pub const MIN_PRIORITY: u8 = 1;
/// Highest priority.
pub const MAX_PRIORITY: u8 = 10;
/// Priority assigned when none is given.
pub const DEFAULT_PRIORITY: u8 = 5;

/// A requested buy or sell.
///
/// # Invariants
///
/// - `amount > 0`
/// - limit operations carry a positive limit price, market operations none
/// - `priority` in `1..=10`
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::LiquidityOperation;
/// use venue_liquidity::domain::value_objects::Symbol;
/// use rust_decimal::Decimal;
///
/// let op = LiquidityOperation::market_sell(
///     Symbol::new("SFRT").unwrap(),
///     Decimal::new(1000, 0),
///     "price stabilisation",
/// )
/// .unwrap()
/// .with_priority(42);
///
/// assert!(op.is_sell());
/// assert_eq!(op.priority(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityOperation {
    id: Uuid,
    operation_type: LiquidityOperationType,
    symbol: Symbol,
    amount: Decimal,
    limit_price: Option<Decimal>,
    reason: String,
    priority: u8,
    created_at: Timestamp,
}

impl LiquidityOperation {
    fn build(
        operation_type: LiquidityOperationType,
        symbol: Symbol,
        amount: Decimal,
        limit_price: Option<Decimal>,
        reason: impl Into<String>,
    ) -> DomainResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::invalid_amount(format!(
                "operation amount must be positive, got {}",
                amount
            )));
        }
        if let Some(price) = limit_price.filter(|p| *p <= Decimal::ZERO) {
            return Err(DomainError::invalid_price(format!(
                "limit price must be positive, got {}",
                price
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            operation_type,
            symbol,
            amount,
            limit_price,
            reason: reason.into(),
            priority: DEFAULT_PRIORITY,
            created_at: Timestamp::now(),
        })
    }

    /// Creates a market buy.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if `amount` is not positive.
    pub fn market_buy(
        symbol: Symbol,
        amount: Decimal,
        reason: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::build(LiquidityOperationType::MarketBuy, symbol, amount, None, reason)
    }

    /// Creates a market sell.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if `amount` is not positive.
    pub fn market_sell(
        symbol: Symbol,
        amount: Decimal,
        reason: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::build(LiquidityOperationType::MarketSell, symbol, amount, None, reason)
    }

    /// Creates a limit buy.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` or `price` is not positive.
    pub fn limit_buy(
        symbol: Symbol,
        amount: Decimal,
        price: Decimal,
        reason: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::build(
            LiquidityOperationType::LimitBuy,
            symbol,
            amount,
            Some(price),
            reason,
        )
    }

    /// Creates a limit sell.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` or `price` is not positive.
    pub fn limit_sell(
        symbol: Symbol,
        amount: Decimal,
        price: Decimal,
        reason: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::build(
            LiquidityOperationType::LimitSell,
            symbol,
            amount,
            Some(price),
            reason,
        )
    }

    /// Creates a market order on `side`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if `amount` is not positive.
    pub fn market(
        side: OrderSide,
        symbol: Symbol,
        amount: Decimal,
        reason: impl Into<String>,
    ) -> DomainResult<Self> {
        match side {
            OrderSide::Buy => Self::market_buy(symbol, amount, reason),
            OrderSide::Sell => Self::market_sell(symbol, amount, reason),
        }
    }

    /// Returns a copy with the priority clamped to `1..=10`.
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
        self
    }

    /// Returns the operation id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the operation type.
    #[inline]
    #[must_use]
    pub fn operation_type(&self) -> LiquidityOperationType {
        self.operation_type
    }

    /// Returns the symbol.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the requested quantity.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the limit price for limit operations.
    #[inline]
    #[must_use]
    pub fn limit_price(&self) -> Option<Decimal> {
        self.limit_price
    }

    /// Returns the free-text reason.
    #[inline]
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the priority.
    #[inline]
    #[must_use]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Returns when the operation was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the order side.
    #[inline]
    #[must_use]
    pub fn side(&self) -> OrderSide {
        self.operation_type.side()
    }

    /// Returns true for buys.
    #[inline]
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side().is_buy()
    }

    /// Returns true for sells.
    #[inline]
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.side().is_sell()
    }

    /// Returns true for market orders.
    #[inline]
    #[must_use]
    pub fn is_market(&self) -> bool {
        self.operation_type.is_market()
    }

    /// Returns true for limit orders.
    #[inline]
    #[must_use]
    pub fn is_limit(&self) -> bool {
        self.operation_type.is_limit()
    }

    /// Returns the notional value at the limit price, or at `market_price`
    /// for market orders.
    #[must_use]
    pub fn estimated_value(&self, market_price: Decimal) -> Decimal {
        let price = self.limit_price.unwrap_or(market_price);
        self.amount.checked_mul(price).unwrap_or(Decimal::ZERO)
    }
}

impl fmt::Display for LiquidityOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.operation_type, self.amount, self.symbol
        )?;
        if let Some(price) = self.limit_price {
            write!(f, " @ {}", price)?;
        }
        write!(f, " (p{}: {})", self.priority, self.reason)
    }
}

/// The outcome of dispatching one [`LiquidityOperation`].
///
/// Holds either the venue's [`OrderResult`] or an error message, the venue
/// that handled the operation (if one was selected) and the elapsed time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityResult {
    operation: LiquidityOperation,
    order_result: Option<OrderResult>,
    error: Option<String>,
    venue_id: Option<VenueId>,
    execution_time: Duration,
    completed_at: Timestamp,
}

impl LiquidityResult {
    /// Wraps a venue's answer.
    ///
    /// A rejected or failed `OrderResult` yields an unsuccessful result that
    /// carries the venue's error message.
    #[must_use]
    pub fn from_order(
        operation: LiquidityOperation,
        order_result: OrderResult,
        execution_time: Duration,
    ) -> Self {
        let error = if order_result.is_success() {
            None
        } else {
            Some(
                order_result
                    .error_message()
                    .unwrap_or("order was not accepted")
                    .to_string(),
            )
        };
        Self {
            venue_id: Some(order_result.venue_id()),
            operation,
            order_result: Some(order_result),
            error,
            execution_time,
            completed_at: Timestamp::now(),
        }
    }

    /// Creates a failure that never produced an order.
    #[must_use]
    pub fn failure(
        operation: LiquidityOperation,
        venue_id: Option<VenueId>,
        message: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self {
            operation,
            order_result: None,
            error: Some(message.into()),
            venue_id,
            execution_time,
            completed_at: Timestamp::now(),
        }
    }

    /// Returns true if the venue accepted the order.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.order_result.as_ref().is_some_and(OrderResult::is_success)
    }

    /// Returns the originating operation.
    #[inline]
    #[must_use]
    pub fn operation(&self) -> &LiquidityOperation {
        &self.operation
    }

    /// Returns the venue's answer, if an order was submitted.
    #[inline]
    #[must_use]
    pub fn order_result(&self) -> Option<&OrderResult> {
        self.order_result.as_ref()
    }

    /// Returns the error message for unsuccessful results.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the venue that handled the operation.
    #[inline]
    #[must_use]
    pub fn venue_id(&self) -> Option<VenueId> {
        self.venue_id
    }

    /// Returns how long the dispatch took.
    #[inline]
    #[must_use]
    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    /// Returns when the result was recorded.
    #[inline]
    #[must_use]
    pub fn completed_at(&self) -> Timestamp {
        self.completed_at
    }

    /// Returns the executed quantity, zero if nothing executed.
    #[must_use]
    pub fn executed_amount(&self) -> Decimal {
        self.order_result
            .as_ref()
            .map_or(Decimal::ZERO, OrderResult::executed_amount)
    }
}

impl fmt::Display for LiquidityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let venue = self
            .venue_id
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        match &self.error {
            None => write!(f, "OK [{}] via {} in {:?}", self.operation, venue, self.execution_time),
            Some(err) => write!(f, "FAILED [{}] via {}: {}", self.operation, venue, err),
        }
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

    mod liquidity_operation {
        use super::*;

        #[test]
        fn constructors_set_type_and_side() {
            let buy = LiquidityOperation::market_buy(sfrt(), dec!(10), "r").unwrap();
            assert!(buy.is_buy() && buy.is_market());
            assert_eq!(buy.limit_price(), None);

            let sell = LiquidityOperation::limit_sell(sfrt(), dec!(10), dec!(151), "r").unwrap();
            assert!(sell.is_sell() && sell.is_limit());
            assert_eq!(sell.limit_price(), Some(dec!(151)));
        }

        #[test]
        fn rejects_non_positive_amount() {
            assert!(LiquidityOperation::market_buy(sfrt(), Decimal::ZERO, "r").is_err());
            assert!(LiquidityOperation::market_sell(sfrt(), dec!(-1), "r").is_err());
        }

        #[test]
        fn rejects_non_positive_limit_price() {
            let err = LiquidityOperation::limit_buy(sfrt(), dec!(1), Decimal::ZERO, "r").unwrap_err();
            assert!(matches!(err, DomainError::InvalidPrice(_)));
        }

        #[test]
        fn priority_is_clamped() {
            let op = LiquidityOperation::market_buy(sfrt(), dec!(1), "r").unwrap();
            assert_eq!(op.priority(), DEFAULT_PRIORITY);
            assert_eq!(op.clone().with_priority(0).priority(), 1);
            assert_eq!(op.clone().with_priority(11).priority(), 10);
            assert_eq!(op.with_priority(7).priority(), 7);
        }

        #[test]
        fn estimated_value_prefers_limit_price() {
            let market = LiquidityOperation::market_buy(sfrt(), dec!(10), "r").unwrap();
            assert_eq!(market.estimated_value(dec!(150)), dec!(1500));
            let limit = LiquidityOperation::limit_buy(sfrt(), dec!(10), dec!(140), "r").unwrap();
            assert_eq!(limit.estimated_value(dec!(150)), dec!(1400));
        }

        #[test]
        fn market_dispatches_on_side() {
            let op = LiquidityOperation::market(OrderSide::Sell, sfrt(), dec!(1), "r").unwrap();
            assert_eq!(op.operation_type(), LiquidityOperationType::MarketSell);
        }

        #[test]
        fn each_operation_has_a_fresh_id() {
            let a = LiquidityOperation::market_buy(sfrt(), dec!(1), "r").unwrap();
            let b = LiquidityOperation::market_buy(sfrt(), dec!(1), "r").unwrap();
            assert_ne!(a.id(), b.id());
        }
    }

    mod liquidity_result {
        use super::*;

        fn op() -> LiquidityOperation {
            LiquidityOperation::market_buy(sfrt(), dec!(10), "test").unwrap()
        }

        #[test]
        fn from_filled_order_is_success() {
            let order =
                OrderResult::filled(VenueId::Mock, "o", sfrt(), OrderSide::Buy, dec!(10), dec!(150));
            let result = LiquidityResult::from_order(op(), order, Duration::from_millis(5));
            assert!(result.is_success());
            assert_eq!(result.venue_id(), Some(VenueId::Mock));
            assert_eq!(result.executed_amount(), dec!(10));
            assert!(result.error().is_none());
        }

        #[test]
        fn from_rejected_order_is_failure_with_venue_message() {
            let order =
                OrderResult::rejected(VenueId::Mock, sfrt(), OrderSide::Buy, dec!(10), "no funds");
            let result = LiquidityResult::from_order(op(), order, Duration::ZERO);
            assert!(!result.is_success());
            assert_eq!(result.error(), Some("no funds"));
            assert!(result.order_result().is_some());
        }

        #[test]
        fn failure_without_venue() {
            let result =
                LiquidityResult::failure(op(), None, "no suitable venue", Duration::ZERO);
            assert!(!result.is_success());
            assert_eq!(result.venue_id(), None);
            assert_eq!(result.executed_amount(), Decimal::ZERO);
            assert!(result.to_string().contains("no suitable venue"));
        }
    }
}
