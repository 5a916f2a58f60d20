//! # Venue Client Trait
//!
//! Port definition for exchange integrations.
//!
//! This module defines the [`VenueClient`] trait that every exchange
//! integration implements. It provides a uniform interface for price
//! queries, order placement, account state and venue metadata.
//!
//! Ordinary "no price" conditions are reported through the return value
//! (`Ok(None)`), not as errors. Errors are reserved for faults: timeouts,
//! rejected credentials, broken payloads.
//!
//! # Examples
//!
//! ```ignore
//! use venue_liquidity::infrastructure::venues::traits::VenueClient;
//!
//! struct MyExchangeClient { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl VenueClient for MyExchangeClient {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::{
    Balance, ComplianceStatus, OrderBook, OrderResult, Trade, TradingLimits,
};
use crate::domain::value_objects::{OrderSide, OrderStatus, Symbol, Timestamp, VenueId};
use crate::infrastructure::venues::error::VenueResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;

/// Uniform capability set of one trading venue.
///
/// Implementations must be safe to call concurrently from several tasks.
///
/// # Implementation Notes
///
/// - `is_available` never fails; an unreachable venue answers `false`
/// - order placement answers with an [`OrderResult`] whose status tells
///   accepted from rejected; `Err` means the request itself failed
/// - callers apply their own timeouts
#[async_trait]
pub trait VenueClient: Send + Sync + fmt::Debug {
    /// Returns the venue this client talks to.
    fn venue_id(&self) -> VenueId;

    /// Returns true if the venue is reachable and accepting requests.
    async fn is_available(&self) -> bool;

    /// Returns the last traded price of `symbol` in `quote_currency`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the venue currently has no price for the pair.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn current_price(
        &self,
        symbol: &Symbol,
        quote_currency: &Symbol,
    ) -> VenueResult<Option<Decimal>>;

    /// Places a market order.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn place_market_order(
        &self,
        symbol: &Symbol,
        amount: Decimal,
        side: OrderSide,
    ) -> VenueResult<OrderResult>;

    /// Places a limit order.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn place_limit_order(
        &self,
        symbol: &Symbol,
        amount: Decimal,
        price: Decimal,
        side: OrderSide,
    ) -> VenueResult<OrderResult>;

    /// Returns the account balance of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn balance(&self, symbol: &Symbol) -> VenueResult<Balance>;

    /// Returns the account's trades in `symbol` executed at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn trade_history(&self, symbol: &Symbol, since: Timestamp) -> VenueResult<Vec<Trade>>;

    /// Returns up to `depth` levels of each side of the book.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn order_book(&self, symbol: &Symbol, depth: usize) -> VenueResult<OrderBook>;

    /// Returns the account's trading limits on this venue.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn trading_limits(&self) -> VenueResult<TradingLimits>;

    /// Returns the account's compliance standing on this venue.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn compliance_status(&self) -> VenueResult<ComplianceStatus>;

    /// Cancels a working order.
    ///
    /// # Returns
    ///
    /// `true` if the order was working and is now cancelled.
    ///
    /// # Errors
    ///
    /// Returns a `VenueError` if the request fails.
    async fn cancel_order(&self, order_id: &str) -> VenueResult<bool>;

    /// Returns the lifecycle state of an order.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::OrderNotFound` for unknown ids.
    async fn order_status(&self, order_id: &str) -> VenueResult<OrderStatus>;
}
