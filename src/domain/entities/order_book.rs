//! # Order Book
//!
//! Depth snapshot returned by a venue.

use crate::domain::value_objects::{Symbol, Timestamp, VenueId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    /// Level price.
    pub price: Decimal,
    /// Quantity resting at the level.
    pub amount: Decimal,
}

impl OrderBookEntry {
    /// Creates a level.
    #[must_use]
    pub fn new(price: Decimal, amount: Decimal) -> Self {
        Self { price, amount }
    }

    /// Returns the notional value `price × amount`, zero on overflow.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.price.checked_mul(self.amount).unwrap_or(Decimal::ZERO)
    }
}

/// Bids (best first, descending) and asks (best first, ascending).
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::{OrderBook, OrderBookEntry};
/// use venue_liquidity::domain::value_objects::{Symbol, VenueId};
/// use rust_decimal::Decimal;
///
/// let book = OrderBook::new(
///     VenueId::Mock,
///     Symbol::new("SFRT").unwrap(),
///     vec![OrderBookEntry::new(Decimal::new(99, 0), Decimal::ONE)],
///     vec![OrderBookEntry::new(Decimal::new(101, 0), Decimal::ONE)],
/// );
/// assert_eq!(book.spread(), Some(Decimal::new(2, 0)));
/// assert_eq!(book.mid_price(), Some(Decimal::new(100, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    venue_id: VenueId,
    symbol: Symbol,
    bids: Vec<OrderBookEntry>,
    asks: Vec<OrderBookEntry>,
    timestamp: Timestamp,
}

impl OrderBook {
    /// Creates a book snapshot taken now.
    #[must_use]
    pub fn new(
        venue_id: VenueId,
        symbol: Symbol,
        bids: Vec<OrderBookEntry>,
        asks: Vec<OrderBookEntry>,
    ) -> Self {
        Self {
            venue_id,
            symbol,
            bids,
            asks,
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an empty book.
    #[must_use]
    pub fn empty(venue_id: VenueId, symbol: Symbol) -> Self {
        Self::new(venue_id, symbol, Vec::new(), Vec::new())
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

    /// Returns the bid levels.
    #[inline]
    #[must_use]
    pub fn bids(&self) -> &[OrderBookEntry] {
        &self.bids
    }

    /// Returns the ask levels.
    #[inline]
    #[must_use]
    pub fn asks(&self) -> &[OrderBookEntry] {
        &self.asks
    }

    /// Returns when the snapshot was taken.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the best bid price.
    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|e| e.price)
    }

    /// Returns the best ask price.
    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|e| e.price)
    }

    /// Returns `best_ask - best_bid` when both sides are quoted.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    /// Returns the midpoint of the best bid and ask.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        let sum = self.best_ask()?.checked_add(self.best_bid()?)?;
        Some(sum / Decimal::TWO)
    }

    /// Returns the summed notional of every bid and ask level.
    #[must_use]
    pub fn total_liquidity(&self) -> Decimal {
        self.bids
            .iter()
            .chain(self.asks.iter())
            .map(OrderBookEntry::total_value)
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
    }

    /// Returns true if neither side has levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
