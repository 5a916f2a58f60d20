//! # Balances and Trades
//!
//! Account balance and executed-trade records returned by venues.

use crate::domain::value_objects::{OrderSide, Symbol, Timestamp, VenueId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holdings of one asset at one venue.
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::Balance;
/// use venue_liquidity::domain::value_objects::{Symbol, VenueId};
/// use rust_decimal::Decimal;
///
/// let balance = Balance::new(
///     VenueId::Mock,
///     Symbol::new("JPY").unwrap(),
///     Decimal::new(700, 0),
///     Decimal::new(300, 0),
/// );
/// assert_eq!(balance.total(), Decimal::new(1000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    venue_id: VenueId,
    symbol: Symbol,
    available: Decimal,
    locked: Decimal,
    updated_at: Timestamp,
}

impl Balance {
    /// Creates a balance snapshot taken now.
    #[must_use]
    pub fn new(venue_id: VenueId, symbol: Symbol, available: Decimal, locked: Decimal) -> Self {
        Self {
            venue_id,
            symbol,
            available,
            locked,
            updated_at: Timestamp::now(),
        }
    }

    /// Returns the venue.
    #[inline]
    #[must_use]
    pub fn venue_id(&self) -> VenueId {
        self.venue_id
    }

    /// Returns the asset.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the freely usable amount.
    #[inline]
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.available
    }

    /// Returns the amount reserved by open orders.
    #[inline]
    #[must_use]
    pub fn locked(&self) -> Decimal {
        self.locked
    }

    /// Returns when the snapshot was taken.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns `available + locked`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.available.saturating_add(self.locked)
    }

    /// Returns true if at least `amount` is available.
    #[must_use]
    pub fn has_available(&self, amount: Decimal) -> bool {
        self.available >= amount
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Balance({} {} available={} locked={})",
            self.venue_id, self.symbol, self.available, self.locked
        )
    }
}

/// An executed trade from a venue's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    trade_id: String,
    venue_id: VenueId,
    symbol: Symbol,
    side: OrderSide,
    amount: Decimal,
    price: Decimal,
    fee: Decimal,
    executed_at: Timestamp,
}

impl Trade {
    /// Creates a trade record.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        trade_id: impl Into<String>,
        venue_id: VenueId,
        symbol: Symbol,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
        fee: Decimal,
        executed_at: Timestamp,
    ) -> Self {
        Self {
            trade_id: trade_id.into(),
            venue_id,
            symbol,
            side,
            amount,
            price,
            fee,
            executed_at,
        }
    }

    /// Returns the venue trade id.
    #[inline]
    #[must_use]
    pub fn trade_id(&self) -> &str {
        &self.trade_id
    }

    /// Returns the venue.
    #[inline]
    #[must_use]
    pub fn venue_id(&self) -> VenueId {
        self.venue_id
    }

    /// Returns the asset.
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

    /// Returns the executed quantity.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the execution price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the fee charged.
    #[inline]
    #[must_use]
    pub fn fee(&self) -> Decimal {
        self.fee
    }

    /// Returns when the trade executed.
    #[inline]
    #[must_use]
    pub fn executed_at(&self) -> Timestamp {
        self.executed_at
    }

    /// Returns `price × amount`, zero on overflow.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.price.checked_mul(self.amount).unwrap_or(Decimal::ZERO)
    }

    /// Returns the cash impact including fees: a buy costs the fee on top,
    /// a sell receives the total less the fee.
    #[must_use]
    pub fn net_value(&self) -> Decimal {
        match self.side {
            OrderSide::Buy => self.total_value().saturating_add(self.fee),
            OrderSide::Sell => self.total_value().saturating_sub(self.fee),
        }
    }

    /// Returns `fee / total_value`, or zero for a zero-value trade.
    #[must_use]
    pub fn fee_rate(&self) -> Decimal {
        self.fee.checked_div(self.total_value()).unwrap_or(Decimal::ZERO)
    }
}
