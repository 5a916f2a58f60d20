//! # Arbitrage Opportunity
//!
//! A qualified buy-low/sell-high gap between two venues.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Symbol, Timestamp, VenueId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A price gap worth trading.
///
/// # Invariants
///
/// - `buy_venue != sell_venue`
/// - `buy_price > 0`, `amount > 0`
///
/// Threshold qualification (profit rate band) is the analyzer's job; the
/// record itself only guards structural validity.
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::ArbitrageOpportunity;
/// use venue_liquidity::domain::value_objects::{Symbol, VenueId};
/// use rust_decimal::Decimal;
///
/// let opp = ArbitrageOpportunity::new(
///     Symbol::new("SFRT").unwrap(),
///     VenueId::Bitbank,
///     VenueId::Binance,
///     Decimal::new(100, 0),
///     Decimal::new(105, 0),
///     Decimal::new(500, 4),
///     Decimal::new(1000, 0),
/// )
/// .unwrap();
///
/// assert_eq!(opp.expected_profit(), Decimal::new(5000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    id: Uuid,
    symbol: Symbol,
    buy_venue: VenueId,
    sell_venue: VenueId,
    buy_price: Decimal,
    sell_price: Decimal,
    profit_rate: Decimal,
    amount: Decimal,
    detected_at: Timestamp,
}

impl ArbitrageOpportunity {
    /// Creates an opportunity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SameVenue` if both legs use one venue,
    /// `DomainError::InvalidPrice` for a non-positive buy price, and
    /// `DomainError::InvalidAmount` for a non-positive amount.
    pub fn new(
        symbol: Symbol,
        buy_venue: VenueId,
        sell_venue: VenueId,
        buy_price: Decimal,
        sell_price: Decimal,
        profit_rate: Decimal,
        amount: Decimal,
    ) -> DomainResult<Self> {
        if buy_venue == sell_venue {
            return Err(DomainError::SameVenue(buy_venue));
        }
        if buy_price <= Decimal::ZERO {
            return Err(DomainError::invalid_price("buy price must be positive"));
        }
        if amount <= Decimal::ZERO {
            return Err(DomainError::invalid_amount("arbitrage amount must be positive"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            symbol,
            buy_venue,
            sell_venue,
            buy_price,
            sell_price,
            profit_rate,
            amount,
            detected_at: Timestamp::now(),
        })
    }

    /// Returns the opportunity id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the symbol.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the venue to buy on.
    #[inline]
    #[must_use]
    pub fn buy_venue(&self) -> VenueId {
        self.buy_venue
    }

    /// Returns the venue to sell on.
    #[inline]
    #[must_use]
    pub fn sell_venue(&self) -> VenueId {
        self.sell_venue
    }

    /// Returns the buy-side price.
    #[inline]
    #[must_use]
    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }

    /// Returns the sell-side price.
    #[inline]
    #[must_use]
    pub fn sell_price(&self) -> Decimal {
        self.sell_price
    }

    /// Returns `(sell - buy) / buy`.
    #[inline]
    #[must_use]
    pub fn profit_rate(&self) -> Decimal {
        self.profit_rate
    }

    /// Returns the proposed quantity for each leg.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns when the gap was observed.
    #[inline]
    #[must_use]
    pub fn detected_at(&self) -> Timestamp {
        self.detected_at
    }

    /// Returns `(sell - buy) × amount`, before fees.
    #[must_use]
    pub fn expected_profit(&self) -> Decimal {
        self.sell_price
            .checked_sub(self.buy_price)
            .and_then(|gap| gap.checked_mul(self.amount))
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns true if selling pays more than buying costs.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.sell_price > self.buy_price
    }
}

impl fmt::Display for ArbitrageOpportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arbitrage({} buy {}@{} sell {}@{} rate={})",
            self.symbol,
            self.buy_venue,
            self.buy_price,
            self.sell_venue,
            self.sell_price,
            self.profit_rate
        )
    }
}
