//! # Market Snapshot and Liquidity Decision
//!
//! [`MarketSnapshot`] aggregates the prices every responding venue reported
//! for one symbol; [`LiquidityDecision`] is what the liquidity controller
//! decides to do about it.

use crate::domain::errors::DomainResult;
use crate::domain::value_objects::arithmetic::{
    ratio, round_half_up, ArithmeticResult, CheckedArithmetic, PRICE_SCALE, RATE_SCALE,
};
use crate::domain::value_objects::{LiquidityAction, Symbol, Timestamp, VenueId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Minimum responding venues for a market to count as deep.
const HIGH_LIQUIDITY_MIN_VENUES: usize = 3;
/// Maximum volatility for a market to count as deep.
const HIGH_LIQUIDITY_MAX_VOLATILITY: Decimal = dec!(0.02);

/// Cross-venue price statistics.
///
/// # Invariants
///
/// - `is_valid()` iff `average_price > 0` and `venue_count > 0`
/// - `average_price` has 2 decimal places, `volatility` 4
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::MarketSnapshot;
/// use venue_liquidity::domain::value_objects::{Symbol, VenueId};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let prices = BTreeMap::from([
///     (VenueId::Bitbank, Decimal::new(100, 0)),
///     (VenueId::Binance, Decimal::new(110, 0)),
/// ]);
/// let snapshot = MarketSnapshot::from_prices(Symbol::new("SFRT").unwrap(), &prices).unwrap();
///
/// assert!(snapshot.is_valid());
/// assert_eq!(snapshot.average_price(), Decimal::new(105, 0));
/// assert_eq!(snapshot.volatility(), Decimal::new(1, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    symbol: Symbol,
    average_price: Decimal,
    min_price: Decimal,
    max_price: Decimal,
    volatility: Decimal,
    venue_count: usize,
    timestamp: Timestamp,
}

impl MarketSnapshot {
    /// Creates an invalid snapshot for a market nobody quoted.
    #[must_use]
    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            average_price: Decimal::ZERO,
            min_price: Decimal::ZERO,
            max_price: Decimal::ZERO,
            volatility: Decimal::ZERO,
            venue_count: 0,
            timestamp: Timestamp::now(),
        }
    }

    /// Builds a snapshot from per-venue prices.
    ///
    /// Non-positive prices are ignored. An empty map yields
    /// [`MarketSnapshot::empty`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` if summing the prices overflows.
    pub fn from_prices(symbol: Symbol, prices: &BTreeMap<VenueId, Decimal>) -> DomainResult<Self> {
        let usable: Vec<Decimal> = prices
            .values()
            .copied()
            .filter(|p| *p > Decimal::ZERO)
            .collect();

        let (Some(min_price), Some(max_price)) =
            (usable.iter().min().copied(), usable.iter().max().copied())
        else {
            return Ok(Self::empty(symbol));
        };

        let sum = usable
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.safe_add(*p))?;
        let average_price = ratio(sum, Decimal::from(usable.len()), PRICE_SCALE)?;
        let volatility = ratio(max_price.safe_sub(min_price)?, min_price, RATE_SCALE)?;

        Ok(Self {
            symbol,
            average_price,
            min_price,
            max_price,
            volatility,
            venue_count: usable.len(),
            timestamp: Timestamp::now(),
        })
    }

    /// Returns the symbol.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the mean price across venues.
    #[inline]
    #[must_use]
    pub fn average_price(&self) -> Decimal {
        self.average_price
    }

    /// Returns the lowest venue price.
    #[inline]
    #[must_use]
    pub fn min_price(&self) -> Decimal {
        self.min_price
    }

    /// Returns the highest venue price.
    #[inline]
    #[must_use]
    pub fn max_price(&self) -> Decimal {
        self.max_price
    }

    /// Returns `(max - min) / min`.
    #[inline]
    #[must_use]
    pub fn volatility(&self) -> Decimal {
        self.volatility
    }

    /// Returns how many venues reported a usable price.
    #[inline]
    #[must_use]
    pub fn venue_count(&self) -> usize {
        self.venue_count
    }

    /// Returns when the snapshot was taken.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns true if the snapshot can drive a decision.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.average_price > Decimal::ZERO && self.venue_count > 0
    }

    /// Returns `max - min`.
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.max_price.saturating_sub(self.min_price)
    }

    /// Returns true for a calm market quoted by at least three venues.
    #[must_use]
    pub fn has_high_liquidity(&self) -> bool {
        self.venue_count >= HIGH_LIQUIDITY_MIN_VENUES
            && self.volatility <= HIGH_LIQUIDITY_MAX_VOLATILITY
    }

    /// Returns `(average - target) / target` at 4 decimal places.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error if `target` is zero.
    pub fn deviation_from(&self, target: Decimal) -> ArithmeticResult<Decimal> {
        ratio(self.average_price.safe_sub(target)?, target, RATE_SCALE)
    }
}

impl fmt::Display for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Market({} avg={} min={} max={} vol={} venues={})",
            self.symbol,
            self.average_price,
            self.min_price,
            self.max_price,
            self.volatility,
            self.venue_count
        )
    }
}

/// What the liquidity controller decided to do this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityDecision {
    action: LiquidityAction,
    amount: Decimal,
    reason: String,
    priority: u8,
}

impl LiquidityDecision {
    /// Sell `amount` to pull the price down.
    #[must_use]
    pub fn stabilize_by_selling(amount: Decimal, reason: impl Into<String>) -> Self {
        Self::new(LiquidityAction::StabilizeBySelling, amount, reason, 8)
    }

    /// Buy `amount` to push the price up.
    #[must_use]
    pub fn stabilize_by_buying(amount: Decimal, reason: impl Into<String>) -> Self {
        Self::new(LiquidityAction::StabilizeByBuying, amount, reason, 8)
    }

    /// Seed `amount` of liquidity in a thin market.
    #[must_use]
    pub fn provide_liquidity(amount: Decimal, reason: impl Into<String>) -> Self {
        Self::new(LiquidityAction::ProvideLiquidity, amount, reason, 6)
    }

    /// Do nothing.
    #[must_use]
    pub fn hold_reserve(reason: impl Into<String>) -> Self {
        Self::new(LiquidityAction::HoldReserve, Decimal::ZERO, reason, 1)
    }

    fn new(action: LiquidityAction, amount: Decimal, reason: impl Into<String>, priority: u8) -> Self {
        Self {
            action,
            amount: round_half_up(amount, PRICE_SCALE),
            reason: reason.into(),
            priority,
        }
    }

    /// Returns the action.
    #[inline]
    #[must_use]
    pub fn action(&self) -> LiquidityAction {
        self.action
    }

    /// Returns the total amount to trade.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the human readable reason.
    #[inline]
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the priority given to the resulting operations.
    #[inline]
    #[must_use]
    pub fn priority(&self) -> u8 {
        self.priority
    }
}

impl fmt::Display for LiquidityDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.action, self.amount, self.reason)
    }
}
