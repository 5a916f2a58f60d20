//! # Venue Metrics
//!
//! Per-venue health and quality snapshot, rebuilt on every aggregation pass.
//!
//! The quality score lives in `[0, 100]`:
//!
//! | component | points                                  |
//! |-----------|-----------------------------------------|
//! | base      | 50 when available                       |
//! | liquidity | `liquidity / 10_000_000`, at most 30    |
//! | latency   | 20 if ≤ 100 ms, 10 if ≤ 500 ms, else 0  |
//!
//! An unavailable venue always scores 0.

use crate::domain::entities::compliance::ComplianceStatus;
use crate::domain::entities::trading_limits::TradingLimits;
use crate::domain::value_objects::{Timestamp, VenueId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE_SCORE: Decimal = dec!(50);
const LIQUIDITY_SCORE_DIVISOR: Decimal = dec!(10000000);
const LIQUIDITY_SCORE_CAP: Decimal = dec!(30);
const FAST_RESPONSE_MS: u64 = 100;
const FAST_RESPONSE_SCORE: Decimal = dec!(20);
const SLOW_RESPONSE_MS: u64 = 500;
const SLOW_RESPONSE_SCORE: Decimal = dec!(10);
const MAX_SCORE: Decimal = dec!(100);

/// Snapshot of one venue's state.
///
/// # Invariants
///
/// - `available == false` implies `quality_score() == 0` and
///   `is_trading_available() == false`
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::VenueMetrics;
/// use venue_liquidity::domain::value_objects::VenueId;
/// use rust_decimal::Decimal;
///
/// let metrics = VenueMetrics::builder(VenueId::Binance)
///     .current_price(Decimal::new(150, 0))
///     .liquidity(Decimal::new(50_000_000, 0))
///     .response_time_ms(80)
///     .build();
///
/// // 50 base + 5 liquidity + 20 latency
/// assert_eq!(metrics.quality_score(), Decimal::new(75, 0));
///
/// let down = VenueMetrics::unavailable(VenueId::Bybit);
/// assert_eq!(down.quality_score(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueMetrics {
    venue_id: VenueId,
    available: bool,
    current_price: Decimal,
    liquidity: Decimal,
    spread: Option<Decimal>,
    volume_24h: Decimal,
    trading_limits: Option<TradingLimits>,
    compliance: Option<ComplianceStatus>,
    last_updated: Timestamp,
    response_time_ms: Option<u64>,
    fee_rate: Option<Decimal>,
    error: Option<String>,
}

impl VenueMetrics {
    /// Starts building metrics for an available venue.
    #[must_use]
    pub fn builder(venue_id: VenueId) -> VenueMetricsBuilder {
        VenueMetricsBuilder::new(venue_id)
    }

    /// Creates metrics for a venue that could not be queried.
    #[must_use]
    pub fn unavailable(venue_id: VenueId) -> Self {
        Self {
            venue_id,
            available: false,
            current_price: Decimal::ZERO,
            liquidity: Decimal::ZERO,
            spread: None,
            volume_24h: Decimal::ZERO,
            trading_limits: None,
            compliance: None,
            last_updated: Timestamp::now(),
            response_time_ms: None,
            fee_rate: None,
            error: None,
        }
    }

    /// Creates unavailable metrics recording why the query failed.
    #[must_use]
    pub fn unavailable_with_error(venue_id: VenueId, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::unavailable(venue_id)
        }
    }

    /// Returns the venue.
    #[inline]
    #[must_use]
    pub fn venue_id(&self) -> VenueId {
        self.venue_id
    }

    /// Returns true if the venue answered the health probe.
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Returns the last traded or quoted price.
    #[inline]
    #[must_use]
    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    /// Returns the summed bid and ask notional of the book.
    #[inline]
    #[must_use]
    pub fn liquidity(&self) -> Decimal {
        self.liquidity
    }

    /// Returns the top-of-book spread.
    #[inline]
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        self.spread
    }

    /// Returns the traded quantity over the last 24 hours.
    #[inline]
    #[must_use]
    pub fn volume_24h(&self) -> Decimal {
        self.volume_24h
    }

    /// Returns the trading limits.
    #[inline]
    #[must_use]
    pub fn trading_limits(&self) -> Option<&TradingLimits> {
        self.trading_limits.as_ref()
    }

    /// Returns the compliance status.
    #[inline]
    #[must_use]
    pub fn compliance(&self) -> Option<&ComplianceStatus> {
        self.compliance.as_ref()
    }

    /// Returns when the snapshot was taken.
    #[inline]
    #[must_use]
    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// Returns how long the venue took to answer, in milliseconds.
    #[inline]
    #[must_use]
    pub fn response_time_ms(&self) -> Option<u64> {
        self.response_time_ms
    }

    /// Returns the observed fee rate.
    #[inline]
    #[must_use]
    pub fn fee_rate(&self) -> Option<Decimal> {
        self.fee_rate
    }

    /// Returns the failure reason for unavailable venues.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if compliance permits trading.
    #[must_use]
    pub fn is_trading_enabled(&self) -> bool {
        self.compliance
            .as_ref()
            .is_some_and(ComplianceStatus::is_trading_enabled)
    }

    /// Returns true if the venue may receive an order: available, trading
    /// enabled, and quoting a positive price.
    #[must_use]
    pub fn is_trading_available(&self) -> bool {
        self.available && self.is_trading_enabled() && self.current_price > Decimal::ZERO
    }

    /// Computes the quality score in `[0, 100]`.
    #[must_use]
    pub fn quality_score(&self) -> Decimal {
        if !self.available {
            return Decimal::ZERO;
        }

        let mut score = BASE_SCORE;

        if self.liquidity > Decimal::ZERO {
            let liquidity_score = self
                .liquidity
                .checked_div(LIQUIDITY_SCORE_DIVISOR)
                .unwrap_or(LIQUIDITY_SCORE_CAP)
                .min(LIQUIDITY_SCORE_CAP);
            score += liquidity_score;
        }

        match self.response_time_ms {
            Some(ms) if ms <= FAST_RESPONSE_MS => score += FAST_RESPONSE_SCORE,
            Some(ms) if ms <= SLOW_RESPONSE_MS => score += SLOW_RESPONSE_SCORE,
            _ => {}
        }

        score.min(MAX_SCORE)
    }
}

impl fmt::Display for VenueMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VenueMetrics({} available={} price={} liquidity={} quality={})",
            self.venue_id,
            self.available,
            self.current_price,
            self.liquidity,
            self.quality_score()
        )
    }
}

/// Builder for [`VenueMetrics`] of an available venue.
#[derive(Debug, Clone)]
pub struct VenueMetricsBuilder {
    metrics: VenueMetrics,
}

impl VenueMetricsBuilder {
    /// Creates a builder for an available venue with empty readings.
    #[must_use]
    pub fn new(venue_id: VenueId) -> Self {
        Self {
            metrics: VenueMetrics {
                available: true,
                ..VenueMetrics::unavailable(venue_id)
            },
        }
    }

    /// Overrides availability.
    #[must_use]
    pub fn available(mut self, available: bool) -> Self {
        self.metrics.available = available;
        self
    }

    /// Sets the current price.
    #[must_use]
    pub fn current_price(mut self, price: Decimal) -> Self {
        self.metrics.current_price = price;
        self
    }

    /// Sets the book liquidity.
    #[must_use]
    pub fn liquidity(mut self, liquidity: Decimal) -> Self {
        self.metrics.liquidity = liquidity;
        self
    }

    /// Sets the spread.
    #[must_use]
    pub fn spread(mut self, spread: Option<Decimal>) -> Self {
        self.metrics.spread = spread;
        self
    }

    /// Sets the 24h volume.
    #[must_use]
    pub fn volume_24h(mut self, volume: Decimal) -> Self {
        self.metrics.volume_24h = volume;
        self
    }

    /// Sets the trading limits.
    #[must_use]
    pub fn trading_limits(mut self, limits: TradingLimits) -> Self {
        self.metrics.trading_limits = Some(limits);
        self
    }

    /// Sets the compliance status.
    #[must_use]
    pub fn compliance(mut self, compliance: ComplianceStatus) -> Self {
        self.metrics.compliance = Some(compliance);
        self
    }

    /// Sets the response time.
    #[must_use]
    pub fn response_time_ms(mut self, ms: u64) -> Self {
        self.metrics.response_time_ms = Some(ms);
        self
    }

    /// Sets the fee rate.
    #[must_use]
    pub fn fee_rate(mut self, fee_rate: Option<Decimal>) -> Self {
        self.metrics.fee_rate = fee_rate;
        self
    }

    /// Finishes the snapshot, stamping it now.
    #[must_use]
    pub fn build(mut self) -> VenueMetrics {
        self.metrics.last_updated = Timestamp::now();
        self.metrics
    }
}
