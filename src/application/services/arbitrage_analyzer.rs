//! # Arbitrage Analyzer
//!
//! Detects buy-low/sell-high gaps across venue prices.
//!
//! The cheapest and the dearest venue are found in a single pass over the
//! price map. The gap is kept only if its profit rate falls inside the
//! configured band: below the floor it is not worth the fees, above the
//! ceiling it is more likely a stale or corrupt price than a real gap.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::application::services::arbitrage_analyzer::ArbitrageAnalyzer;
//! use venue_liquidity::domain::value_objects::{Symbol, VenueId};
//! use rust_decimal::Decimal;
//! use std::collections::BTreeMap;
//!
//! let analyzer = ArbitrageAnalyzer::default();
//! let prices = BTreeMap::from([
//!     (VenueId::Bitbank, Decimal::new(100, 0)),
//!     (VenueId::Coincheck, Decimal::new(103, 0)),
//!     (VenueId::Binance, Decimal::new(105, 0)),
//! ]);
//!
//! let opportunity = analyzer
//!     .find_opportunity(&Symbol::new("SFRT").unwrap(), &prices)
//!     .unwrap();
//! assert_eq!(opportunity.buy_venue(), VenueId::Bitbank);
//! assert_eq!(opportunity.sell_venue(), VenueId::Binance);
//! assert_eq!(opportunity.profit_rate(), Decimal::new(5, 2));
//! ```

use crate::domain::entities::ArbitrageOpportunity;
use crate::domain::value_objects::arithmetic::{ratio, CheckedArithmetic, RATE_SCALE};
use crate::domain::value_objects::{Symbol, VenueId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::debug;

/// Profit band and sizing for arbitrage detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitrageThresholds {
    /// Smallest accepted profit rate (inclusive).
    pub min_profit_threshold: Decimal,
    /// Largest accepted profit rate (inclusive).
    pub max_spread_threshold: Decimal,
    /// Quantity proposed for each leg.
    pub trade_amount: Decimal,
}

impl Default for ArbitrageThresholds {
    fn default() -> Self {
        Self {
            min_profit_threshold: dec!(0.01),
            max_spread_threshold: dec!(0.10),
            trade_amount: dec!(100000),
        }
    }
}

/// Stateless arbitrage detector.
#[derive(Debug, Clone, Default)]
pub struct ArbitrageAnalyzer {
    thresholds: ArbitrageThresholds,
}

impl ArbitrageAnalyzer {
    /// Creates an analyzer with the given thresholds.
    #[must_use]
    pub fn new(thresholds: ArbitrageThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the configured thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &ArbitrageThresholds {
        &self.thresholds
    }

    /// Looks for a qualified opportunity in `prices`.
    ///
    /// Returns `None` when fewer than two venues quote, when one venue is
    /// both cheapest and dearest, or when the profit rate falls outside the
    /// band. Ties keep the first venue in catalogue order.
    #[must_use]
    pub fn find_opportunity(
        &self,
        symbol: &Symbol,
        prices: &BTreeMap<VenueId, Decimal>,
    ) -> Option<ArbitrageOpportunity> {
        if prices.len() < 2 {
            return None;
        }

        let mut cheapest: Option<(VenueId, Decimal)> = None;
        let mut dearest: Option<(VenueId, Decimal)> = None;
        for (&venue_id, &price) in prices {
            if cheapest.is_none_or(|(_, min)| price < min) {
                cheapest = Some((venue_id, price));
            }
            if dearest.is_none_or(|(_, max)| price > max) {
                dearest = Some((venue_id, price));
            }
        }

        let ((buy_venue, buy_price), (sell_venue, sell_price)) = (cheapest?, dearest?);
        if buy_venue == sell_venue || buy_price <= Decimal::ZERO {
            return None;
        }

        let spread = sell_price.safe_sub(buy_price).ok()?;
        let profit_rate = ratio(spread, buy_price, RATE_SCALE).ok()?;
        if profit_rate < self.thresholds.min_profit_threshold
            || profit_rate > self.thresholds.max_spread_threshold
        {
            debug!(%buy_venue, %sell_venue, %profit_rate, "price gap outside arbitrage band");
            return None;
        }

        ArbitrageOpportunity::new(
            symbol.clone(),
            buy_venue,
            sell_venue,
            buy_price,
            sell_price,
            profit_rate,
            self.thresholds.trade_amount,
        )
        .ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sfrt() -> Symbol {
        Symbol::new("SFRT").unwrap()
    }

    #[test]
    fn accepts_gap_inside_band() {
        let prices = BTreeMap::from([
            (VenueId::Bitbank, dec!(100)),
            (VenueId::Coincheck, dec!(103)),
            (VenueId::Binance, dec!(105)),
        ]);
        let opportunity = ArbitrageAnalyzer::default()
            .find_opportunity(&sfrt(), &prices)
            .unwrap();
        assert_eq!(opportunity.buy_venue(), VenueId::Bitbank);
        assert_eq!(opportunity.sell_venue(), VenueId::Binance);
        assert_eq!(opportunity.profit_rate(), dec!(0.05));
        assert_eq!(opportunity.amount(), dec!(100000));
        assert_eq!(opportunity.expected_profit(), dec!(500000));
    }

    #[test]
    fn rejects_gap_below_floor() {
        let prices = BTreeMap::from([(VenueId::Bitbank, dec!(100)), (VenueId::Binance, dec!(100.3))]);
        assert!(ArbitrageAnalyzer::default()
            .find_opportunity(&sfrt(), &prices)
            .is_none());
    }

    #[test]
    fn rejects_gap_above_ceiling() {
        let prices = BTreeMap::from([(VenueId::Bitbank, dec!(100)), (VenueId::Binance, dec!(111))]);
        assert!(ArbitrageAnalyzer::default()
            .find_opportunity(&sfrt(), &prices)
            .is_none());
    }

    #[test]
    fn band_edges_are_inclusive() {
        let analyzer = ArbitrageAnalyzer::default();
        let floor = BTreeMap::from([(VenueId::Bitbank, dec!(100)), (VenueId::Okx, dec!(101))]);
        assert_eq!(
            analyzer.find_opportunity(&sfrt(), &floor).unwrap().profit_rate(),
            dec!(0.01)
        );
        let ceiling = BTreeMap::from([(VenueId::Bitbank, dec!(100)), (VenueId::Okx, dec!(110))]);
        assert_eq!(
            analyzer.find_opportunity(&sfrt(), &ceiling).unwrap().profit_rate(),
            dec!(0.10)
        );
    }

    #[test]
    fn needs_two_prices() {
        let analyzer = ArbitrageAnalyzer::default();
        assert!(analyzer.find_opportunity(&sfrt(), &BTreeMap::new()).is_none());
        let single = BTreeMap::from([(VenueId::Bitbank, dec!(100))]);
        assert!(analyzer.find_opportunity(&sfrt(), &single).is_none());
    }

    #[test]
    fn flat_prices_have_no_opportunity() {
        let prices = BTreeMap::from([(VenueId::Bitbank, dec!(100)), (VenueId::Okx, dec!(100))]);
        assert!(ArbitrageAnalyzer::default()
            .find_opportunity(&sfrt(), &prices)
            .is_none());
    }

    #[test]
    fn rate_is_rounded_half_up() {
        // 3 / 97 = 0.030927.. -> 0.0309
        let prices = BTreeMap::from([(VenueId::Bitbank, dec!(97)), (VenueId::Okx, dec!(100))]);
        let opportunity = ArbitrageAnalyzer::default()
            .find_opportunity(&sfrt(), &prices)
            .unwrap();
        assert_eq!(opportunity.profit_rate(), dec!(0.0309));
    }

    #[test]
    fn custom_thresholds() {
        let analyzer = ArbitrageAnalyzer::new(ArbitrageThresholds {
            min_profit_threshold: dec!(0.001),
            max_spread_threshold: dec!(0.5),
            trade_amount: dec!(10),
        });
        let prices = BTreeMap::from([(VenueId::Bitbank, dec!(100)), (VenueId::Binance, dec!(100.3))]);
        let opportunity = analyzer.find_opportunity(&sfrt(), &prices).unwrap();
        assert_eq!(opportunity.profit_rate(), dec!(0.003));
        assert_eq!(opportunity.amount(), dec!(10));
    }
}
