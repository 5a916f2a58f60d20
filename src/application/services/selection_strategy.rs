//! # Selection Strategy
//!
//! Strategies for picking the venue that executes an operation.
//!
//! This module provides the [`SelectionStrategy`] trait and two
//! implementations. The multi-venue manager only depends on the trait, so
//! policies can be swapped through configuration.
//!
//! Both strategies consider eligible venues only: available, trading
//! enabled by compliance and quoting a positive price. A single eligible
//! venue is returned as-is. Metrics maps are `BTreeMap`s, so ties go to the
//! venue that comes first in catalogue order.

use crate::domain::entities::{LiquidityOperation, VenueMetrics};
use crate::domain::value_objects::{OrderSide, VenueId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Trait for venue selection strategies.
pub trait SelectionStrategy: Send + Sync + fmt::Debug {
    /// Picks the venue for `operation`, or `None` if no venue is eligible.
    fn select(
        &self,
        metrics: &BTreeMap<VenueId, VenueMetrics>,
        operation: &LiquidityOperation,
    ) -> Option<VenueId>;

    /// Returns the name of this strategy.
    fn name(&self) -> &'static str;
}

/// Selectable strategy implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategyKind {
    /// [`WeightedScoreSelection`].
    #[default]
    WeightedScore,
    /// [`BestPriceSelection`].
    BestPrice,
}

impl SelectionStrategyKind {
    /// Builds the strategy with its default parameters.
    #[must_use]
    pub fn build(self) -> Arc<dyn SelectionStrategy> {
        match self {
            Self::WeightedScore => Arc::new(WeightedScoreSelection::default()),
            Self::BestPrice => Arc::new(BestPriceSelection::new()),
        }
    }
}

impl fmt::Display for SelectionStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightedScore => write!(f, "weighted_score"),
            Self::BestPrice => write!(f, "best_price"),
        }
    }
}

/// Returns the eligible venues in catalogue order.
fn eligible(metrics: &BTreeMap<VenueId, VenueMetrics>) -> Vec<&VenueMetrics> {
    metrics
        .values()
        .filter(|m| m.is_trading_available())
        .collect()
}

/// Weighted score selection.
///
/// Score per venue:
/// - 50% of the venue's quality score
/// - liquidity in units of `liquidity_unit`, capped at `liquidity_cap`
/// - a flat `direction_bonus` for the operation's side
///
/// The directional bonus is the same for buys and sells. It does not yet
/// compare prices across venues; [`BestPriceSelection`] does.
#[derive(Debug, Clone)]
pub struct WeightedScoreSelection {
    /// Multiplier applied to the quality score.
    pub quality_weight: Decimal,
    /// Liquidity worth one point.
    pub liquidity_unit: Decimal,
    /// Maximum liquidity contribution.
    pub liquidity_cap: Decimal,
    /// Flat bonus added for the operation's side.
    pub direction_bonus: Decimal,
}

impl Default for WeightedScoreSelection {
    fn default() -> Self {
        Self {
            quality_weight: dec!(0.5),
            liquidity_unit: dec!(1000000),
            liquidity_cap: dec!(30),
            direction_bonus: dec!(10),
        }
    }
}

impl WeightedScoreSelection {
    /// Scores one venue for an operation on `side`.
    #[must_use]
    pub fn score(&self, metrics: &VenueMetrics, side: OrderSide) -> Decimal {
        let quality = metrics
            .quality_score()
            .checked_mul(self.quality_weight)
            .unwrap_or(Decimal::ZERO);
        let liquidity = metrics
            .liquidity()
            .checked_div(self.liquidity_unit)
            .unwrap_or(Decimal::ZERO)
            .min(self.liquidity_cap);
        let direction = match side {
            OrderSide::Buy => self.direction_bonus,
            OrderSide::Sell => self.direction_bonus,
        };
        quality
            .saturating_add(liquidity)
            .saturating_add(direction)
    }
}

impl SelectionStrategy for WeightedScoreSelection {
    fn select(
        &self,
        metrics: &BTreeMap<VenueId, VenueMetrics>,
        operation: &LiquidityOperation,
    ) -> Option<VenueId> {
        let candidates = eligible(metrics);
        if let [only] = candidates.as_slice() {
            return Some(only.venue_id());
        }

        let mut best: Option<VenueId> = None;
        let mut best_score = Decimal::ZERO;
        for candidate in candidates {
            let score = self.score(candidate, operation.side());
            if score > best_score {
                best_score = score;
                best = Some(candidate.venue_id());
            }
        }
        best
    }

    fn name(&self) -> &'static str {
        "WeightedScore"
    }
}

/// Best price selection.
///
/// Picks the cheapest venue for buys and the most expensive for sells.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestPriceSelection;

impl BestPriceSelection {
    /// Creates a new best price strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SelectionStrategy for BestPriceSelection {
    fn select(
        &self,
        metrics: &BTreeMap<VenueId, VenueMetrics>,
        operation: &LiquidityOperation,
    ) -> Option<VenueId> {
        // Strict comparison keeps the first venue on equal prices.
        eligible(metrics)
            .into_iter()
            .fold(None::<&VenueMetrics>, |best, candidate| match best {
                None => Some(candidate),
                Some(current) => {
                    let better = match operation.side() {
                        OrderSide::Buy => candidate.current_price() < current.current_price(),
                        OrderSide::Sell => candidate.current_price() > current.current_price(),
                    };
                    Some(if better { candidate } else { current })
                }
            })
            .map(VenueMetrics::venue_id)
    }

    fn name(&self) -> &'static str {
        "BestPrice"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::ComplianceStatus;
    use crate::domain::value_objects::Symbol;

    fn venue(id: VenueId, price: Decimal, liquidity: Decimal, latency_ms: u64) -> VenueMetrics {
        VenueMetrics::builder(id)
            .available(true)
            .current_price(price)
            .liquidity(liquidity)
            .compliance(ComplianceStatus::standard())
            .response_time_ms(latency_ms)
            .build()
    }

    fn map(venues: Vec<VenueMetrics>) -> BTreeMap<VenueId, VenueMetrics> {
        venues.into_iter().map(|m| (m.venue_id(), m)).collect()
    }

    fn buy() -> LiquidityOperation {
        LiquidityOperation::market_buy(Symbol::new("SFRT").unwrap(), dec!(1000), "test").unwrap()
    }

    fn sell() -> LiquidityOperation {
        LiquidityOperation::market_sell(Symbol::new("SFRT").unwrap(), dec!(1000), "test").unwrap()
    }

    mod weighted_score {
        use super::*;

        #[test]
        fn score_components() {
            let strategy = WeightedScoreSelection::default();
            // quality = 50 + 5 + 20 = 75 -> 37.5; liquidity 50M -> 30 (cap); bonus 10
            let metrics = venue(VenueId::Bitbank, dec!(150), dec!(50000000), 50);
            assert_eq!(strategy.score(&metrics, OrderSide::Buy), dec!(77.5));
            assert_eq!(
                strategy.score(&metrics, OrderSide::Sell),
                strategy.score(&metrics, OrderSide::Buy)
            );
        }

        #[test]
        fn picks_highest_score() {
            let metrics = map(vec![
                venue(VenueId::Bitbank, dec!(150), dec!(1000000), 800),
                venue(VenueId::Binance, dec!(151), dec!(20000000), 50),
                venue(VenueId::Okx, dec!(149), dec!(5000000), 300),
            ]);
            let selected = WeightedScoreSelection::default().select(&metrics, &buy());
            assert_eq!(selected, Some(VenueId::Binance));
        }

        #[test]
        fn single_eligible_venue_is_returned() {
            let metrics = map(vec![
                venue(VenueId::Coincheck, dec!(150), Decimal::ZERO, 5000),
                VenueMetrics::unavailable(VenueId::Bybit),
            ]);
            let selected = WeightedScoreSelection::default().select(&metrics, &sell());
            assert_eq!(selected, Some(VenueId::Coincheck));
        }

        #[test]
        fn no_eligible_venue_returns_none() {
            let metrics = map(vec![
                VenueMetrics::unavailable(VenueId::Bybit),
                VenueMetrics::unavailable(VenueId::Okx),
            ]);
            assert_eq!(WeightedScoreSelection::default().select(&metrics, &buy()), None);
            assert_eq!(
                WeightedScoreSelection::default().select(&BTreeMap::new(), &buy()),
                None
            );
        }

        #[test]
        fn trading_disabled_venue_is_skipped() {
            let disabled = VenueMetrics::builder(VenueId::Binance)
                .available(true)
                .current_price(dec!(150))
                .liquidity(dec!(900000000))
                .compliance(ComplianceStatus::standard().with_trading_enabled(false))
                .response_time_ms(10)
                .build();
            let metrics = map(vec![
                disabled,
                venue(VenueId::Bitbank, dec!(150), dec!(1000), 900),
                venue(VenueId::Okx, dec!(150), dec!(2000), 900),
            ]);
            let selected = WeightedScoreSelection::default().select(&metrics, &buy());
            assert_ne!(selected, Some(VenueId::Binance));
            assert!(selected.is_some());
        }

        #[test]
        fn ties_go_to_catalogue_order() {
            let metrics = map(vec![
                venue(VenueId::Okx, dec!(150), dec!(1000000), 50),
                venue(VenueId::Bitbank, dec!(150), dec!(1000000), 50),
            ]);
            let selected = WeightedScoreSelection::default().select(&metrics, &buy());
            assert_eq!(selected, Some(VenueId::Bitbank));
        }
    }

    mod best_price {
        use super::*;

        #[test]
        fn buys_cheapest_and_sells_dearest() {
            let metrics = map(vec![
                venue(VenueId::Bitbank, dec!(150), dec!(1000), 50),
                venue(VenueId::Binance, dec!(148), dec!(1000), 50),
                venue(VenueId::Okx, dec!(153), dec!(1000), 50),
            ]);
            let strategy = BestPriceSelection::new();
            assert_eq!(strategy.select(&metrics, &buy()), Some(VenueId::Binance));
            assert_eq!(strategy.select(&metrics, &sell()), Some(VenueId::Okx));
        }

        #[test]
        fn ignores_unavailable_venues() {
            let metrics = map(vec![
                VenueMetrics::unavailable(VenueId::Binance),
                venue(VenueId::Okx, dec!(153), dec!(1000), 50),
            ]);
            assert_eq!(
                BestPriceSelection::new().select(&metrics, &buy()),
                Some(VenueId::Okx)
            );
        }
    }

    #[test]
    fn kind_builds_named_strategy() {
        assert_eq!(SelectionStrategyKind::default().build().name(), "WeightedScore");
        assert_eq!(SelectionStrategyKind::BestPrice.build().name(), "BestPrice");
        assert_eq!(SelectionStrategyKind::BestPrice.to_string(), "best_price");
    }
}
