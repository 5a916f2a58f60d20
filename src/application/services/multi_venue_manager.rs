//! # Multi-Venue Manager
//!
//! Single entry point for executing an operation on the best venue, plus
//! the periodic cross-venue arbitrage scan.
//!
//! `execute_optimally` chains metrics aggregation, venue selection and the
//! execution monitor. The arbitrage scan pulls current prices, asks the
//! analyzer for a gap and trades it leg by leg: the sell is only sent after
//! the buy succeeded, and a failed sell is reported as an open imbalance.
//! Nothing is unwound automatically.

use crate::application::error::ApplicationResult;
use crate::application::services::arbitrage_analyzer::ArbitrageAnalyzer;
use crate::application::services::execution_monitor::ExecutionMonitor;
use crate::application::services::metrics_aggregation::MetricsAggregator;
use crate::application::services::selection_strategy::SelectionStrategy;
use crate::application::services::trading_switch::TradingSwitch;
use crate::domain::entities::{ArbitrageOpportunity, LiquidityOperation, LiquidityResult};
use crate::domain::value_objects::{Symbol, VenueId};
use crate::infrastructure::venues::traits::VenueClient;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Failure reason used when no venue passes selection.
pub const NO_SUITABLE_VENUE: &str = "no suitable venue";

/// How the two legs of an arbitrage trade ended.
#[derive(Debug, Clone)]
pub enum ArbitrageExecution {
    /// Both legs were accepted.
    Completed {
        /// The buy leg.
        buy: LiquidityResult,
        /// The sell leg.
        sell: LiquidityResult,
    },
    /// The buy leg failed; no sell was sent.
    BuyFailed {
        /// The failed buy leg.
        buy: LiquidityResult,
    },
    /// The buy went through but the sell did not. The position stays open.
    SellFailed {
        /// The executed buy leg.
        buy: LiquidityResult,
        /// The failed sell leg.
        sell: LiquidityResult,
    },
}

impl ArbitrageExecution {
    /// Returns true if both legs were accepted.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns true if a bought position was left without its sell.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::SellFailed { .. })
    }
}

/// Outcome of one arbitrage scan.
#[derive(Debug, Clone)]
pub enum ArbitrageScanOutcome {
    /// Automatic trading was paused when the scan started.
    TradingPaused,
    /// Fewer than two venues quoted a price.
    InsufficientPrices(usize),
    /// Prices were available but no gap qualified.
    NoOpportunity,
    /// A gap was found but could not be turned into orders.
    Aborted(String),
    /// A gap was found and traded.
    Executed {
        /// The traded opportunity.
        opportunity: ArbitrageOpportunity,
        /// How the legs ended.
        execution: ArbitrageExecution,
    },
}

impl fmt::Display for ArbitrageScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TradingPaused => write!(f, "trading paused"),
            Self::InsufficientPrices(count) => write!(f, "insufficient prices ({count} venues)"),
            Self::NoOpportunity => write!(f, "no opportunity"),
            Self::Aborted(reason) => write!(f, "aborted: {reason}"),
            Self::Executed {
                opportunity,
                execution,
            } => write!(
                f,
                "{opportunity} completed={}",
                execution.is_completed()
            ),
        }
    }
}

/// Coordinates venue selection, execution and arbitrage.
#[derive(Debug, Clone)]
pub struct MultiVenueManager {
    aggregator: MetricsAggregator,
    strategy: Arc<dyn SelectionStrategy>,
    analyzer: ArbitrageAnalyzer,
    monitor: ExecutionMonitor,
    switch: Arc<TradingSwitch>,
    symbol: Symbol,
}

impl MultiVenueManager {
    /// Creates a manager trading `symbol`.
    #[must_use]
    pub fn new(
        aggregator: MetricsAggregator,
        strategy: Arc<dyn SelectionStrategy>,
        analyzer: ArbitrageAnalyzer,
        monitor: ExecutionMonitor,
        switch: Arc<TradingSwitch>,
        symbol: Symbol,
    ) -> Self {
        Self {
            aggregator,
            strategy,
            analyzer,
            monitor,
            switch,
            symbol,
        }
    }

    /// Returns the traded symbol.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the selection strategy name.
    #[must_use]
    pub fn selection_strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Returns the trading switch.
    #[must_use]
    pub fn trading_switch(&self) -> &Arc<TradingSwitch> {
        &self.switch
    }

    /// Executes `operation` on the best venue.
    ///
    /// Returns a failed result with reason [`NO_SUITABLE_VENUE`] when no
    /// venue passes selection.
    pub async fn execute_optimally(&self, operation: LiquidityOperation) -> LiquidityResult {
        let started = Instant::now();
        let metrics = self.aggregator.aggregate(operation.symbol()).await;

        let Some(venue_id) = self.strategy.select(&metrics, &operation) else {
            warn!(
                operation = %operation.operation_type(),
                venues = metrics.len(),
                "no suitable venue for operation"
            );
            return LiquidityResult::failure(operation, None, NO_SUITABLE_VENUE, started.elapsed());
        };

        debug!(venue = %venue_id, strategy = self.strategy.name(), "venue selected");
        self.execute_on(venue_id, operation).await
    }

    /// Returns strictly positive current prices of `symbol` by venue.
    pub async fn current_prices(&self, symbol: &Symbol) -> BTreeMap<VenueId, Decimal> {
        self.aggregator.current_prices(symbol).await
    }

    /// Returns the venues that currently report themselves available.
    pub async fn available_venues(&self) -> Vec<VenueId> {
        self.aggregator.available_venues().await
    }

    /// Returns the registered client for `venue_id`.
    #[must_use]
    pub fn venue_client(&self, venue_id: VenueId) -> Option<Arc<dyn VenueClient>> {
        self.aggregator.registry().get(venue_id)
    }

    /// Runs one arbitrage scan on the traded symbol.
    pub async fn run_arbitrage_scan(&self) -> ArbitrageScanOutcome {
        if !self.switch.is_enabled() {
            debug!("arbitrage scan skipped: automatic trading paused");
            return ArbitrageScanOutcome::TradingPaused;
        }

        let prices = self.current_prices(&self.symbol).await;
        if prices.len() < 2 {
            debug!(venues = prices.len(), "arbitrage scan skipped: insufficient prices");
            return ArbitrageScanOutcome::InsufficientPrices(prices.len());
        }

        let Some(opportunity) = self.analyzer.find_opportunity(&self.symbol, &prices) else {
            debug!("no arbitrage opportunity");
            return ArbitrageScanOutcome::NoOpportunity;
        };

        info!(%opportunity, expected_profit = %opportunity.expected_profit(), "arbitrage opportunity found");
        match self.execute_arbitrage(&opportunity).await {
            Ok(execution) => ArbitrageScanOutcome::Executed {
                opportunity,
                execution,
            },
            Err(e) => {
                error!(error = %e, "arbitrage execution aborted");
                ArbitrageScanOutcome::Aborted(e.to_string())
            }
        }
    }

    /// Trades `opportunity`: buy on the cheap venue, then sell on the dear one.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the legs cannot be built from
    /// the opportunity; no order is sent in that case.
    pub async fn execute_arbitrage(
        &self,
        opportunity: &ArbitrageOpportunity,
    ) -> ApplicationResult<ArbitrageExecution> {
        let route = format!("{} -> {}", opportunity.buy_venue(), opportunity.sell_venue());
        let buy_leg = LiquidityOperation::market_buy(
            opportunity.symbol().clone(),
            opportunity.amount(),
            format!("arbitrage buy {route}"),
        )?;
        let sell_leg = LiquidityOperation::market_sell(
            opportunity.symbol().clone(),
            opportunity.amount(),
            format!("arbitrage sell {route}"),
        )?;

        let buy = self.execute_on(opportunity.buy_venue(), buy_leg).await;
        if !buy.is_success() {
            error!(
                venue = %opportunity.buy_venue(),
                error = buy.error().unwrap_or_default(),
                "arbitrage buy failed"
            );
            return Ok(ArbitrageExecution::BuyFailed { buy });
        }

        let sell = self.execute_on(opportunity.sell_venue(), sell_leg).await;
        if sell.is_success() {
            info!(%route, amount = %opportunity.amount(), "arbitrage completed");
            Ok(ArbitrageExecution::Completed { buy, sell })
        } else {
            error!(
                %route,
                amount = %opportunity.amount(),
                error = sell.error().unwrap_or_default(),
                "arbitrage sell failed, position left open"
            );
            Ok(ArbitrageExecution::SellFailed { buy, sell })
        }
    }

    /// Executes `operation` on a specific venue, bypassing selection.
    pub async fn execute_on(
        &self,
        venue_id: VenueId,
        operation: LiquidityOperation,
    ) -> LiquidityResult {
        match self.venue_client(venue_id) {
            Some(client) => self.monitor.execute(client.as_ref(), operation).await,
            None => LiquidityResult::failure(
                operation,
                Some(venue_id),
                format!("venue {venue_id} is not registered"),
                Duration::ZERO,
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::metrics_aggregation::AggregationConfig;
    use crate::domain::value_objects::OrderSide;
    use crate::application::services::selection_strategy::WeightedScoreSelection;
    use crate::infrastructure::venues::error::VenueError;
    use crate::infrastructure::venues::registry::VenueRegistry;
    use crate::infrastructure::venues::simulated::SimulatedVenueClient;
    use rust_decimal_macros::dec;

    fn sfrt() -> Symbol {
        Symbol::new("SFRT").unwrap()
    }

    fn jpy() -> Symbol {
        Symbol::new("JPY").unwrap()
    }

    fn funded(venue_id: VenueId, price: Decimal) -> Arc<SimulatedVenueClient> {
        Arc::new(
            SimulatedVenueClient::new(venue_id, sfrt(), jpy())
                .with_price(price)
                .with_balance(sfrt(), dec!(1000000))
                .with_balance(jpy(), dec!(1000000000)),
        )
    }

    fn manager(clients: &[Arc<SimulatedVenueClient>]) -> MultiVenueManager {
        let registry = VenueRegistry::from_clients(
            clients
                .iter()
                .map(|c| Arc::clone(c) as Arc<dyn VenueClient>),
        );
        let aggregator = MetricsAggregator::new(
            Arc::new(registry),
            jpy(),
            AggregationConfig::with_timeout(500),
        );
        MultiVenueManager::new(
            aggregator,
            Arc::new(WeightedScoreSelection::default()),
            ArbitrageAnalyzer::default(),
            ExecutionMonitor::new(Duration::from_secs(1)),
            Arc::new(TradingSwitch::default()),
            sfrt(),
        )
    }

    mod execute_optimally {
        use super::*;

        #[tokio::test]
        async fn routes_to_available_venue() {
            let offline = funded(VenueId::Bitbank, dec!(150));
            offline.set_available(false);
            let online = funded(VenueId::Binance, dec!(151));
            let manager = manager(&[offline.clone(), online.clone()]);

            let operation = LiquidityOperation::market_sell(sfrt(), dec!(1000), "test").unwrap();
            let result = manager.execute_optimally(operation).await;

            assert!(result.is_success());
            assert_eq!(result.venue_id(), Some(VenueId::Binance));
            assert_eq!(offline.orders_received(), 0);
            assert_eq!(online.orders_received(), 1);
        }

        #[tokio::test]
        async fn no_suitable_venue() {
            let offline = funded(VenueId::Bitbank, dec!(150));
            offline.set_available(false);
            let manager = manager(&[offline]);

            let operation = LiquidityOperation::market_buy(sfrt(), dec!(1000), "test").unwrap();
            let result = manager.execute_optimally(operation).await;

            assert!(!result.is_success());
            assert_eq!(result.error(), Some(NO_SUITABLE_VENUE));
            assert_eq!(result.venue_id(), None);
        }

        #[tokio::test]
        async fn empty_registry_has_no_suitable_venue() {
            let manager = manager(&[]);
            let operation = LiquidityOperation::market_buy(sfrt(), dec!(1000), "test").unwrap();
            let result = manager.execute_optimally(operation).await;
            assert_eq!(result.error(), Some(NO_SUITABLE_VENUE));
        }
    }

    mod arbitrage {
        use super::*;

        #[tokio::test]
        async fn completed_scan_trades_both_legs() {
            let cheap = funded(VenueId::Bitbank, dec!(100));
            let mid = funded(VenueId::Coincheck, dec!(103));
            let dear = funded(VenueId::Binance, dec!(105));
            let manager = manager(&[cheap.clone(), mid.clone(), dear.clone()]);

            let outcome = manager.run_arbitrage_scan().await;
            let ArbitrageScanOutcome::Executed {
                opportunity,
                execution,
            } = outcome
            else {
                unreachable!("expected an executed opportunity");
            };
            assert_eq!(opportunity.buy_venue(), VenueId::Bitbank);
            assert_eq!(opportunity.sell_venue(), VenueId::Binance);
            assert!(execution.is_completed());
            assert_eq!(cheap.trades().first().unwrap().side(), OrderSide::Buy);
            assert_eq!(dear.trades().first().unwrap().side(), OrderSide::Sell);
            assert_eq!(mid.orders_received(), 0);
        }

        #[tokio::test]
        async fn failed_buy_skips_sell() {
            let cheap = funded(VenueId::Bitbank, dec!(100));
            cheap.reject_orders(Some("maintenance".to_string()));
            let dear = funded(VenueId::Binance, dec!(105));
            let manager = manager(&[cheap.clone(), dear.clone()]);

            let outcome = manager.run_arbitrage_scan().await;
            let ArbitrageScanOutcome::Executed { execution, .. } = outcome else {
                unreachable!("expected an executed opportunity");
            };
            assert!(matches!(execution, ArbitrageExecution::BuyFailed { .. }));
            assert_eq!(cheap.orders_received(), 1);
            assert_eq!(dear.orders_received(), 0);
        }

        #[tokio::test]
        async fn failed_sell_is_unresolved() {
            let cheap = funded(VenueId::Bitbank, dec!(100));
            let dear = funded(VenueId::Binance, dec!(105));
            dear.reject_orders(Some("account frozen".to_string()));
            let manager = manager(&[cheap.clone(), dear.clone()]);

            let outcome = manager.run_arbitrage_scan().await;
            let ArbitrageScanOutcome::Executed { execution, .. } = outcome else {
                unreachable!("expected an executed opportunity");
            };
            assert!(execution.is_unresolved());
            assert_eq!(cheap.trades().len(), 1);
            assert!(dear.trades().is_empty());
        }

        #[tokio::test]
        async fn paused_scan_sends_nothing() {
            let cheap = funded(VenueId::Bitbank, dec!(100));
            let dear = funded(VenueId::Binance, dec!(105));
            let manager = manager(&[cheap.clone(), dear.clone()]);
            manager.trading_switch().pause("operator");

            let outcome = manager.run_arbitrage_scan().await;
            assert!(matches!(outcome, ArbitrageScanOutcome::TradingPaused));
            assert_eq!(cheap.orders_received(), 0);
            assert_eq!(dear.orders_received(), 0);
        }

        #[tokio::test]
        async fn failing_venue_leaves_too_few_prices() {
            let cheap = funded(VenueId::Bitbank, dec!(100));
            let dear = funded(VenueId::Binance, dec!(105));
            dear.fail_with(Some(VenueError::connection("reset")));
            let manager = manager(&[cheap, dear]);

            let outcome = manager.run_arbitrage_scan().await;
            assert!(matches!(outcome, ArbitrageScanOutcome::InsufficientPrices(1)));
        }

        #[tokio::test]
        async fn narrow_gap_is_not_traded() {
            let a = funded(VenueId::Bitbank, dec!(100));
            let b = funded(VenueId::Binance, dec!(100.3));
            let manager = manager(&[a, b]);
            let outcome = manager.run_arbitrage_scan().await;
            assert!(matches!(outcome, ArbitrageScanOutcome::NoOpportunity));
            assert_eq!(outcome.to_string(), "no opportunity");
        }
    }

    #[tokio::test]
    async fn execute_on_unknown_venue_fails() {
        let manager = manager(&[funded(VenueId::Bitbank, dec!(100))]);
        let operation = LiquidityOperation::market_buy(sfrt(), dec!(1000), "test").unwrap();
        let result = manager.execute_on(VenueId::Okx, operation).await;
        assert!(!result.is_success());
        assert_eq!(result.venue_id(), Some(VenueId::Okx));
    }
}
