//! # Runtime
//!
//! Wires the services together from an [`AppConfig`] and runs them.
//!
//! [`LiquidityRuntime::start`] builds the aggregator, the selection
//! strategy, the manager, the liquidity controller and the risk manager
//! around one venue registry and one trading switch, then schedules the
//! periodic jobs and the volatility event loop. The registry is read-only
//! from then on.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::alerts::AlertNotifier;
use crate::application::services::arbitrage_analyzer::ArbitrageAnalyzer;
use crate::application::services::execution_monitor::ExecutionMonitor;
use crate::application::services::liquidity_controller::LiquidityController;
use crate::application::services::metrics_aggregation::MetricsAggregator;
use crate::application::services::multi_venue_manager::MultiVenueManager;
use crate::application::services::risk_manager::RiskManager;
use crate::application::services::scheduler::{
    ArbitrageScanJob, LiquidityCycleJob, LiquidityRiskJob, Scheduler,
};
use crate::application::services::trading_switch::TradingSwitch;
use crate::config::AppConfig;
use crate::infrastructure::venues::registry::VenueRegistry;
use crate::infrastructure::venues::simulated::SimulatedVenueClient;
use crate::infrastructure::venues::traits::VenueClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Builds a registry of paper venues from `config.simulated_venues`.
///
/// # Errors
///
/// Returns `ApplicationError::Domain` if the market symbols are malformed.
pub fn simulated_registry(config: &AppConfig) -> ApplicationResult<VenueRegistry> {
    let base = config.market.symbol()?;
    let quote = config.market.quote_currency()?;

    let clients = config.simulated_venues.iter().map(|venue| {
        let mut client = SimulatedVenueClient::new(venue.venue, base.clone(), quote.clone())
            .with_price(venue.price)
            .with_balance(base.clone(), venue.base_balance)
            .with_balance(quote.clone(), venue.quote_balance)
            .with_latency(Duration::from_millis(venue.latency_ms));
        if let Some(fee_rate) = venue.fee_rate {
            client = client.with_fee_rate(fee_rate);
        }
        Arc::new(client) as Arc<dyn VenueClient>
    });
    Ok(VenueRegistry::from_clients(clients))
}

/// Running coordinator.
#[derive(Debug)]
pub struct LiquidityRuntime {
    switch: Arc<TradingSwitch>,
    manager: Arc<MultiVenueManager>,
    controller: Arc<LiquidityController>,
    risk_manager: Arc<RiskManager>,
    scheduler: Scheduler,
}

impl LiquidityRuntime {
    /// Validates `config`, wires the services around `registry` and starts
    /// the periodic jobs. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the configuration is
    /// inconsistent or the registry is empty.
    pub fn start(
        config: &AppConfig,
        registry: VenueRegistry,
        notifier: Arc<dyn AlertNotifier>,
    ) -> ApplicationResult<Self> {
        config.validate()?;
        if registry.is_empty() {
            return Err(ApplicationError::configuration("venue registry is empty"));
        }

        let venues = registry.venue_ids();
        let switch = Arc::new(TradingSwitch::default());
        let aggregator = MetricsAggregator::new(
            Arc::new(registry),
            config.market.quote_currency()?,
            config.aggregation_config(),
        );
        let manager = Arc::new(MultiVenueManager::new(
            aggregator,
            config.selection.strategy.build(),
            ArbitrageAnalyzer::new(config.arbitrage_thresholds()),
            ExecutionMonitor::new(config.order_timeout()),
            Arc::clone(&switch),
            config.market.symbol()?,
        ));

        let (volatility_tx, volatility_rx) = mpsc::channel(config.risk.event_channel_capacity);
        let controller = Arc::new(
            LiquidityController::new(Arc::clone(&manager), config.liquidity_parameters())
                .with_volatility_sender(volatility_tx),
        );
        let risk_manager = Arc::new(RiskManager::new(
            Arc::clone(&switch),
            notifier,
            Arc::new(config.liquidity_estimator()),
            config.risk_thresholds(),
        ));

        let mut scheduler = Scheduler::new();
        scheduler.track(
            "risk_event_loop",
            tokio::spawn(
                Arc::clone(&risk_manager).run_event_loop(volatility_rx, scheduler.shutdown_signal()),
            ),
        );
        scheduler.spawn(
            Arc::new(LiquidityCycleJob::new(Arc::clone(&controller))),
            Duration::from_secs(config.liquidity.cycle_interval_secs),
        );
        if config.arbitrage.enabled {
            scheduler.spawn(
                Arc::new(ArbitrageScanJob::new(Arc::clone(&manager))),
                Duration::from_secs(config.arbitrage.scan_interval_secs),
            );
        }
        scheduler.spawn(
            Arc::new(LiquidityRiskJob::new(Arc::clone(&risk_manager))),
            Duration::from_secs(config.risk.liquidity_check_interval_secs),
        );

        info!(
            ?venues,
            symbol = %manager.symbol(),
            strategy = manager.selection_strategy_name(),
            jobs = ?scheduler.job_names(),
            "liquidity runtime started"
        );

        Ok(Self {
            switch,
            manager,
            controller,
            risk_manager,
            scheduler,
        })
    }

    /// Returns the multi-venue manager.
    #[must_use]
    pub fn manager(&self) -> &Arc<MultiVenueManager> {
        &self.manager
    }

    /// Returns the liquidity controller.
    #[must_use]
    pub fn controller(&self) -> &Arc<LiquidityController> {
        &self.controller
    }

    /// Returns the risk manager.
    #[must_use]
    pub fn risk_manager(&self) -> &Arc<RiskManager> {
        &self.risk_manager
    }

    /// Returns the names of the running jobs.
    #[must_use]
    pub fn job_names(&self) -> Vec<&'static str> {
        self.scheduler.job_names()
    }

    /// Pauses automatic trading. Returns false if it was already paused.
    pub fn pause_automatic_trading(&self, reason: impl Into<String>) -> bool {
        self.switch.pause(reason)
    }

    /// Resumes automatic trading. Returns false if it was already enabled.
    pub fn resume_automatic_trading(&self) -> bool {
        self.switch.resume()
    }

    /// Returns true if automatic trading is enabled.
    #[must_use]
    pub fn is_automatic_trading_enabled(&self) -> bool {
        self.switch.is_enabled()
    }

    /// Stops every job and waits for them.
    ///
    /// A staged program already running is not awaited; pause trading
    /// first to stop it at its next chunk.
    pub async fn shutdown(self) {
        info!("liquidity runtime shutting down");
        self.scheduler.shutdown().await;
    }
}
