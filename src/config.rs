//! # Configuration
//!
//! Layered application configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults (every field has one)
//! 2. an optional TOML file
//! 3. environment variables prefixed with `VENUE_LIQUIDITY`, nested with
//!    `__` (for example `VENUE_LIQUIDITY__MARKET__TARGET_PRICE=155`)
//!
//! [`AppConfig::validate`] rejects inconsistent parameters before anything
//! is started.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::config::AppConfig;
//!
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.liquidity.sell.chunks, 10);
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::arbitrage_analyzer::ArbitrageThresholds;
use crate::application::services::liquidity_controller::{LiquidityParameters, StagedProgramConfig};
use crate::application::services::metrics_aggregation::AggregationConfig;
use crate::application::services::risk_manager::{RiskThresholds, StaticLiquidityEstimator};
use crate::application::services::selection_strategy::SelectionStrategyKind;
use crate::domain::value_objects::{Symbol, VenueId};
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "VENUE_LIQUIDITY";
/// Separator between nested keys in environment variables.
pub const ENV_SEPARATOR: &str = "__";

/// Venue call settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenuesConfig {
    /// Per-venue timeout of aggregation and price calls.
    pub per_venue_timeout_ms: u64,
    /// Timeout of one order submission.
    pub order_timeout_ms: u64,
    /// Order book levels requested per side.
    pub order_book_depth: usize,
}

impl Default for VenuesConfig {
    fn default() -> Self {
        Self {
            per_venue_timeout_ms: 5000,
            order_timeout_ms: 10000,
            order_book_depth: 10,
        }
    }
}

/// Traded market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Traded asset.
    pub symbol: String,
    /// Currency prices are quoted in.
    pub quote_currency: String,
    /// Price the liquidity controller steers towards.
    pub target_price: Decimal,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbol: "SFRT".to_string(),
            quote_currency: "JPY".to_string(),
            target_price: dec!(150),
        }
    }
}

impl MarketConfig {
    /// Returns the traded symbol.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the symbol is malformed.
    pub fn symbol(&self) -> ApplicationResult<Symbol> {
        Ok(Symbol::new(&self.symbol)?)
    }

    /// Returns the quote currency.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the currency is malformed.
    pub fn quote_currency(&self) -> ApplicationResult<Symbol> {
        Ok(Symbol::new(&self.quote_currency)?)
    }
}

/// One side of price stabilisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizationConfig {
    /// Base amount scaled by the deviation.
    pub base_amount: Decimal,
    /// Deviation multiplier.
    pub multiplier: Decimal,
    /// Number of chunks of the staged program.
    pub chunks: u32,
    /// Seconds between two chunks.
    pub pause_secs: u64,
}

impl StabilizationConfig {
    fn sell() -> Self {
        Self {
            base_amount: dec!(200000),
            multiplier: dec!(10),
            chunks: 10,
            pause_secs: 30,
        }
    }

    fn buy() -> Self {
        Self {
            base_amount: dec!(300000),
            multiplier: dec!(8),
            chunks: 8,
            pause_secs: 45,
        }
    }

    fn program(&self) -> StagedProgramConfig {
        StagedProgramConfig {
            chunks: self.chunks,
            pause: Duration::from_secs(self.pause_secs),
        }
    }
}

/// Liquidity controller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityConfig {
    /// Seconds between control cycles.
    pub cycle_interval_secs: u64,
    /// Deviation tolerated before stabilising.
    pub tolerance: Decimal,
    /// Ceiling on one stabilisation.
    pub max_single_operation: Decimal,
    /// Amount proposed in a thin market.
    pub provide_liquidity_amount: Decimal,
    /// Quoting venues below which the market counts as thin.
    pub min_active_venues: usize,
    /// Sell side.
    pub sell: StabilizationConfig,
    /// Buy side.
    pub buy: StabilizationConfig,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: 60,
            tolerance: dec!(0.05),
            max_single_operation: dec!(1000000),
            provide_liquidity_amount: dec!(500000),
            min_active_venues: 2,
            sell: StabilizationConfig::sell(),
            buy: StabilizationConfig::buy(),
        }
    }
}

/// Arbitrage scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrageConfig {
    /// Whether the scan is scheduled.
    pub enabled: bool,
    /// Seconds between scans.
    pub scan_interval_secs: u64,
    /// Smallest accepted profit rate.
    pub min_profit_threshold: Decimal,
    /// Largest accepted profit rate.
    pub max_spread_threshold: Decimal,
    /// Quantity traded per leg.
    pub trade_amount: Decimal,
}

impl Default for ArbitrageConfig {
    fn default() -> Self {
        let thresholds = ArbitrageThresholds::default();
        Self {
            enabled: true,
            scan_interval_secs: 30,
            min_profit_threshold: thresholds.min_profit_threshold,
            max_spread_threshold: thresholds.max_spread_threshold,
            trade_amount: thresholds.trade_amount,
        }
    }
}

/// Risk manager settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Volatility triggering the high-alert protocol.
    pub high_volatility_threshold: Decimal,
    /// Volatility triggering the emergency protocol.
    pub critical_volatility_threshold: Decimal,
    /// Seconds between liquidity-risk checks.
    pub liquidity_check_interval_secs: u64,
    /// Available liquidity estimate.
    pub available_liquidity: Decimal,
    /// Required liquidity estimate.
    pub required_liquidity: Decimal,
    /// Market risk reported in emergency assessments.
    pub market_risk: Decimal,
    /// Liquidity risk reported in emergency assessments.
    pub liquidity_risk: Decimal,
    /// Capacity of the volatility event channel.
    pub event_channel_capacity: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        let thresholds = RiskThresholds::default();
        Self {
            high_volatility_threshold: thresholds.high_volatility,
            critical_volatility_threshold: thresholds.critical_volatility,
            liquidity_check_interval_secs: 300,
            available_liquidity: dec!(5000000),
            required_liquidity: dec!(2000000),
            market_risk: thresholds.market_risk,
            liquidity_risk: thresholds.liquidity_risk,
            event_channel_capacity: 64,
        }
    }
}

/// Venue selection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Selection policy.
    pub strategy: SelectionStrategyKind,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
}

/// One in-memory paper venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedVenueConfig {
    /// Venue identity.
    pub venue: VenueId,
    /// Initial last price.
    pub price: Decimal,
    /// Initial balance of the traded asset.
    #[serde(default)]
    pub base_balance: Decimal,
    /// Initial balance of the quote currency.
    #[serde(default)]
    pub quote_balance: Decimal,
    /// Simulated round-trip latency.
    #[serde(default)]
    pub latency_ms: u64,
    /// Taker fee override.
    #[serde(default)]
    pub fee_rate: Option<Decimal>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Venue call settings.
    pub venues: VenuesConfig,
    /// Traded market.
    pub market: MarketConfig,
    /// Liquidity controller.
    pub liquidity: LiquidityConfig,
    /// Arbitrage scan.
    pub arbitrage: ArbitrageConfig,
    /// Risk manager.
    pub risk: RiskConfig,
    /// Venue selection.
    pub selection: SelectionConfig,
    /// Logging.
    pub logging: LoggingConfig,
    /// Paper venues registered at startup.
    pub simulated_venues: Vec<SimulatedVenueConfig>,
}

impl AppConfig {
    /// Loads defaults, then `path` if given and present, then the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be
    /// read or parsed.
    pub fn load(path: Option<&Path>) -> ApplicationResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ApplicationError::configuration(format!("failed to load configuration: {e}")))
    }

    /// Parses a TOML document on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the document is invalid.
    pub fn from_toml(document: &str) -> ApplicationResult<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ApplicationError::configuration(format!("invalid configuration: {e}")))
    }

    /// Checks cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the first
    /// inconsistent parameter.
    pub fn validate(&self) -> ApplicationResult<()> {
        self.market.symbol()?;
        self.market.quote_currency()?;
        if self.market.target_price <= Decimal::ZERO {
            return Err(ApplicationError::configuration("market.target_price must be positive"));
        }
        if self.venues.per_venue_timeout_ms == 0 || self.venues.order_timeout_ms == 0 {
            return Err(ApplicationError::configuration("venue timeouts must be positive"));
        }

        let liquidity = &self.liquidity;
        if liquidity.tolerance < Decimal::ZERO {
            return Err(ApplicationError::configuration("liquidity.tolerance must not be negative"));
        }
        if liquidity.max_single_operation <= Decimal::ZERO {
            return Err(ApplicationError::configuration(
                "liquidity.max_single_operation must be positive",
            ));
        }
        for (side, stabilization) in [("sell", &liquidity.sell), ("buy", &liquidity.buy)] {
            if stabilization.chunks == 0 {
                return Err(ApplicationError::configuration(format!(
                    "liquidity.{side}.chunks must be at least 1"
                )));
            }
            if stabilization.base_amount <= Decimal::ZERO || stabilization.multiplier <= Decimal::ZERO {
                return Err(ApplicationError::configuration(format!(
                    "liquidity.{side} base_amount and multiplier must be positive"
                )));
            }
        }
        if liquidity.cycle_interval_secs == 0 {
            return Err(ApplicationError::configuration("liquidity.cycle_interval_secs must be positive"));
        }

        let arbitrage = &self.arbitrage;
        if arbitrage.min_profit_threshold > arbitrage.max_spread_threshold {
            return Err(ApplicationError::configuration(
                "arbitrage.min_profit_threshold exceeds max_spread_threshold",
            ));
        }
        if arbitrage.trade_amount <= Decimal::ZERO || arbitrage.scan_interval_secs == 0 {
            return Err(ApplicationError::configuration(
                "arbitrage.trade_amount and scan_interval_secs must be positive",
            ));
        }

        let risk = &self.risk;
        if risk.high_volatility_threshold > risk.critical_volatility_threshold {
            return Err(ApplicationError::configuration(
                "risk.high_volatility_threshold exceeds critical_volatility_threshold",
            ));
        }
        if risk.liquidity_check_interval_secs == 0 || risk.event_channel_capacity == 0 {
            return Err(ApplicationError::configuration(
                "risk.liquidity_check_interval_secs and event_channel_capacity must be positive",
            ));
        }

        let mut seen = BTreeSet::new();
        for venue in &self.simulated_venues {
            if !seen.insert(venue.venue) {
                return Err(ApplicationError::configuration(format!(
                    "simulated venue {} configured twice",
                    venue.venue
                )));
            }
            if venue.price < Decimal::ZERO {
                return Err(ApplicationError::configuration(format!(
                    "simulated venue {} has a negative price",
                    venue.venue
                )));
            }
        }
        Ok(())
    }

    /// Returns the metrics aggregation settings.
    #[must_use]
    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig::with_timeout(self.venues.per_venue_timeout_ms)
            .with_order_book_depth(self.venues.order_book_depth)
    }

    /// Returns the per-order timeout.
    #[must_use]
    pub fn order_timeout(&self) -> Duration {
        Duration::from_millis(self.venues.order_timeout_ms)
    }

    /// Returns the liquidity controller parameters.
    #[must_use]
    pub fn liquidity_parameters(&self) -> LiquidityParameters {
        LiquidityParameters {
            target_price: self.market.target_price,
            tolerance: self.liquidity.tolerance,
            max_single_operation: self.liquidity.max_single_operation,
            sell_base_amount: self.liquidity.sell.base_amount,
            sell_multiplier: self.liquidity.sell.multiplier,
            buy_base_amount: self.liquidity.buy.base_amount,
            buy_multiplier: self.liquidity.buy.multiplier,
            provide_liquidity_amount: self.liquidity.provide_liquidity_amount,
            min_active_venues: self.liquidity.min_active_venues,
            volatility_alert_threshold: self.risk.high_volatility_threshold,
            sell_program: self.liquidity.sell.program(),
            buy_program: self.liquidity.buy.program(),
        }
    }

    /// Returns the arbitrage thresholds.
    #[must_use]
    pub fn arbitrage_thresholds(&self) -> ArbitrageThresholds {
        ArbitrageThresholds {
            min_profit_threshold: self.arbitrage.min_profit_threshold,
            max_spread_threshold: self.arbitrage.max_spread_threshold,
            trade_amount: self.arbitrage.trade_amount,
        }
    }

    /// Returns the risk thresholds.
    #[must_use]
    pub fn risk_thresholds(&self) -> RiskThresholds {
        RiskThresholds {
            high_volatility: self.risk.high_volatility_threshold,
            critical_volatility: self.risk.critical_volatility_threshold,
            market_risk: self.risk.market_risk,
            liquidity_risk: self.risk.liquidity_risk,
        }
    }

    /// Returns the configured liquidity estimator.
    #[must_use]
    pub fn liquidity_estimator(&self) -> StaticLiquidityEstimator {
        StaticLiquidityEstimator::new(self.risk.available_liquidity, self.risk.required_liquidity)
    }
}
