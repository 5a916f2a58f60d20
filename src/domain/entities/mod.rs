//! # Domain Entities
//!
//! Immutable records exchanged between the coordinator's components.
//!
//! ## Venue state
//!
//! - [`VenueMetrics`]: per-venue health and quality snapshot
//! - [`TradingLimits`], [`ComplianceStatus`]: per-venue constraints
//! - [`OrderBook`], [`Balance`], [`Trade`]: raw venue payloads
//!
//! ## Execution
//!
//! - [`LiquidityOperation`]: a requested order
//! - [`OrderResult`]: one venue's answer to one order
//! - [`LiquidityResult`]: an operation paired with its outcome
//!
//! ## Analysis
//!
//! - [`MarketSnapshot`], [`LiquidityDecision`]: liquidity control inputs and outputs
//! - [`ArbitrageOpportunity`]: a qualified cross-venue price gap
//! - [`VolatilityEvent`], [`RiskAssessment`]: risk manager inputs and outputs

pub mod arbitrage;
pub mod balance;
pub mod compliance;
pub mod liquidity;
pub mod market;
pub mod order_book;
pub mod order_result;
pub mod risk;
pub mod trading_limits;
pub mod venue_metrics;

pub use arbitrage::ArbitrageOpportunity;
pub use balance::{Balance, Trade};
pub use compliance::ComplianceStatus;
pub use liquidity::{LiquidityOperation, LiquidityResult};
pub use market::{LiquidityDecision, MarketSnapshot};
pub use order_book::{OrderBook, OrderBookEntry};
pub use order_result::OrderResult;
pub use risk::{RiskAssessment, VolatilityEvent};
pub use trading_limits::TradingLimits;
pub use venue_metrics::{VenueMetrics, VenueMetricsBuilder};
