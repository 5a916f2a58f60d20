//! # Application Services
//!
//! Services that orchestrate domain logic and the venue port.
//!
//! This module provides application-level services including:
//! - [`MetricsAggregator`]: Concurrent per-venue metrics and price collection
//! - [`SelectionStrategy`]: Scoring of venues for an operation
//! - [`ArbitrageAnalyzer`]: Cross-venue spread detection
//! - [`ExecutionMonitor`]: Order submission under a timeout
//! - [`MultiVenueManager`]: Optimal routing and arbitrage execution
//! - [`LiquidityController`]: Price stabilization and staged programs
//! - [`RiskManager`]: Volatility escalation and liquidity checks
//! - [`Scheduler`]: Fixed-interval periodic jobs

pub mod alerts;
pub mod arbitrage_analyzer;
pub mod execution_monitor;
pub mod liquidity_controller;
pub mod metrics_aggregation;
pub mod multi_venue_manager;
pub mod risk_manager;
pub mod scheduler;
pub mod selection_strategy;
pub mod trading_switch;

pub use alerts::{Alert, AlertKind, AlertNotifier, RecordingAlertNotifier, TracingAlertNotifier};
pub use arbitrage_analyzer::{ArbitrageAnalyzer, ArbitrageThresholds};
pub use execution_monitor::ExecutionMonitor;
pub use liquidity_controller::{
    CycleOutcome, LiquidityController, LiquidityParameters, ProgramStop, StagedProgram,
    StagedProgramConfig, StagedProgramReport,
};
pub use metrics_aggregation::{AggregationConfig, MetricsAggregator};
pub use multi_venue_manager::{ArbitrageExecution, ArbitrageScanOutcome, MultiVenueManager};
pub use risk_manager::{
    LiquidityCheck, LiquidityEstimator, RiskManager, RiskResponse, RiskThresholds,
    StaticLiquidityEstimator,
};
pub use scheduler::{PeriodicJob, Scheduler};
pub use selection_strategy::{
    BestPriceSelection, SelectionStrategy, SelectionStrategyKind, WeightedScoreSelection,
};
pub use trading_switch::{PauseSignal, TradingSwitch};
