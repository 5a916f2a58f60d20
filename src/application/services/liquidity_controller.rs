//! # Liquidity Controller
//!
//! Periodic price stabilisation around a target price.
//!
//! Each cycle builds a [`MarketSnapshot`] from current venue prices,
//! compares its average with the target and decides to sell, buy, seed
//! liquidity or hold. Sell and buy decisions are executed as a
//! [`StagedProgram`]: the total is split into equal chunks that go through
//! the multi-venue manager one at a time, with a pacing delay in between.
//!
//! A program runs detached from the cycle that started it, so the timer is
//! never blocked. At most one program is in flight. The program checks the
//! trading switch before every chunk and abandons its pacing delay as soon
//! as trading is paused. A failed chunk ends the program; chunks already
//! executed stay executed.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::application::services::liquidity_controller::LiquidityParameters;
//! use venue_liquidity::domain::value_objects::LiquidityAction;
//! use rust_decimal::Decimal;
//!
//! let params = LiquidityParameters::default();
//! let decision = params.decide(Decimal::new(140, 0), 3).unwrap();
//! assert_eq!(decision.action(), LiquidityAction::StabilizeByBuying);
//! assert_eq!(decision.amount(), Decimal::new(160080, 0));
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::multi_venue_manager::MultiVenueManager;
use crate::application::services::trading_switch::TradingSwitch;
use crate::domain::entities::{
    LiquidityDecision, LiquidityOperation, LiquidityResult, MarketSnapshot, VolatilityEvent,
};
use crate::domain::value_objects::arithmetic::{ratio, round_half_up, CheckedArithmetic, PRICE_SCALE, RATE_SCALE};
use crate::domain::value_objects::{LiquidityAction, OrderSide};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Chunking and pacing of one staged program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedProgramConfig {
    /// Number of equal chunks.
    pub chunks: u32,
    /// Delay between two successful chunks.
    pub pause: Duration,
}

impl StagedProgramConfig {
    /// Ten chunks, 30 seconds apart.
    #[must_use]
    pub const fn sell_default() -> Self {
        Self {
            chunks: 10,
            pause: Duration::from_secs(30),
        }
    }

    /// Eight chunks, 45 seconds apart.
    #[must_use]
    pub const fn buy_default() -> Self {
        Self {
            chunks: 8,
            pause: Duration::from_secs(45),
        }
    }
}

/// Decision parameters of the liquidity controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityParameters {
    /// Price the controller steers towards.
    pub target_price: Decimal,
    /// Deviation tolerated before stabilising (exclusive).
    pub tolerance: Decimal,
    /// Ceiling on the total of one stabilisation.
    pub max_single_operation: Decimal,
    /// Base amount of a sell stabilisation.
    pub sell_base_amount: Decimal,
    /// Deviation multiplier of a sell stabilisation.
    pub sell_multiplier: Decimal,
    /// Base amount of a buy stabilisation.
    pub buy_base_amount: Decimal,
    /// Deviation multiplier of a buy stabilisation.
    pub buy_multiplier: Decimal,
    /// Amount proposed when the market is thin.
    pub provide_liquidity_amount: Decimal,
    /// Fewer quoting venues than this counts as a thin market.
    pub min_active_venues: usize,
    /// Snapshot volatility at which a volatility event is forwarded.
    pub volatility_alert_threshold: Decimal,
    /// Staged program used for sells.
    pub sell_program: StagedProgramConfig,
    /// Staged program used for buys.
    pub buy_program: StagedProgramConfig,
}

impl Default for LiquidityParameters {
    fn default() -> Self {
        Self {
            target_price: dec!(150),
            tolerance: dec!(0.05),
            max_single_operation: dec!(1000000),
            sell_base_amount: dec!(200000),
            sell_multiplier: dec!(10),
            buy_base_amount: dec!(300000),
            buy_multiplier: dec!(8),
            provide_liquidity_amount: dec!(500000),
            min_active_venues: 2,
            volatility_alert_threshold: dec!(0.20),
            sell_program: StagedProgramConfig::sell_default(),
            buy_program: StagedProgramConfig::buy_default(),
        }
    }
}

impl LiquidityParameters {
    /// Relative distance of `average_price` from the target, 4 decimal places.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Arithmetic` if the target price is zero.
    pub fn deviation(&self, average_price: Decimal) -> ApplicationResult<Decimal> {
        let gap = average_price.safe_sub(self.target_price)?;
        Ok(ratio(gap, self.target_price, RATE_SCALE)?)
    }

    /// Decides what to do about a market averaging `average_price` over
    /// `venue_count` quoting venues.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Arithmetic` if the deviation or an amount
    /// cannot be computed.
    pub fn decide(
        &self,
        average_price: Decimal,
        venue_count: usize,
    ) -> ApplicationResult<LiquidityDecision> {
        let deviation = self.deviation(average_price)?;
        debug!(%average_price, target = %self.target_price, %deviation, "price deviation");

        if deviation.abs() > self.tolerance {
            return if deviation > Decimal::ZERO {
                let amount = self.scaled_amount(self.sell_base_amount, self.sell_multiplier, deviation)?;
                Ok(LiquidityDecision::stabilize_by_selling(
                    amount,
                    format!("price {deviation} above target, selling"),
                ))
            } else {
                let amount =
                    self.scaled_amount(self.buy_base_amount, self.buy_multiplier, deviation.abs())?;
                Ok(LiquidityDecision::stabilize_by_buying(
                    amount,
                    format!("price {deviation} below target, buying"),
                ))
            };
        }

        if venue_count < self.min_active_venues {
            return Ok(LiquidityDecision::provide_liquidity(
                self.provide_liquidity_amount,
                format!("only {venue_count} venues quoting"),
            ));
        }

        Ok(LiquidityDecision::hold_reserve("price within tolerance"))
    }

    fn scaled_amount(
        &self,
        base: Decimal,
        multiplier: Decimal,
        deviation: Decimal,
    ) -> ApplicationResult<Decimal> {
        let amount = base.safe_mul(deviation.safe_mul(multiplier)?)?;
        Ok(amount.min(self.max_single_operation))
    }
}

/// Why a staged program stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramStop {
    /// Every chunk went through.
    Completed,
    /// A chunk failed; the remaining chunks were not sent.
    ChunkFailed(String),
    /// Automatic trading was paused before the next chunk.
    TradingPaused,
}

impl fmt::Display for ProgramStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::ChunkFailed(reason) => write!(f, "chunk failed: {reason}"),
            Self::TradingPaused => write!(f, "trading paused"),
        }
    }
}

/// Result of one staged program.
#[derive(Debug, Clone)]
pub struct StagedProgramReport {
    side: OrderSide,
    total: Decimal,
    executed: Decimal,
    chunks: Vec<LiquidityResult>,
    stop: ProgramStop,
}

impl StagedProgramReport {
    /// Returns the program side.
    #[must_use]
    pub fn side(&self) -> OrderSide {
        self.side
    }

    /// Returns the requested total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Returns the sum of the successful chunks.
    #[must_use]
    pub fn executed(&self) -> Decimal {
        self.executed
    }

    /// Returns what was left unexecuted.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.total.saturating_sub(self.executed)
    }

    /// Returns one result per attempted chunk, in order.
    #[must_use]
    pub fn chunks(&self) -> &[LiquidityResult] {
        &self.chunks
    }

    /// Returns why the program stopped.
    #[must_use]
    pub fn stop(&self) -> &ProgramStop {
        &self.stop
    }
}

/// A paced sequence of equal market orders on one side.
#[derive(Debug, Clone)]
pub struct StagedProgram {
    side: OrderSide,
    total: Decimal,
    config: StagedProgramConfig,
    priority: u8,
}

impl StagedProgram {
    /// Creates a program trading `total` on `side`.
    #[must_use]
    pub fn new(side: OrderSide, total: Decimal, config: StagedProgramConfig) -> Self {
        Self {
            side,
            total,
            config,
            priority: 5,
        }
    }

    /// Sets the priority of every chunk.
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Runs the program to its end through `manager`.
    ///
    /// Each chunk is `remaining / chunks_left`, rounded half-up to 2
    /// decimal places, so the last chunk absorbs rounding.
    pub async fn run(self, manager: &MultiVenueManager) -> StagedProgramReport {
        let switch = manager.trading_switch();
        let mut pause_signal = switch.pause_signal();
        let mut remaining = self.total;
        let mut intervals = self.config.chunks;
        let mut chunks = Vec::new();

        info!(side = %self.side, total = %self.total, chunks = intervals, "staged program started");

        let stop = loop {
            if remaining <= Decimal::ZERO || intervals == 0 {
                break ProgramStop::Completed;
            }
            if !switch.is_enabled() {
                break ProgramStop::TradingPaused;
            }

            let chunk = match ratio(remaining, Decimal::from(intervals), PRICE_SCALE) {
                Ok(chunk) if chunk > Decimal::ZERO => chunk,
                Ok(_) => break ProgramStop::Completed,
                Err(e) => break ProgramStop::ChunkFailed(e.to_string()),
            };
            let operation = match LiquidityOperation::market(
                self.side,
                manager.symbol().clone(),
                chunk,
                format!("staged {} stabilisation", self.side),
            ) {
                Ok(operation) => operation.with_priority(self.priority),
                Err(e) => break ProgramStop::ChunkFailed(e.to_string()),
            };

            let result = manager.execute_optimally(operation).await;
            let failure = (!result.is_success())
                .then(|| result.error().unwrap_or("order not accepted").to_string());
            chunks.push(result);
            if let Some(reason) = failure {
                error!(side = %self.side, %chunk, %remaining, %reason, "staged chunk failed, program aborted");
                break ProgramStop::ChunkFailed(reason);
            }

            remaining = remaining.saturating_sub(chunk);
            intervals = intervals.saturating_sub(1);
            info!(side = %self.side, %chunk, %remaining, "staged chunk executed");

            if intervals > 0 && remaining > Decimal::ZERO {
                tokio::select! {
                    () = tokio::time::sleep(self.config.pause) => {}
                    () = pause_signal.paused() => break ProgramStop::TradingPaused,
                }
            }
        };

        let executed = self.total.saturating_sub(remaining);
        info!(side = %self.side, %executed, %stop, "staged program finished");
        StagedProgramReport {
            side: self.side,
            total: self.total,
            executed: round_half_up(executed, PRICE_SCALE),
            chunks,
            stop,
        }
    }
}

/// What a control cycle did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Automatic trading was paused; nothing was read.
    TradingPaused,
    /// No venue quoted a usable price.
    InvalidSnapshot,
    /// A decision was taken.
    Decided {
        /// The snapshot the decision was based on.
        snapshot: MarketSnapshot,
        /// The decision.
        decision: LiquidityDecision,
        /// Handle of the staged program started for it, if any.
        program: Option<JoinHandle<StagedProgramReport>>,
    },
}

/// Clears the in-flight flag when a program task ends, however it ends.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Periodic price stabilisation.
#[derive(Debug, Clone)]
pub struct LiquidityController {
    manager: Arc<MultiVenueManager>,
    params: LiquidityParameters,
    program_in_flight: Arc<AtomicBool>,
    volatility_tx: Option<mpsc::Sender<VolatilityEvent>>,
}

impl LiquidityController {
    /// Creates a controller executing through `manager`.
    #[must_use]
    pub fn new(manager: Arc<MultiVenueManager>, params: LiquidityParameters) -> Self {
        Self {
            manager,
            params,
            program_in_flight: Arc::new(AtomicBool::new(false)),
            volatility_tx: None,
        }
    }

    /// Forwards high-volatility snapshots to `sender`.
    #[must_use]
    pub fn with_volatility_sender(mut self, sender: mpsc::Sender<VolatilityEvent>) -> Self {
        self.volatility_tx = Some(sender);
        self
    }

    /// Returns the decision parameters.
    #[must_use]
    pub fn parameters(&self) -> &LiquidityParameters {
        &self.params
    }

    /// Returns the trading switch.
    #[must_use]
    pub fn trading_switch(&self) -> &Arc<TradingSwitch> {
        self.manager.trading_switch()
    }

    /// Returns true while a staged program is running.
    #[must_use]
    pub fn is_program_running(&self) -> bool {
        self.program_in_flight.load(Ordering::SeqCst)
    }

    /// Pauses automatic trading. Returns false if it was already paused.
    pub fn pause_automatic_trading(&self, reason: impl Into<String>) -> bool {
        self.trading_switch().pause(reason)
    }

    /// Resumes automatic trading. Returns false if it was already enabled.
    pub fn resume_automatic_trading(&self) -> bool {
        self.trading_switch().resume()
    }

    /// Returns true if automatic trading is enabled.
    #[must_use]
    pub fn is_automatic_trading_enabled(&self) -> bool {
        self.trading_switch().is_enabled()
    }

    /// Builds a snapshot from the current venue prices.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the price statistics overflow.
    pub async fn snapshot(&self) -> ApplicationResult<MarketSnapshot> {
        let symbol = self.manager.symbol();
        let prices = self.manager.current_prices(symbol).await;
        Ok(MarketSnapshot::from_prices(symbol.clone(), &prices)?)
    }

    /// Decides what to do about `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Arithmetic` if the deviation cannot be
    /// computed.
    pub fn decide(&self, snapshot: &MarketSnapshot) -> ApplicationResult<LiquidityDecision> {
        self.params
            .decide(snapshot.average_price(), snapshot.venue_count())
    }

    /// Runs one control cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot or the decision cannot be computed.
    /// The cycle has no side effects in that case.
    pub async fn run_cycle(&self) -> ApplicationResult<CycleOutcome> {
        if !self.is_automatic_trading_enabled() {
            debug!("liquidity cycle skipped: automatic trading paused");
            return Ok(CycleOutcome::TradingPaused);
        }

        let snapshot = self.snapshot().await?;
        if !snapshot.is_valid() {
            debug!("liquidity cycle skipped: no usable prices");
            return Ok(CycleOutcome::InvalidSnapshot);
        }
        self.forward_volatility(&snapshot);

        let decision = self.decide(&snapshot)?;
        let program = match decision.action() {
            LiquidityAction::StabilizeBySelling | LiquidityAction::StabilizeByBuying => {
                let (side, config) = if decision.action() == LiquidityAction::StabilizeBySelling {
                    (OrderSide::Sell, self.params.sell_program)
                } else {
                    (OrderSide::Buy, self.params.buy_program)
                };
                let program = StagedProgram::new(side, decision.amount(), config)
                    .with_priority(decision.priority());
                match self.start_program(program) {
                    Ok(handle) => {
                        info!(%decision, "stabilisation started");
                        Some(handle)
                    }
                    Err(e) => {
                        warn!(%decision, error = %e, "stabilisation not started");
                        None
                    }
                }
            }
            LiquidityAction::ProvideLiquidity => {
                info!(%decision, venues = snapshot.venue_count(), "thin market, liquidity provision proposed");
                None
            }
            LiquidityAction::HoldReserve => {
                debug!(%decision, "holding reserve");
                None
            }
        };

        Ok(CycleOutcome::Decided {
            snapshot,
            decision,
            program,
        })
    }

    /// Starts `program` on a detached task.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::TradingPaused` if automatic trading is
    /// paused, or `ApplicationError::ProgramInFlight` if another program is
    /// still running.
    pub fn start_program(
        &self,
        program: StagedProgram,
    ) -> ApplicationResult<JoinHandle<StagedProgramReport>> {
        if !self.is_automatic_trading_enabled() {
            return Err(ApplicationError::TradingPaused);
        }
        if self
            .program_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ApplicationError::ProgramInFlight);
        }

        let guard = InFlightGuard(Arc::clone(&self.program_in_flight));
        let manager = Arc::clone(&self.manager);
        Ok(tokio::spawn(async move {
            let _guard = guard;
            program.run(&manager).await
        }))
    }

    fn forward_volatility(&self, snapshot: &MarketSnapshot) {
        let Some(sender) = &self.volatility_tx else {
            return;
        };
        if snapshot.volatility() < self.params.volatility_alert_threshold {
            return;
        }

        let event = VolatilityEvent::new(
            snapshot.symbol().clone(),
            snapshot.volatility(),
            snapshot.average_price(),
        );
        match sender.try_send(event) {
            Ok(()) => debug!(volatility = %snapshot.volatility(), "volatility event forwarded"),
            Err(TrySendError::Full(event)) => {
                warn!(%event, "volatility channel full, event dropped");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(%event, "volatility channel closed, event dropped");
            }
        }
    }
}
