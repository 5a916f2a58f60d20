//! # Risk Manager
//!
//! Volatility escalation and liquidity-risk checks.
//!
//! Volatility readings arrive as [`VolatilityEvent`]s and are classified
//! against two thresholds (inclusive):
//!
//! | Volatility            | Level      | Response                                   |
//! |-----------------------|------------|--------------------------------------------|
//! | `< high`              | Normal     | nothing                                    |
//! | `>= high`, `< critical` | HighAlert | enhanced monitoring, notification         |
//! | `>= critical`         | Emergency  | pause trading, alert, market update, plan  |
//!
//! The emergency pause goes through the shared [`TradingSwitch`]; nothing
//! here ever resumes trading.
//!
//! The periodic liquidity check compares two [`LiquidityEstimator`]
//! figures and asks for a top-up when available liquidity is short.

use crate::application::error::ApplicationResult;
use crate::application::services::alerts::{Alert, AlertKind, AlertNotifier};
use crate::application::services::trading_switch::TradingSwitch;
use crate::domain::entities::{RiskAssessment, VolatilityEvent};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::RiskLevel;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Escalation thresholds and placeholder risk estimates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskThresholds {
    /// Volatility that triggers the high-alert protocol.
    pub high_volatility: Decimal,
    /// Volatility that triggers the emergency protocol.
    pub critical_volatility: Decimal,
    /// Market risk reported in emergency assessments.
    pub market_risk: Decimal,
    /// Liquidity risk reported in emergency assessments.
    pub liquidity_risk: Decimal,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_volatility: dec!(0.20),
            critical_volatility: dec!(0.50),
            market_risk: dec!(0.3),
            liquidity_risk: dec!(0.2),
        }
    }
}

impl RiskThresholds {
    /// Classifies a volatility reading.
    #[must_use]
    pub fn classify(&self, volatility: Decimal) -> RiskLevel {
        if volatility >= self.critical_volatility {
            RiskLevel::Emergency
        } else if volatility >= self.high_volatility {
            RiskLevel::HighAlert
        } else {
            RiskLevel::Normal
        }
    }
}

/// Source of the liquidity figures used by the periodic check.
#[async_trait]
pub trait LiquidityEstimator: Send + Sync + fmt::Debug {
    /// Liquidity currently available for market operations.
    async fn available_liquidity(&self) -> ApplicationResult<Decimal>;

    /// Liquidity the market is expected to need.
    async fn required_liquidity(&self) -> ApplicationResult<Decimal>;
}

/// Fixed liquidity figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticLiquidityEstimator {
    available: Decimal,
    required: Decimal,
}

impl Default for StaticLiquidityEstimator {
    fn default() -> Self {
        Self::new(dec!(5000000), dec!(2000000))
    }
}

impl StaticLiquidityEstimator {
    /// Creates an estimator always reporting `available` and `required`.
    #[must_use]
    pub const fn new(available: Decimal, required: Decimal) -> Self {
        Self {
            available,
            required,
        }
    }
}

#[async_trait]
impl LiquidityEstimator for StaticLiquidityEstimator {
    async fn available_liquidity(&self) -> ApplicationResult<Decimal> {
        Ok(self.available)
    }

    async fn required_liquidity(&self) -> ApplicationResult<Decimal> {
        Ok(self.required)
    }
}

/// What the risk manager did about one volatility event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskResponse {
    /// Below every threshold.
    Normal,
    /// High-alert protocol ran; trading continues.
    HighAlert,
    /// Emergency protocol ran.
    Emergency {
        /// Assessment built for the contingency plan.
        assessment: RiskAssessment,
        /// False if trading was already paused before this event.
        paused_now: bool,
    },
}

impl RiskResponse {
    /// Returns the escalation level of the response.
    #[must_use]
    pub fn level(&self) -> RiskLevel {
        match self {
            Self::Normal => RiskLevel::Normal,
            Self::HighAlert => RiskLevel::HighAlert,
            Self::Emergency { .. } => RiskLevel::Emergency,
        }
    }
}

/// Result of one liquidity-risk check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidityCheck {
    /// Enough liquidity.
    Sufficient {
        /// Available liquidity.
        available: Decimal,
        /// Required liquidity.
        required: Decimal,
    },
    /// Not enough liquidity; a top-up of `shortfall` was requested.
    Shortfall {
        /// Available liquidity.
        available: Decimal,
        /// Required liquidity.
        required: Decimal,
        /// Requested top-up.
        shortfall: Decimal,
    },
}

/// Event-driven and periodic risk controls.
#[derive(Debug)]
pub struct RiskManager {
    switch: Arc<TradingSwitch>,
    notifier: Arc<dyn AlertNotifier>,
    estimator: Arc<dyn LiquidityEstimator>,
    thresholds: RiskThresholds,
    monitoring_enhanced: AtomicBool,
}

impl RiskManager {
    /// Creates a risk manager that pauses `switch` on emergencies.
    #[must_use]
    pub fn new(
        switch: Arc<TradingSwitch>,
        notifier: Arc<dyn AlertNotifier>,
        estimator: Arc<dyn LiquidityEstimator>,
        thresholds: RiskThresholds,
    ) -> Self {
        Self {
            switch,
            notifier,
            estimator,
            thresholds,
            monitoring_enhanced: AtomicBool::new(false),
        }
    }

    /// Returns the thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Returns true once the high-alert protocol has tightened monitoring.
    #[must_use]
    pub fn is_monitoring_enhanced(&self) -> bool {
        self.monitoring_enhanced.load(Ordering::SeqCst)
    }

    /// Handles one volatility reading.
    pub async fn handle_volatility_event(&self, event: &VolatilityEvent) -> RiskResponse {
        match self.thresholds.classify(event.volatility()) {
            RiskLevel::Normal => {
                debug!(%event, "volatility within normal range");
                RiskResponse::Normal
            }
            RiskLevel::HighAlert => {
                self.activate_high_alert(event).await;
                RiskResponse::HighAlert
            }
            RiskLevel::Emergency => self.activate_emergency(event).await,
        }
    }

    async fn activate_emergency(&self, event: &VolatilityEvent) -> RiskResponse {
        error!(%event, "emergency protocol activated");
        let paused_now = self
            .switch
            .pause(format!("emergency: volatility {}", event.volatility()));

        self.notifier
            .notify(
                Alert::new(
                    AlertKind::Emergency,
                    format!(
                        "volatility {} at price {}, automatic trading paused",
                        event.volatility(),
                        event.current_price()
                    ),
                )
                .with_symbol(event.symbol().clone()),
            )
            .await;
        self.notifier
            .notify(
                Alert::new(
                    AlertKind::MarketUpdate,
                    format!("abnormal volatility, price {}", event.current_price()),
                )
                .with_symbol(event.symbol().clone()),
            )
            .await;

        let assessment = RiskAssessment::new(
            event.symbol().clone(),
            RiskLevel::Emergency,
            event.volatility(),
            self.thresholds.market_risk,
            self.thresholds.liquidity_risk,
        );
        info!(%assessment, "contingency plan executed");

        RiskResponse::Emergency {
            assessment,
            paused_now,
        }
    }

    async fn activate_high_alert(&self, event: &VolatilityEvent) {
        warn!(%event, "high alert protocol activated");
        if !self.monitoring_enhanced.swap(true, Ordering::SeqCst) {
            info!("enhanced monitoring enabled");
        }
        self.notifier
            .notify(
                Alert::new(
                    AlertKind::HighAlert,
                    format!("volatility {} at price {}", event.volatility(), event.current_price()),
                )
                .with_symbol(event.symbol().clone()),
            )
            .await;
    }

    /// Compares available with required liquidity and requests a top-up
    /// when short.
    ///
    /// # Errors
    ///
    /// Returns an error if an estimate cannot be obtained or the shortfall
    /// cannot be computed.
    pub async fn check_liquidity_risk(&self) -> ApplicationResult<LiquidityCheck> {
        let available = self.estimator.available_liquidity().await?;
        let required = self.estimator.required_liquidity().await?;

        if available >= required {
            debug!(%available, %required, "liquidity sufficient");
            return Ok(LiquidityCheck::Sufficient {
                available,
                required,
            });
        }

        let shortfall = required.safe_sub(available)?;
        warn!(%available, %required, %shortfall, "liquidity shortfall");
        self.notifier
            .notify(Alert::new(
                AlertKind::LiquidityShortfall,
                format!("available {available} below required {required}"),
            ))
            .await;
        self.notifier
            .notify(Alert::new(
                AlertKind::SupplyRequest,
                format!("requesting liquidity supply of {shortfall}"),
            ))
            .await;

        Ok(LiquidityCheck::Shortfall {
            available,
            required,
            shortfall,
        })
    }

    /// Consumes volatility events until the channel closes or `shutdown`
    /// turns true.
    pub async fn run_event_loop(
        self: Arc<Self>,
        mut events: mpsc::Receiver<VolatilityEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("risk event loop started");
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        let response = self.handle_volatility_event(&event).await;
                        debug!(level = %response.level(), "volatility event handled");
                    }
                    None => {
                        debug!("volatility channel closed");
                        break;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("risk event loop stopped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::application::services::alerts::RecordingAlertNotifier;
    use crate::domain::value_objects::Symbol;
    use std::time::Duration;

    fn event(volatility: Decimal) -> VolatilityEvent {
        VolatilityEvent::new(Symbol::new("SFRT").unwrap(), volatility, dec!(150))
    }

    fn manager(
        estimator: StaticLiquidityEstimator,
    ) -> (Arc<RiskManager>, Arc<TradingSwitch>, Arc<RecordingAlertNotifier>) {
        let switch = Arc::new(TradingSwitch::default());
        let recorder = Arc::new(RecordingAlertNotifier::new());
        let manager = Arc::new(RiskManager::new(
            Arc::clone(&switch),
            recorder.clone(),
            Arc::new(estimator),
            RiskThresholds::default(),
        ));
        (manager, switch, recorder)
    }

    mod volatility {
        use super::*;

        #[test]
        fn classification_is_inclusive() {
            let thresholds = RiskThresholds::default();
            assert_eq!(thresholds.classify(dec!(0.1999)), RiskLevel::Normal);
            assert_eq!(thresholds.classify(dec!(0.20)), RiskLevel::HighAlert);
            assert_eq!(thresholds.classify(dec!(0.4999)), RiskLevel::HighAlert);
            assert_eq!(thresholds.classify(dec!(0.50)), RiskLevel::Emergency);
        }

        #[tokio::test]
        async fn emergency_pauses_trading() {
            let (manager, switch, recorder) = manager(StaticLiquidityEstimator::default());

            let response = manager.handle_volatility_event(&event(dec!(0.55))).await;

            assert!(!switch.is_enabled());
            assert_eq!(
                recorder.kinds(),
                vec![AlertKind::Emergency, AlertKind::MarketUpdate]
            );
            let RiskResponse::Emergency {
                assessment,
                paused_now,
            } = response
            else {
                unreachable!("expected an emergency response");
            };
            assert!(paused_now);
            assert_eq!(assessment.level(), RiskLevel::Emergency);
            assert_eq!(assessment.market_risk(), dec!(0.3));
            assert_eq!(assessment.liquidity_risk(), dec!(0.2));
        }

        #[tokio::test]
        async fn repeated_emergency_keeps_first_pause() {
            let (manager, switch, _) = manager(StaticLiquidityEstimator::default());
            manager.handle_volatility_event(&event(dec!(0.60))).await;
            let second = manager.handle_volatility_event(&event(dec!(0.70))).await;

            assert!(matches!(second, RiskResponse::Emergency { paused_now: false, .. }));
            assert_eq!(switch.pause_reason().unwrap(), "emergency: volatility 0.60");
        }

        #[tokio::test]
        async fn high_alert_keeps_trading() {
            let (manager, switch, recorder) = manager(StaticLiquidityEstimator::default());

            let response = manager.handle_volatility_event(&event(dec!(0.25))).await;

            assert_eq!(response, RiskResponse::HighAlert);
            assert!(switch.is_enabled());
            assert!(manager.is_monitoring_enhanced());
            assert_eq!(recorder.kinds(), vec![AlertKind::HighAlert]);
        }

        #[tokio::test]
        async fn normal_volatility_is_ignored() {
            let (manager, switch, recorder) = manager(StaticLiquidityEstimator::default());
            let response = manager.handle_volatility_event(&event(dec!(0.05))).await;
            assert_eq!(response, RiskResponse::Normal);
            assert!(switch.is_enabled());
            assert!(recorder.is_empty());
        }

        #[tokio::test]
        async fn event_loop_consumes_until_closed() {
            let (manager, switch, _) = manager(StaticLiquidityEstimator::default());
            let (tx, rx) = mpsc::channel(4);
            let (_shutdown_tx, shutdown_rx) = watch::channel(false);
            let handle = tokio::spawn(Arc::clone(&manager).run_event_loop(rx, shutdown_rx));

            tx.send(event(dec!(0.51))).await.unwrap();
            drop(tx);
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .unwrap()
                .unwrap();
            assert!(!switch.is_enabled());
        }

        #[tokio::test]
        async fn event_loop_stops_on_shutdown() {
            let (manager, _, _) = manager(StaticLiquidityEstimator::default());
            let (_tx, rx) = mpsc::channel::<VolatilityEvent>(4);
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let handle = tokio::spawn(manager.run_event_loop(rx, shutdown_rx));

            shutdown_tx.send(true).unwrap();
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .unwrap()
                .unwrap();
        }
    }

    mod liquidity {
        use super::*;

        #[tokio::test]
        async fn default_estimates_are_sufficient() {
            let (manager, _, recorder) = manager(StaticLiquidityEstimator::default());
            let check = manager.check_liquidity_risk().await.unwrap();
            assert_eq!(
                check,
                LiquidityCheck::Sufficient {
                    available: dec!(5000000),
                    required: dec!(2000000),
                }
            );
            assert!(recorder.is_empty());
        }

        #[tokio::test]
        async fn shortfall_requests_supply() {
            let (manager, switch, recorder) =
                manager(StaticLiquidityEstimator::new(dec!(1500000), dec!(2000000)));
            let check = manager.check_liquidity_risk().await.unwrap();
            assert_eq!(
                check,
                LiquidityCheck::Shortfall {
                    available: dec!(1500000),
                    required: dec!(2000000),
                    shortfall: dec!(500000),
                }
            );
            assert_eq!(
                recorder.kinds(),
                vec![AlertKind::LiquidityShortfall, AlertKind::SupplyRequest]
            );
            assert!(switch.is_enabled());
        }

        #[derive(Debug)]
        struct BrokenEstimator;

        #[async_trait]
        impl LiquidityEstimator for BrokenEstimator {
            async fn available_liquidity(&self) -> ApplicationResult<Decimal> {
                Err(ApplicationError::internal("balance feed offline"))
            }

            async fn required_liquidity(&self) -> ApplicationResult<Decimal> {
                Ok(dec!(1))
            }
        }

        #[tokio::test]
        async fn estimator_error_is_returned() {
            let manager = RiskManager::new(
                Arc::new(TradingSwitch::default()),
                Arc::new(RecordingAlertNotifier::new()),
                Arc::new(BrokenEstimator),
                RiskThresholds::default(),
            );
            assert!(manager.check_liquidity_risk().await.is_err());
        }
    }
}
