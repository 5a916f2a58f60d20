//! # Alerts
//!
//! Outbound notification port of the risk manager.
//!
//! The risk manager raises [`Alert`]s; where they go (pager, chat, e-mail)
//! is up to the [`AlertNotifier`] it was built with. Two implementations
//! ship with the crate: [`TracingAlertNotifier`] writes alerts to the log
//! and [`RecordingAlertNotifier`] keeps them in memory.

use crate::domain::value_objects::{Symbol, Timestamp};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Emergency protocol fired; automatic trading paused.
    Emergency,
    /// Volatility crossed the high-alert threshold.
    HighAlert,
    /// Market status notice for users.
    MarketUpdate,
    /// Available liquidity below the required level.
    LiquidityShortfall,
    /// Request to a liquidity provider to top up supply.
    SupplyRequest,
}

impl AlertKind {
    /// Returns true for alerts that need an operator to act.
    #[must_use]
    pub const fn requires_operator(self) -> bool {
        matches!(self, Self::Emergency | Self::LiquidityShortfall)
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Emergency => "emergency",
            Self::HighAlert => "high_alert",
            Self::MarketUpdate => "market_update",
            Self::LiquidityShortfall => "liquidity_shortfall",
            Self::SupplyRequest => "supply_request",
        };
        write!(f, "{s}")
    }
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    kind: AlertKind,
    symbol: Option<Symbol>,
    message: String,
    raised_at: Timestamp,
}

impl Alert {
    /// Creates an alert raised now.
    #[must_use]
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            symbol: None,
            message: message.into(),
            raised_at: Timestamp::now(),
        }
    }

    /// Attaches the symbol concerned.
    #[must_use]
    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Returns the kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    /// Returns the symbol, if any.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    /// Returns the message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the alert was raised.
    #[inline]
    #[must_use]
    pub fn raised_at(&self) -> Timestamp {
        self.raised_at
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "[{}] {}: {}", self.kind, symbol, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Delivers alerts.
///
/// Delivery is best effort: implementations log their own failures and
/// never fail the caller.
#[async_trait]
pub trait AlertNotifier: Send + Sync + fmt::Debug {
    /// Delivers one alert.
    async fn notify(&self, alert: Alert);

    /// Returns the name of this notifier.
    fn name(&self) -> &'static str;
}

/// Writes alerts to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertNotifier;

#[async_trait]
impl AlertNotifier for TracingAlertNotifier {
    async fn notify(&self, alert: Alert) {
        match alert.kind() {
            AlertKind::Emergency => error!(kind = %alert.kind(), "{}", alert.message()),
            AlertKind::HighAlert | AlertKind::LiquidityShortfall => {
                warn!(kind = %alert.kind(), "{}", alert.message());
            }
            AlertKind::MarketUpdate | AlertKind::SupplyRequest => {
                info!(kind = %alert.kind(), "{}", alert.message());
            }
        }
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

/// Keeps every alert in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingAlertNotifier {
    alerts: RwLock<Vec<Alert>>,
}

impl RecordingAlertNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded alerts.
    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().clone()
    }

    /// Returns the kinds of the recorded alerts, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<AlertKind> {
        self.alerts.read().iter().map(Alert::kind).collect()
    }

    /// Returns the number of recorded alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.read().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.read().is_empty()
    }
}

#[async_trait]
impl AlertNotifier for RecordingAlertNotifier {
    async fn notify(&self, alert: Alert) {
        self.alerts.write().push(alert);
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
