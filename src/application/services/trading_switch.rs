//! # Trading Switch
//!
//! Process-wide automatic-trading flag.
//!
//! The flag is the only mutable state shared between the liquidity
//! controller, the arbitrage scan and the risk manager. Reads are a single
//! atomic load; transitions use `compare_exchange` so "is it enabled" and
//! "disable it" can never race. Every transition is also published on a
//! `watch` channel, which staged programs use to abort a pacing delay the
//! moment trading is paused.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::application::services::trading_switch::TradingSwitch;
//!
//! let switch = TradingSwitch::new(true);
//! assert!(switch.pause("volatility 0.55"));
//! assert!(!switch.pause("again"));
//! assert!(!switch.is_enabled());
//!
//! assert!(switch.resume());
//! assert!(switch.is_enabled());
//! ```

use crate::domain::value_objects::Timestamp;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{info, warn};

/// Atomic automatic-trading flag with change notification.
#[derive(Debug)]
pub struct TradingSwitch {
    enabled: AtomicBool,
    notifier: watch::Sender<bool>,
    pause_reason: RwLock<Option<String>>,
    paused_at: RwLock<Option<Timestamp>>,
}

impl Default for TradingSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TradingSwitch {
    /// Creates a switch in the given state.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let (notifier, _) = watch::channel(enabled);
        Self {
            enabled: AtomicBool::new(enabled),
            notifier,
            pause_reason: RwLock::new(None),
            paused_at: RwLock::new(None),
        }
    }

    /// Returns true if automatic trading is enabled.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Pauses automatic trading.
    ///
    /// Returns true if this call performed the transition; pausing an
    /// already paused switch keeps the original reason.
    pub fn pause(&self, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        if self
            .enabled
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            *self.pause_reason.write() = Some(reason.clone());
            *self.paused_at.write() = Some(Timestamp::now());
            self.notifier.send_replace(false);
            warn!(%reason, "automatic trading paused");
            true
        } else {
            info!(%reason, "automatic trading already paused");
            false
        }
    }

    /// Resumes automatic trading.
    ///
    /// Returns true if this call performed the transition.
    pub fn resume(&self) -> bool {
        if self
            .enabled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            *self.pause_reason.write() = None;
            *self.paused_at.write() = None;
            self.notifier.send_replace(true);
            info!("automatic trading resumed");
            true
        } else {
            false
        }
    }

    /// Returns why trading was paused, while it is paused.
    #[must_use]
    pub fn pause_reason(&self) -> Option<String> {
        self.pause_reason.read().clone()
    }

    /// Returns when trading was paused, while it is paused.
    #[must_use]
    pub fn paused_at(&self) -> Option<Timestamp> {
        *self.paused_at.read()
    }

    /// Returns a signal that resolves once trading is paused.
    #[must_use]
    pub fn pause_signal(&self) -> PauseSignal {
        PauseSignal {
            receiver: self.notifier.subscribe(),
        }
    }
}

/// Cancellation signal derived from a [`TradingSwitch`].
#[derive(Debug, Clone)]
pub struct PauseSignal {
    receiver: watch::Receiver<bool>,
}

impl PauseSignal {
    /// Resolves when trading is (or already was) paused.
    ///
    /// Never resolves if the switch has been dropped.
    pub async fn paused(&mut self) {
        if self.receiver.wait_for(|enabled| !*enabled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
