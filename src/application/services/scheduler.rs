//! # Scheduler
//!
//! Fixed-interval periodic tasks.
//!
//! Each [`PeriodicJob`] runs on its own task and timer. A job's run is
//! awaited before the next tick is taken, and missed ticks are skipped, so
//! two runs of the same job never overlap. Different jobs interleave
//! freely. All jobs stop when the scheduler is shut down.

use crate::application::services::liquidity_controller::{CycleOutcome, LiquidityController};
use crate::application::services::multi_venue_manager::MultiVenueManager;
use crate::application::services::risk_manager::RiskManager;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// A unit of periodic work.
#[async_trait]
pub trait PeriodicJob: Send + Sync + fmt::Debug {
    /// Returns the job name used in logs.
    fn name(&self) -> &'static str;

    /// Runs the job once. Failures are logged by the job itself.
    async fn run_once(&self);
}

/// Cross-venue arbitrage scan.
#[derive(Debug, Clone)]
pub struct ArbitrageScanJob {
    manager: Arc<MultiVenueManager>,
}

impl ArbitrageScanJob {
    /// Creates the job.
    #[must_use]
    pub fn new(manager: Arc<MultiVenueManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl PeriodicJob for ArbitrageScanJob {
    fn name(&self) -> &'static str {
        "arbitrage_scan"
    }

    async fn run_once(&self) {
        let outcome = self.manager.run_arbitrage_scan().await;
        debug!(%outcome, "arbitrage scan finished");
    }
}

/// Liquidity control cycle.
#[derive(Debug, Clone)]
pub struct LiquidityCycleJob {
    controller: Arc<LiquidityController>,
}

impl LiquidityCycleJob {
    /// Creates the job.
    #[must_use]
    pub fn new(controller: Arc<LiquidityController>) -> Self {
        Self { controller }
    }
}

#[async_trait]
impl PeriodicJob for LiquidityCycleJob {
    fn name(&self) -> &'static str {
        "liquidity_cycle"
    }

    async fn run_once(&self) {
        match self.controller.run_cycle().await {
            Ok(CycleOutcome::Decided { decision, .. }) => {
                debug!(%decision, "liquidity cycle finished");
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "liquidity cycle failed"),
        }
    }
}

/// Periodic liquidity-risk check.
#[derive(Debug, Clone)]
pub struct LiquidityRiskJob {
    risk_manager: Arc<RiskManager>,
}

impl LiquidityRiskJob {
    /// Creates the job.
    #[must_use]
    pub fn new(risk_manager: Arc<RiskManager>) -> Self {
        Self { risk_manager }
    }
}

#[async_trait]
impl PeriodicJob for LiquidityRiskJob {
    fn name(&self) -> &'static str {
        "liquidity_risk_check"
    }

    async fn run_once(&self) {
        if let Err(e) = self.risk_manager.check_liquidity_risk().await {
            error!(error = %e, "liquidity risk check failed");
        }
    }
}

/// Owns the periodic tasks and their shutdown signal.
#[derive(Debug)]
pub struct Scheduler {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Creates a scheduler with no tasks.
    #[must_use]
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    /// Returns a receiver that turns true on shutdown.
    #[must_use]
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Returns the names of the scheduled jobs, in spawn order.
    #[must_use]
    pub fn job_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|(name, _)| *name).collect()
    }

    /// Runs `job` every `period`, starting immediately.
    pub fn spawn(&mut self, job: Arc<dyn PeriodicJob>, period: Duration) {
        let name = job.name();
        let handle = tokio::spawn(run_periodic(job, period, self.shutdown_signal()));
        self.tasks.push((name, handle));
    }

    /// Tracks an already spawned task so shutdown waits for it.
    pub fn track(&mut self, name: &'static str, handle: JoinHandle<()>) {
        self.tasks.push((name, handle));
    }

    /// Signals shutdown and waits for every task to stop.
    ///
    /// A job in the middle of a run finishes that run first.
    pub async fn shutdown(self) {
        self.shutdown_tx.send_replace(true);
        for (name, handle) in self.tasks {
            if let Err(e) = handle.await {
                warn!(job = name, error = %e, "periodic task ended abnormally");
            }
        }
        info!("scheduler stopped");
    }
}

async fn run_periodic(
    job: Arc<dyn PeriodicJob>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(job = job.name(), ?period, "periodic job started");

    loop {
        tokio::select! {
            _ = ticker.tick() => job.run_once().await,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!(job = job.name(), "periodic job stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingJob {
        runs: AtomicUsize,
        running: AtomicUsize,
        max_concurrent: AtomicUsize,
        work: Duration,
    }

    #[async_trait]
    impl PeriodicJob for CountingJob {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn run_once(&self) {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_concurrent.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.work).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn runs_repeatedly_until_shutdown() {
        let job = Arc::new(CountingJob::default());
        let mut scheduler = Scheduler::new();
        scheduler.spawn(job.clone(), Duration::from_millis(10));
        assert_eq!(scheduler.job_names(), vec!["counting"]);

        tokio::time::sleep(Duration::from_millis(60)).await;
        scheduler.shutdown().await;

        let runs = job.runs.load(Ordering::SeqCst);
        assert!(runs >= 2, "expected several runs, got {runs}");
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), runs);
    }

    #[tokio::test]
    async fn slow_job_never_overlaps() {
        let job = Arc::new(CountingJob {
            work: Duration::from_millis(25),
            ..CountingJob::default()
        });
        let mut scheduler = Scheduler::new();
        scheduler.spawn(job.clone(), Duration::from_millis(5));

        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.shutdown().await;

        assert_eq!(job.max_concurrent.load(Ordering::SeqCst), 1);
        assert!(job.runs.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn shutdown_signal_is_shared() {
        let scheduler = Scheduler::new();
        let signal = scheduler.shutdown_signal();
        assert!(!*signal.borrow());
        scheduler.shutdown().await;
        assert!(*signal.borrow());
    }
}
