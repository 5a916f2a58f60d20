//! End-to-end coordinator flows over simulated venues.
//!
//! Covers:
//! 1. Arbitrage detection and its profit band
//! 2. Stabilisation decisions above and below target
//! 3. Emergency escalation pausing automatic trading
//! 4. Aggregation surviving a timed-out venue
//! 5. A full control cycle driving a staged program to completion
//! 6. A volatile market paused by the running runtime

#![allow(clippy::unwrap_used, clippy::panic)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use venue_liquidity::application::runtime::LiquidityRuntime;
use venue_liquidity::application::services::{
    AggregationConfig, AlertKind, ArbitrageAnalyzer, CycleOutcome, ExecutionMonitor,
    LiquidityController, LiquidityParameters, MetricsAggregator, MultiVenueManager, ProgramStop,
    RecordingAlertNotifier, RiskManager, RiskResponse, RiskThresholds, StagedProgramConfig,
    StaticLiquidityEstimator, TradingSwitch, WeightedScoreSelection,
};
use venue_liquidity::config::AppConfig;
use venue_liquidity::domain::entities::VolatilityEvent;
use venue_liquidity::domain::value_objects::{LiquidityAction, OrderSide, Symbol, VenueId};
use venue_liquidity::infrastructure::venues::{SimulatedVenueClient, VenueClient, VenueRegistry};

fn sfrt() -> Symbol {
    Symbol::new("SFRT").unwrap()
}

fn jpy() -> Symbol {
    Symbol::new("JPY").unwrap()
}

fn venue(venue_id: VenueId, price: Decimal) -> Arc<SimulatedVenueClient> {
    Arc::new(
        SimulatedVenueClient::new(venue_id, sfrt(), jpy())
            .with_price(price)
            .with_balance(sfrt(), dec!(5000000))
            .with_balance(jpy(), dec!(1000000000)),
    )
}

fn registry(clients: &[Arc<SimulatedVenueClient>]) -> VenueRegistry {
    VenueRegistry::from_clients(
        clients
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn VenueClient>),
    )
}

fn manager(clients: &[Arc<SimulatedVenueClient>], per_venue_timeout_ms: u64) -> MultiVenueManager {
    MultiVenueManager::new(
        MetricsAggregator::new(
            Arc::new(registry(clients)),
            jpy(),
            AggregationConfig::with_timeout(per_venue_timeout_ms),
        ),
        Arc::new(WeightedScoreSelection::default()),
        ArbitrageAnalyzer::default(),
        ExecutionMonitor::new(Duration::from_secs(1)),
        Arc::new(TradingSwitch::default()),
        sfrt(),
    )
}

#[test]
fn test_wide_gap_is_an_opportunity() {
    let prices = BTreeMap::from([
        (VenueId::Bitbank, dec!(100)),
        (VenueId::Bitflyer, dec!(103)),
        (VenueId::Binance, dec!(105)),
    ]);

    let opportunity = ArbitrageAnalyzer::default()
        .find_opportunity(&sfrt(), &prices)
        .unwrap();

    assert_eq!(opportunity.buy_venue(), VenueId::Bitbank);
    assert_eq!(opportunity.sell_venue(), VenueId::Binance);
    assert_eq!(opportunity.profit_rate(), dec!(0.05));
}

#[test]
fn test_narrow_gap_is_rejected() {
    let prices = BTreeMap::from([(VenueId::Bitbank, dec!(100)), (VenueId::Bitflyer, dec!(100.3))]);

    assert!(
        ArbitrageAnalyzer::default()
            .find_opportunity(&sfrt(), &prices)
            .is_none()
    );
}

#[test]
fn test_price_above_target_sells() {
    let decision = LiquidityParameters::default().decide(dec!(200), 3).unwrap();

    assert_eq!(decision.action(), LiquidityAction::StabilizeBySelling);
    assert_eq!(decision.amount(), dec!(666600));
}

#[test]
fn test_price_below_target_buys() {
    let decision = LiquidityParameters::default().decide(dec!(140), 3).unwrap();

    assert_eq!(decision.action(), LiquidityAction::StabilizeByBuying);
    assert_eq!(decision.amount(), dec!(160080));
}

#[tokio::test]
async fn test_critical_volatility_pauses_trading() {
    let switch = Arc::new(TradingSwitch::default());
    let notifier = Arc::new(RecordingAlertNotifier::new());
    let risk_manager = RiskManager::new(
        Arc::clone(&switch),
        notifier.clone(),
        Arc::new(StaticLiquidityEstimator::default()),
        RiskThresholds::default(),
    );

    let response = risk_manager
        .handle_volatility_event(&VolatilityEvent::new(sfrt(), dec!(0.55), dec!(150)))
        .await;

    assert!(matches!(response, RiskResponse::Emergency { .. }));
    assert!(!switch.is_enabled());
    assert!(notifier.kinds().contains(&AlertKind::Emergency));
}

#[tokio::test]
async fn test_timed_out_venue_stays_in_aggregation() {
    let slow = venue(VenueId::Okx, dec!(150));
    slow.set_latency(Duration::from_secs(2));
    let clients = [
        venue(VenueId::Bitbank, dec!(150)),
        venue(VenueId::Bitflyer, dec!(151)),
        slow,
    ];
    let aggregator = MetricsAggregator::new(
        Arc::new(registry(&clients)),
        jpy(),
        AggregationConfig::with_timeout(100),
    );

    let metrics = aggregator.aggregate(&sfrt()).await;

    assert_eq!(metrics.len(), 3);
    let timed_out = metrics.get(&VenueId::Okx).unwrap();
    assert!(!timed_out.is_available());
    assert_eq!(timed_out.quality_score(), Decimal::ZERO);
    assert!(metrics.get(&VenueId::Bitbank).unwrap().is_available());
}

#[tokio::test]
async fn test_cycle_runs_sell_program_to_completion() {
    let clients = [venue(VenueId::Bitbank, dec!(200)), venue(VenueId::Bitflyer, dec!(200))];
    let params = LiquidityParameters {
        sell_program: StagedProgramConfig {
            chunks: 3,
            pause: Duration::from_millis(5),
        },
        ..LiquidityParameters::default()
    };
    let controller = LiquidityController::new(Arc::new(manager(&clients, 500)), params);

    let CycleOutcome::Decided {
        decision, program, ..
    } = controller.run_cycle().await.unwrap()
    else {
        panic!("expected a decision");
    };
    assert_eq!(decision.action(), LiquidityAction::StabilizeBySelling);

    let report = tokio::time::timeout(Duration::from_secs(2), program.unwrap())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.side(), OrderSide::Sell);
    assert_eq!(*report.stop(), ProgramStop::Completed);
    assert_eq!(report.chunks().len(), 3);
    assert_eq!(report.executed(), dec!(666600));
    assert_eq!(report.remaining(), Decimal::ZERO);

    let orders: usize = clients.iter().map(|c| c.orders_received()).sum();
    assert_eq!(orders, 3);
    assert!(!controller.is_program_running());
}

#[tokio::test]
async fn test_runtime_pauses_on_volatile_market() {
    let clients = [venue(VenueId::Bitbank, dec!(100)), venue(VenueId::Bitflyer, dec!(160))];
    let mut config = AppConfig::default();
    config.arbitrage.enabled = false;
    config.liquidity.buy.pause_secs = 60;
    let notifier = Arc::new(RecordingAlertNotifier::new());

    let runtime = LiquidityRuntime::start(&config, registry(&clients), notifier.clone()).unwrap();

    let paused = tokio::time::timeout(Duration::from_secs(2), async {
        while runtime.is_automatic_trading_enabled() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(paused.is_ok(), "volatility 0.6 should pause trading");
    assert!(notifier.kinds().contains(&AlertKind::Emergency));

    tokio::time::timeout(Duration::from_secs(2), runtime.shutdown())
        .await
        .unwrap();
}
