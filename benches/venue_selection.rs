//! Benchmarks for metrics aggregation and venue selection.

#![allow(clippy::unwrap_used, missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;
use venue_liquidity::application::services::{
    AggregationConfig, ArbitrageAnalyzer, BestPriceSelection, MetricsAggregator,
    SelectionStrategy, WeightedScoreSelection,
};
use venue_liquidity::domain::entities::{LiquidityOperation, VenueMetrics};
use venue_liquidity::domain::value_objects::{OrderSide, Symbol, VenueId};
use venue_liquidity::infrastructure::venues::{SimulatedVenueClient, VenueClient, VenueRegistry};

fn symbols() -> (Symbol, Symbol) {
    (Symbol::new("SFRT").unwrap(), Symbol::new("JPY").unwrap())
}

fn aggregator() -> MetricsAggregator {
    let (base, quote) = symbols();
    let clients = VenueId::ALL.iter().zip(0i64..).map(|(venue_id, i)| {
        Arc::new(
            SimulatedVenueClient::new(*venue_id, base.clone(), quote.clone())
                .with_price(Decimal::new(15000 + i * 7, 2))
                .with_balance(base.clone(), Decimal::from(1_000_000))
                .with_balance(quote.clone(), Decimal::from(1_000_000_000)),
        ) as Arc<dyn VenueClient>
    });
    MetricsAggregator::new(
        Arc::new(VenueRegistry::from_clients(clients)),
        quote,
        AggregationConfig::default(),
    )
}

fn bench_aggregation(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let aggregator = aggregator();
    let (base, _) = symbols();

    c.bench_function("aggregate_all_venues", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(aggregator.aggregate(&base).await) });
    });
}

fn bench_selection(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let (base, _) = symbols();
    let metrics: BTreeMap<VenueId, VenueMetrics> =
        runtime.block_on(async { aggregator().aggregate(&base).await });
    let prices: BTreeMap<VenueId, Decimal> = metrics
        .iter()
        .map(|(venue_id, m)| (*venue_id, m.current_price()))
        .collect();
    let operation =
        LiquidityOperation::market(OrderSide::Buy, base.clone(), Decimal::from(1000), "bench").unwrap();

    let weighted = WeightedScoreSelection::default();
    c.bench_function("weighted_score_select", |b| {
        b.iter(|| weighted.select(black_box(&metrics), black_box(&operation)));
    });

    let best_price = BestPriceSelection::new();
    c.bench_function("best_price_select", |b| {
        b.iter(|| best_price.select(black_box(&metrics), black_box(&operation)));
    });

    let analyzer = ArbitrageAnalyzer::default();
    c.bench_function("find_arbitrage_opportunity", |b| {
        b.iter(|| analyzer.find_opportunity(black_box(&base), black_box(&prices)));
    });
}

criterion_group!(benches, bench_aggregation, bench_selection);
criterion_main!(benches);
