//! # Metrics Aggregation
//!
//! Concurrent per-venue health collection.
//!
//! This module provides the [`MetricsAggregator`], which queries every
//! registered venue client in parallel with an individual timeout and turns
//! the answers into [`VenueMetrics`]. A venue that is unavailable, fails or
//! times out is recorded as unavailable (quality 0); it never fails the
//! whole pass and is never dropped from the result.

use crate::domain::entities::{OrderBook, Trade, VenueMetrics};
use crate::domain::value_objects::{Symbol, Timestamp, VenueId};
use crate::infrastructure::venues::error::{VenueError, VenueResult};
use crate::infrastructure::venues::registry::VenueRegistry;
use crate::infrastructure::venues::traits::VenueClient;
use futures::future::join_all;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Seconds in the trade history window used for volume and fees.
const HISTORY_WINDOW_SECS: i64 = 24 * 60 * 60;

/// Configuration for metrics aggregation.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Per-venue timeout in milliseconds.
    pub per_venue_timeout_ms: u64,
    /// Order book levels requested per side.
    pub order_book_depth: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            per_venue_timeout_ms: 5000,
            order_book_depth: 10,
        }
    }
}

impl AggregationConfig {
    /// Creates a configuration with the specified per-venue timeout.
    #[must_use]
    pub fn with_timeout(per_venue_timeout_ms: u64) -> Self {
        Self {
            per_venue_timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the order book depth.
    #[must_use]
    pub fn with_order_book_depth(mut self, depth: usize) -> Self {
        self.order_book_depth = depth;
        self
    }
}

/// Engine for collecting venue metrics and prices from all venues.
#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    registry: Arc<VenueRegistry>,
    quote_currency: Symbol,
    config: AggregationConfig,
}

impl MetricsAggregator {
    /// Creates a new aggregator over `registry`, pricing in `quote_currency`.
    #[must_use]
    pub fn new(
        registry: Arc<VenueRegistry>,
        quote_currency: Symbol,
        config: AggregationConfig,
    ) -> Self {
        Self {
            registry,
            quote_currency,
            config,
        }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Returns the quote currency prices are requested in.
    #[must_use]
    pub fn quote_currency(&self) -> &Symbol {
        &self.quote_currency
    }

    /// Returns the venue registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<VenueRegistry> {
        &self.registry
    }

    /// Collects metrics for `symbol` from every registered venue.
    ///
    /// The result has one entry per registered venue. An empty registry
    /// yields an empty map.
    pub async fn aggregate(&self, symbol: &Symbol) -> BTreeMap<VenueId, VenueMetrics> {
        if self.registry.is_empty() {
            warn!("metrics aggregation skipped: no venues registered");
            return BTreeMap::new();
        }

        let quote = self.quote_currency.clone();
        let symbol = symbol.clone();
        let depth = self.config.order_book_depth;
        let outcomes = self
            .fan_out(move |client| {
                collect_venue_metrics(client, symbol.clone(), quote.clone(), depth)
            })
            .await;

        outcomes
            .into_iter()
            .map(|(venue_id, outcome)| {
                let metrics = outcome.unwrap_or_else(|error| {
                    warn!(venue = %venue_id, %error, "venue metrics unavailable");
                    VenueMetrics::unavailable_with_error(venue_id, error.to_string())
                });
                (venue_id, metrics)
            })
            .collect()
    }

    /// Collects the current price of `symbol` from every venue.
    ///
    /// Only strictly positive, successfully returned prices are kept;
    /// failures and venues without a price are left out.
    pub async fn current_prices(&self, symbol: &Symbol) -> BTreeMap<VenueId, Decimal> {
        let quote = self.quote_currency.clone();
        let symbol = symbol.clone();
        let outcomes = self
            .fan_out(move |client| {
                let symbol = symbol.clone();
                let quote = quote.clone();
                async move { client.current_price(&symbol, &quote).await }
            })
            .await;

        outcomes
            .into_iter()
            .filter_map(|(venue_id, outcome)| match outcome {
                Ok(Some(price)) if price > Decimal::ZERO => Some((venue_id, price)),
                Ok(_) => {
                    debug!(venue = %venue_id, "venue returned no usable price");
                    None
                }
                Err(error) => {
                    warn!(venue = %venue_id, %error, "price request failed");
                    None
                }
            })
            .collect()
    }

    /// Returns the venues that currently report themselves available.
    pub async fn available_venues(&self) -> Vec<VenueId> {
        let outcomes = self
            .fan_out(|client| async move { Ok(client.is_available().await) })
            .await;
        outcomes
            .into_iter()
            .filter_map(|(venue_id, outcome)| matches!(outcome, Ok(true)).then_some(venue_id))
            .collect()
    }

    /// Runs `call` against every venue concurrently, each under the
    /// per-venue timeout, and returns the outcomes in catalogue order.
    async fn fan_out<T, F, Fut>(&self, call: F) -> Vec<(VenueId, VenueResult<T>)>
    where
        F: Fn(Arc<dyn VenueClient>) -> Fut,
        Fut: Future<Output = VenueResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let timeout_ms = self.config.per_venue_timeout_ms;
        let per_venue_timeout = Duration::from_millis(timeout_ms);

        let handles: Vec<_> = self
            .registry
            .iter()
            .map(|(venue_id, client)| {
                let request = call(Arc::clone(client));
                let handle = tokio::spawn(async move {
                    match timeout(per_venue_timeout, request).await {
                        Ok(result) => result,
                        Err(_) => Err(VenueError::timeout_after("venue request", timeout_ms)),
                    }
                });
                (venue_id, handle)
            })
            .collect();

        join_all(handles.into_iter().map(|(venue_id, handle)| async move {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(VenueError::internal(format!("task panicked: {e}"))),
            };
            (venue_id, outcome)
        }))
        .await
    }
}

/// Queries one venue and builds its metrics.
async fn collect_venue_metrics(
    client: Arc<dyn VenueClient>,
    symbol: Symbol,
    quote: Symbol,
    depth: usize,
) -> VenueResult<VenueMetrics> {
    let venue_id = client.venue_id();
    let started = Instant::now();

    if !client.is_available().await {
        debug!(venue = %venue_id, "venue reports unavailable");
        return Ok(VenueMetrics::unavailable(venue_id));
    }

    let since = Timestamp::now().sub_secs(HISTORY_WINDOW_SECS);
    let (price, book, limits, compliance, history) = tokio::join!(
        client.current_price(&symbol, &quote),
        client.order_book(&symbol, depth),
        client.trading_limits(),
        client.compliance_status(),
        client.trade_history(&symbol, since),
    );
    let price = price?.unwrap_or(Decimal::ZERO);
    let book = book?;
    let limits = limits?;
    let compliance = compliance?;
    let (volume_24h, fee_rate) = match history {
        Ok(trades) => summarize_trades(&trades),
        Err(error) => {
            debug!(venue = %venue_id, %error, "trade history unavailable");
            (Decimal::ZERO, None)
        }
    };
    let response_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(VenueMetrics::builder(venue_id)
        .available(true)
        .current_price(price)
        .liquidity(book_liquidity(&book))
        .spread(book.spread())
        .volume_24h(volume_24h)
        .trading_limits(limits)
        .compliance(compliance)
        .response_time_ms(response_time_ms)
        .fee_rate(fee_rate)
        .build())
}

/// Bid plus ask notional of a book.
fn book_liquidity(book: &OrderBook) -> Decimal {
    book.total_liquidity()
}

/// Returns the traded notional and the average fee rate of `trades`.
fn summarize_trades(trades: &[Trade]) -> (Decimal, Option<Decimal>) {
    let notional = trades
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.total_value()));
    let fees = trades
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.fee()));
    let fee_rate = (notional > Decimal::ZERO)
        .then(|| fees.checked_div(notional))
        .flatten();
    (notional, fee_rate)
}
