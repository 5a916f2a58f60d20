//! # Execution Monitor
//!
//! Dispatches one [`LiquidityOperation`] to one venue and reports the
//! outcome as a [`LiquidityResult`].
//!
//! Venue errors and timeouts become failed results carrying the error
//! text; nothing is propagated and nothing is retried here.

use crate::domain::entities::{LiquidityOperation, LiquidityResult, OrderResult};
use crate::domain::value_objects::LiquidityOperationType;
use crate::infrastructure::venues::error::{VenueError, VenueResult};
use crate::infrastructure::venues::traits::VenueClient;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{info, warn};

/// Submits operations with a per-order timeout.
#[derive(Debug, Clone)]
pub struct ExecutionMonitor {
    order_timeout: Duration,
}

impl Default for ExecutionMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl ExecutionMonitor {
    /// Creates a monitor that gives each order `order_timeout` to answer.
    #[must_use]
    pub fn new(order_timeout: Duration) -> Self {
        Self { order_timeout }
    }

    /// Returns the per-order timeout.
    #[must_use]
    pub fn order_timeout(&self) -> Duration {
        self.order_timeout
    }

    /// Submits `operation` to `client`.
    pub async fn execute(
        &self,
        client: &dyn VenueClient,
        operation: LiquidityOperation,
    ) -> LiquidityResult {
        let venue_id = client.venue_id();
        let started = Instant::now();
        info!(
            venue = %venue_id,
            operation = %operation.operation_type(),
            amount = %operation.amount(),
            reason = operation.reason(),
            "dispatching liquidity operation"
        );

        let outcome = match timeout(self.order_timeout, dispatch(client, &operation)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(VenueError::timeout_after(
                "order request",
                u64::try_from(self.order_timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        };
        let elapsed = started.elapsed();

        match outcome {
            Ok(order) => {
                let result = LiquidityResult::from_order(operation, order, elapsed);
                if result.is_success() {
                    info!(venue = %venue_id, executed = %result.executed_amount(), "liquidity operation accepted");
                } else {
                    warn!(venue = %venue_id, error = result.error().unwrap_or_default(), "liquidity operation refused");
                }
                result
            }
            Err(error) => {
                warn!(venue = %venue_id, %error, "liquidity operation failed");
                LiquidityResult::failure(
                    operation,
                    Some(venue_id),
                    format!("execution error: {error}"),
                    elapsed,
                )
            }
        }
    }
}

/// Routes the operation to the matching venue call.
async fn dispatch(
    client: &dyn VenueClient,
    operation: &LiquidityOperation,
) -> VenueResult<OrderResult> {
    let symbol = operation.symbol();
    let amount = operation.amount();
    let side = operation.side();
    match (operation.operation_type(), operation.limit_price()) {
        (LiquidityOperationType::MarketBuy | LiquidityOperationType::MarketSell, _) => {
            client.place_market_order(symbol, amount, side).await
        }
        (LiquidityOperationType::LimitBuy | LiquidityOperationType::LimitSell, Some(price)) => {
            client.place_limit_order(symbol, amount, price, side).await
        }
        (LiquidityOperationType::LimitBuy | LiquidityOperationType::LimitSell, None) => Err(
            VenueError::invalid_request("limit operation without a limit price"),
        ),
    }
}
