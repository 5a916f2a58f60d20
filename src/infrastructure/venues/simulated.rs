//! # Simulated Venue
//!
//! In-memory paper-trading venue.
//!
//! [`SimulatedVenueClient`] keeps a settable last price, synthesizes an
//! order book around it, fills marketable orders immediately against its
//! own balances and rests the rest. Availability, compliance, latency and
//! faults can be switched at runtime, which makes it the venue of choice
//! for tests and for running the coordinator without exchange credentials.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::domain::value_objects::{OrderSide, Symbol, VenueId};
//! use venue_liquidity::infrastructure::venues::simulated::SimulatedVenueClient;
//! use venue_liquidity::infrastructure::venues::traits::VenueClient;
//! use rust_decimal::Decimal;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! # rt.block_on(async {
//! let sfrt = Symbol::new("SFRT").unwrap();
//! let jpy = Symbol::new("JPY").unwrap();
//! let venue = SimulatedVenueClient::new(VenueId::Mock, sfrt.clone(), jpy.clone())
//!     .with_price(Decimal::new(150, 0))
//!     .with_balance(sfrt.clone(), Decimal::new(1000, 0));
//!
//! let result = venue
//!     .place_market_order(&sfrt, Decimal::new(100, 0), OrderSide::Sell)
//!     .await
//!     .unwrap();
//! assert!(result.is_fully_executed());
//! # });
//! ```

use crate::domain::entities::{
    Balance, ComplianceStatus, OrderBook, OrderBookEntry, OrderResult, Trade, TradingLimits,
};
use crate::domain::value_objects::arithmetic::{round_half_up, CheckedArithmetic, PRICE_SCALE};
use crate::domain::value_objects::{
    ArithmeticError, OrderSide, OrderStatus, Symbol, Timestamp, VenueId,
};
use crate::infrastructure::venues::error::{VenueError, VenueResult};
use crate::infrastructure::venues::traits::VenueClient;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Default taker fee.
const DEFAULT_FEE_RATE: Decimal = dec!(0.001);
/// Relative distance between synthesized book levels.
const DEFAULT_BOOK_STEP: Decimal = dec!(0.001);
/// Quantity shown at each synthesized book level.
const DEFAULT_LEVEL_AMOUNT: Decimal = dec!(10000);

#[derive(Debug, Clone, Copy, Default)]
struct BalanceSlot {
    available: Decimal,
    locked: Decimal,
}

#[derive(Debug, Clone)]
struct SimulatedOrder {
    symbol: Symbol,
    side: OrderSide,
    amount: Decimal,
    price: Decimal,
    status: OrderStatus,
}

/// Paper-trading [`VenueClient`].
#[derive(Debug)]
pub struct SimulatedVenueClient {
    venue_id: VenueId,
    base: Symbol,
    quote: Symbol,
    fee_rate: Decimal,
    book_step: Decimal,
    level_amount: Decimal,
    price: RwLock<Option<Decimal>>,
    available: AtomicBool,
    compliance: RwLock<ComplianceStatus>,
    limits: RwLock<TradingLimits>,
    latency: RwLock<Duration>,
    fault: RwLock<Option<VenueError>>,
    order_rejection: RwLock<Option<String>>,
    accept_limit: AtomicUsize,
    orders_received: AtomicUsize,
    sequence: AtomicU64,
    balances: DashMap<Symbol, BalanceSlot>,
    orders: DashMap<String, SimulatedOrder>,
    trades: RwLock<Vec<Trade>>,
}

impl SimulatedVenueClient {
    /// Creates an available venue trading `base` against `quote`, with no
    /// price and empty balances.
    #[must_use]
    pub fn new(venue_id: VenueId, base: Symbol, quote: Symbol) -> Self {
        Self {
            venue_id,
            base,
            quote,
            fee_rate: DEFAULT_FEE_RATE,
            book_step: DEFAULT_BOOK_STEP,
            level_amount: DEFAULT_LEVEL_AMOUNT,
            price: RwLock::new(None),
            available: AtomicBool::new(true),
            compliance: RwLock::new(ComplianceStatus::standard()),
            limits: RwLock::new(TradingLimits::default()),
            latency: RwLock::new(Duration::ZERO),
            fault: RwLock::new(None),
            order_rejection: RwLock::new(None),
            accept_limit: AtomicUsize::new(usize::MAX),
            orders_received: AtomicUsize::new(0),
            sequence: AtomicU64::new(0),
            balances: DashMap::new(),
            orders: DashMap::new(),
            trades: RwLock::new(Vec::new()),
        }
    }

    /// Sets the initial last price.
    #[must_use]
    pub fn with_price(self, price: Decimal) -> Self {
        self.set_price(Some(price));
        self
    }

    /// Credits an initial available balance.
    #[must_use]
    pub fn with_balance(self, symbol: Symbol, amount: Decimal) -> Self {
        self.credit(&symbol, amount);
        self
    }

    /// Sets the taker fee rate.
    #[must_use]
    pub fn with_fee_rate(mut self, fee_rate: Decimal) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// Sets the quantity shown at each synthesized book level.
    #[must_use]
    pub fn with_level_amount(mut self, level_amount: Decimal) -> Self {
        self.level_amount = level_amount;
        self
    }

    /// Sets the account's trading limits.
    #[must_use]
    pub fn with_trading_limits(self, limits: TradingLimits) -> Self {
        *self.limits.write() = limits;
        self
    }

    /// Sets the simulated round-trip latency.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.set_latency(latency);
        self
    }

    /// Returns the base asset.
    #[must_use]
    pub fn base(&self) -> &Symbol {
        &self.base
    }

    /// Returns the quote currency.
    #[must_use]
    pub fn quote(&self) -> &Symbol {
        &self.quote
    }

    /// Replaces the last price; `None` makes the venue priceless.
    pub fn set_price(&self, price: Option<Decimal>) {
        *self.price.write() = price;
    }

    /// Switches availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Replaces the compliance standing.
    pub fn set_compliance(&self, compliance: ComplianceStatus) {
        *self.compliance.write() = compliance;
    }

    /// Replaces the simulated latency.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = latency;
    }

    /// Makes every call fail with `fault` until cleared with `None`.
    pub fn fail_with(&self, fault: Option<VenueError>) {
        *self.fault.write() = fault;
    }

    /// Rejects every order with `message` until cleared with `None`.
    pub fn reject_orders(&self, message: Option<String>) {
        *self.order_rejection.write() = message;
    }

    /// Accepts the next `count` orders and rejects every later one.
    pub fn reject_orders_after(&self, count: usize) {
        let received = self.orders_received.load(Ordering::SeqCst);
        self.accept_limit
            .store(received.saturating_add(count), Ordering::SeqCst);
    }

    /// Returns how many orders have been submitted, accepted or not.
    #[must_use]
    pub fn orders_received(&self) -> usize {
        self.orders_received.load(Ordering::SeqCst)
    }

    /// Returns the executed trades so far.
    #[must_use]
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.read().clone()
    }

    async fn simulate_round_trip(&self) -> VenueResult<()> {
        let latency = *self.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if let Some(fault) = self.fault.read().clone() {
            return Err(fault);
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(VenueError::unavailable(
                self.venue_id,
                "venue is offline",
            ));
        }
        Ok(())
    }

    fn next_order_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{seq:06}", self.venue_id.api_prefix())
    }

    fn admission_error(&self, symbol: &Symbol, amount: Decimal) -> Option<String> {
        let received = self.orders_received.fetch_add(1, Ordering::SeqCst);
        if *symbol != self.base {
            return Some(format!("unsupported symbol {symbol}"));
        }
        if !self.compliance.read().is_trading_enabled() {
            return Some("trading is disabled for this account".to_string());
        }
        if !self.limits.read().is_order_amount_valid(amount) {
            return Some(format!("order amount {amount} outside trading limits"));
        }
        if let Some(message) = self.order_rejection.read().clone() {
            return Some(message);
        }
        if received >= self.accept_limit.load(Ordering::SeqCst) {
            return Some("order rejected by venue".to_string());
        }
        None
    }

    fn debit(&self, symbol: &Symbol, amount: Decimal) -> bool {
        match self.balances.get_mut(symbol) {
            Some(mut slot) if slot.available >= amount => {
                slot.available = slot.available.saturating_sub(amount);
                true
            }
            _ => false,
        }
    }

    fn credit(&self, symbol: &Symbol, amount: Decimal) {
        let mut slot = self.balances.entry(symbol.clone()).or_default();
        slot.available = slot.available.saturating_add(amount);
    }

    fn lock(&self, symbol: &Symbol, amount: Decimal) -> bool {
        match self.balances.get_mut(symbol) {
            Some(mut slot) if slot.available >= amount => {
                slot.available = slot.available.saturating_sub(amount);
                slot.locked = slot.locked.saturating_add(amount);
                true
            }
            _ => false,
        }
    }

    fn unlock(&self, symbol: &Symbol, amount: Decimal) {
        if let Some(mut slot) = self.balances.get_mut(symbol) {
            let released = amount.min(slot.locked);
            slot.locked = slot.locked.saturating_sub(released);
            slot.available = slot.available.saturating_add(released);
        }
    }

    fn fill(
        &self,
        symbol: &Symbol,
        amount: Decimal,
        price: Decimal,
        side: OrderSide,
    ) -> VenueResult<OrderResult> {
        let notional = amount.safe_mul(price).map_err(arithmetic_fault)?;
        let fee = round_half_up(
            notional.safe_mul(self.fee_rate).map_err(arithmetic_fault)?,
            PRICE_SCALE,
        );

        let settled = match side {
            OrderSide::Buy => {
                let cost = notional.safe_add(fee).map_err(arithmetic_fault)?;
                let paid = self.debit(&self.quote, cost);
                if paid {
                    self.credit(&self.base, amount);
                }
                paid
            }
            OrderSide::Sell => {
                let delivered = self.debit(&self.base, amount);
                if delivered {
                    self.credit(&self.quote, notional.saturating_sub(fee));
                }
                delivered
            }
        };
        if !settled {
            return Ok(OrderResult::rejected(
                self.venue_id,
                symbol.clone(),
                side,
                amount,
                "insufficient balance",
            ));
        }

        let order_id = self.next_order_id();
        self.orders.insert(
            order_id.clone(),
            SimulatedOrder {
                symbol: symbol.clone(),
                side,
                amount,
                price,
                status: OrderStatus::Filled,
            },
        );
        self.trades.write().push(Trade::new(
            order_id.clone(),
            self.venue_id,
            symbol.clone(),
            side,
            amount,
            price,
            fee,
            Timestamp::now(),
        ));
        debug!(venue = %self.venue_id, %order_id, %side, %amount, %price, "simulated fill");

        Ok(OrderResult::filled(
            self.venue_id,
            order_id,
            symbol.clone(),
            side,
            amount,
            price,
        ))
    }

    fn rest(
        &self,
        symbol: &Symbol,
        amount: Decimal,
        price: Decimal,
        side: OrderSide,
    ) -> VenueResult<OrderResult> {
        let (asset, reserved) = match side {
            OrderSide::Buy => (
                &self.quote,
                amount.safe_mul(price).map_err(arithmetic_fault)?,
            ),
            OrderSide::Sell => (&self.base, amount),
        };
        if !self.lock(asset, reserved) {
            return Ok(OrderResult::rejected(
                self.venue_id,
                symbol.clone(),
                side,
                amount,
                "insufficient balance",
            ));
        }

        let order_id = self.next_order_id();
        self.orders.insert(
            order_id.clone(),
            SimulatedOrder {
                symbol: symbol.clone(),
                side,
                amount,
                price,
                status: OrderStatus::Submitted,
            },
        );
        Ok(OrderResult::submitted(
            self.venue_id,
            order_id,
            symbol.clone(),
            side,
            amount,
            Some(price),
        ))
    }
}

#[async_trait]
impl VenueClient for SimulatedVenueClient {
    fn venue_id(&self) -> VenueId {
        self.venue_id
    }

    async fn is_available(&self) -> bool {
        self.simulate_round_trip().await.is_ok()
    }

    async fn current_price(
        &self,
        symbol: &Symbol,
        quote_currency: &Symbol,
    ) -> VenueResult<Option<Decimal>> {
        self.simulate_round_trip().await?;
        if *symbol != self.base || *quote_currency != self.quote {
            return Ok(None);
        }
        Ok(*self.price.read())
    }

    async fn place_market_order(
        &self,
        symbol: &Symbol,
        amount: Decimal,
        side: OrderSide,
    ) -> VenueResult<OrderResult> {
        self.simulate_round_trip().await?;
        if let Some(reason) = self.admission_error(symbol, amount) {
            return Ok(OrderResult::rejected(
                self.venue_id,
                symbol.clone(),
                side,
                amount,
                reason,
            ));
        }
        let Some(price) = *self.price.read() else {
            return Ok(OrderResult::rejected(
                self.venue_id,
                symbol.clone(),
                side,
                amount,
                "no market price",
            ));
        };
        self.fill(symbol, amount, price, side)
    }

    async fn place_limit_order(
        &self,
        symbol: &Symbol,
        amount: Decimal,
        price: Decimal,
        side: OrderSide,
    ) -> VenueResult<OrderResult> {
        self.simulate_round_trip().await?;
        if price <= Decimal::ZERO {
            return Err(VenueError::invalid_request("limit price must be positive"));
        }
        if let Some(reason) = self.admission_error(symbol, amount) {
            return Ok(OrderResult::rejected(
                self.venue_id,
                symbol.clone(),
                side,
                amount,
                reason,
            ));
        }

        let market = *self.price.read();
        match market {
            Some(last) if side.is_buy() && price >= last => self.fill(symbol, amount, last, side),
            Some(last) if side.is_sell() && price <= last => self.fill(symbol, amount, last, side),
            _ => self.rest(symbol, amount, price, side),
        }
    }

    async fn balance(&self, symbol: &Symbol) -> VenueResult<Balance> {
        self.simulate_round_trip().await?;
        let slot = self
            .balances
            .get(symbol)
            .map(|slot| *slot)
            .unwrap_or_default();
        Ok(Balance::new(
            self.venue_id,
            symbol.clone(),
            slot.available,
            slot.locked,
        ))
    }

    async fn trade_history(&self, symbol: &Symbol, since: Timestamp) -> VenueResult<Vec<Trade>> {
        self.simulate_round_trip().await?;
        Ok(self
            .trades
            .read()
            .iter()
            .filter(|trade| trade.symbol() == symbol && !trade.executed_at().is_before(&since))
            .cloned()
            .collect())
    }

    async fn order_book(&self, symbol: &Symbol, depth: usize) -> VenueResult<OrderBook> {
        self.simulate_round_trip().await?;
        let price = *self.price.read();
        let Some(price) = price.filter(|_| *symbol == self.base) else {
            return Ok(OrderBook::empty(self.venue_id, symbol.clone()));
        };

        let mut bids = Vec::with_capacity(depth);
        let mut asks = Vec::with_capacity(depth);
        for level in 1..=depth {
            let offset = price
                .safe_mul(self.book_step)
                .and_then(|step| step.safe_mul(Decimal::from(level)))
                .map_err(arithmetic_fault)?;
            let bid = round_half_up(price.saturating_sub(offset), PRICE_SCALE);
            if bid > Decimal::ZERO {
                bids.push(OrderBookEntry::new(bid, self.level_amount));
            }
            let ask = round_half_up(price.safe_add(offset).map_err(arithmetic_fault)?, PRICE_SCALE);
            asks.push(OrderBookEntry::new(ask, self.level_amount));
        }
        Ok(OrderBook::new(self.venue_id, symbol.clone(), bids, asks))
    }

    async fn trading_limits(&self) -> VenueResult<TradingLimits> {
        self.simulate_round_trip().await?;
        Ok(self.limits.read().clone())
    }

    async fn compliance_status(&self) -> VenueResult<ComplianceStatus> {
        self.simulate_round_trip().await?;
        Ok(self.compliance.read().clone())
    }

    async fn cancel_order(&self, order_id: &str) -> VenueResult<bool> {
        self.simulate_round_trip().await?;
        let released = match self.orders.get_mut(order_id) {
            Some(mut order) if order.status.is_active() => {
                order.status = OrderStatus::Cancelled;
                Some(order.clone())
            }
            Some(_) => None,
            None => return Err(VenueError::order_not_found(order_id)),
        };
        let Some(order) = released else {
            return Ok(false);
        };
        match order.side {
            OrderSide::Buy => {
                let reserved = order.amount.safe_mul(order.price).map_err(arithmetic_fault)?;
                self.unlock(&self.quote, reserved);
            }
            OrderSide::Sell => self.unlock(&order.symbol, order.amount),
        }
        Ok(true)
    }

    async fn order_status(&self, order_id: &str) -> VenueResult<OrderStatus> {
        self.simulate_round_trip().await?;
        self.orders
            .get(order_id)
            .map(|order| order.status)
            .ok_or_else(|| VenueError::order_not_found(order_id))
    }
}

fn arithmetic_fault(error: ArithmeticError) -> VenueError {
    VenueError::internal(error.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sfrt() -> Symbol {
        Symbol::new("SFRT").unwrap()
    }

    fn jpy() -> Symbol {
        Symbol::new("JPY").unwrap()
    }

    fn funded_venue() -> SimulatedVenueClient {
        SimulatedVenueClient::new(VenueId::Mock, sfrt(), jpy())
            .with_price(dec!(150))
            .with_balance(sfrt(), dec!(10000))
            .with_balance(jpy(), dec!(10000000))
    }

    mod pricing {
        use super::*;

        #[tokio::test]
        async fn reports_price_for_its_pair_only() {
            let venue = funded_venue();
            assert_eq!(
                venue.current_price(&sfrt(), &jpy()).await.unwrap(),
                Some(dec!(150))
            );
            let usd = Symbol::new("USD").unwrap();
            assert_eq!(venue.current_price(&sfrt(), &usd).await.unwrap(), None);
        }

        #[tokio::test]
        async fn priceless_venue_answers_none() {
            let venue = SimulatedVenueClient::new(VenueId::Bybit, sfrt(), jpy());
            assert_eq!(venue.current_price(&sfrt(), &jpy()).await.unwrap(), None);
        }

        #[tokio::test]
        async fn injected_fault_is_returned_and_marks_unavailable() {
            let venue = funded_venue();
            venue.fail_with(Some(VenueError::timeout("boom")));
            assert!(!venue.is_available().await);
            assert!(matches!(
                venue.current_price(&sfrt(), &jpy()).await,
                Err(VenueError::Timeout { .. })
            ));
            venue.fail_with(None);
            assert!(venue.is_available().await);
        }

        #[tokio::test]
        async fn order_book_is_synthesized_around_price() {
            let venue = funded_venue();
            let book = venue.order_book(&sfrt(), 3).await.unwrap();
            assert_eq!(book.bids().len(), 3);
            assert_eq!(book.asks().len(), 3);
            assert_eq!(book.best_bid(), Some(dec!(149.85)));
            assert_eq!(book.best_ask(), Some(dec!(150.15)));
            assert!(book.total_liquidity() > Decimal::ZERO);
        }
    }

    mod orders {
        use super::*;

        #[tokio::test]
        async fn market_sell_moves_balances_and_records_trade() {
            let venue = funded_venue();
            let result = venue
                .place_market_order(&sfrt(), dec!(1000), OrderSide::Sell)
                .await
                .unwrap();
            assert!(result.is_fully_executed());
            assert_eq!(result.executed_price(), Some(dec!(150)));

            let base = venue.balance(&sfrt()).await.unwrap();
            assert_eq!(base.available(), dec!(9000));
            let quote = venue.balance(&jpy()).await.unwrap();
            assert_eq!(quote.available(), dec!(10149850));

            let history = venue
                .trade_history(&sfrt(), Timestamp::now().sub_secs(60))
                .await
                .unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history.first().unwrap().fee(), dec!(150));
        }

        #[tokio::test]
        async fn insufficient_balance_is_rejected() {
            let venue = funded_venue();
            let result = venue
                .place_market_order(&sfrt(), dec!(20000), OrderSide::Sell)
                .await
                .unwrap();
            assert!(!result.is_success());
            assert_eq!(result.status(), OrderStatus::Rejected);
        }

        #[tokio::test]
        async fn amount_outside_limits_is_rejected() {
            let venue = funded_venue();
            let result = venue
                .place_market_order(&sfrt(), dec!(10), OrderSide::Buy)
                .await
                .unwrap();
            assert_eq!(result.status(), OrderStatus::Rejected);
        }

        #[tokio::test]
        async fn suspended_account_cannot_trade() {
            let venue = funded_venue();
            venue.set_compliance(ComplianceStatus::suspended("review"));
            let result = venue
                .place_market_order(&sfrt(), dec!(100), OrderSide::Buy)
                .await
                .unwrap();
            assert!(!result.is_success());
        }

        #[tokio::test]
        async fn reject_orders_after_budget() {
            let venue = funded_venue();
            venue.reject_orders_after(2);
            for _ in 0..2 {
                let ok = venue
                    .place_market_order(&sfrt(), dec!(100), OrderSide::Sell)
                    .await
                    .unwrap();
                assert!(ok.is_success());
            }
            let third = venue
                .place_market_order(&sfrt(), dec!(100), OrderSide::Sell)
                .await
                .unwrap();
            assert!(!third.is_success());
            assert_eq!(venue.orders_received(), 3);
        }

        #[tokio::test]
        async fn resting_limit_order_can_be_cancelled() {
            let venue = funded_venue();
            let result = venue
                .place_limit_order(&sfrt(), dec!(500), dec!(160), OrderSide::Sell)
                .await
                .unwrap();
            assert_eq!(result.status(), OrderStatus::Submitted);
            let order_id = result.order_id().unwrap().to_string();

            let locked = venue.balance(&sfrt()).await.unwrap();
            assert_eq!(locked.locked(), dec!(500));

            assert_eq!(
                venue.order_status(&order_id).await.unwrap(),
                OrderStatus::Submitted
            );
            assert!(venue.cancel_order(&order_id).await.unwrap());
            assert!(!venue.cancel_order(&order_id).await.unwrap());
            assert_eq!(
                venue.order_status(&order_id).await.unwrap(),
                OrderStatus::Cancelled
            );

            let released = venue.balance(&sfrt()).await.unwrap();
            assert_eq!(released.available(), dec!(10000));
            assert_eq!(released.locked(), Decimal::ZERO);
        }

        #[tokio::test]
        async fn marketable_limit_buy_fills_at_last_price() {
            let venue = funded_venue();
            let result = venue
                .place_limit_order(&sfrt(), dec!(100), dec!(155), OrderSide::Buy)
                .await
                .unwrap();
            assert_eq!(result.status(), OrderStatus::Filled);
            assert_eq!(result.executed_price(), Some(dec!(150)));
        }

        #[tokio::test]
        async fn unknown_order_status_is_an_error() {
            let venue = funded_venue();
            assert!(matches!(
                venue.order_status("missing").await,
                Err(VenueError::OrderNotFound { .. })
            ));
        }
    }
}
