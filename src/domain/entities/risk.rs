//! # Risk Records
//!
//! Inputs and outputs of the risk manager.

use crate::domain::value_objects::{RiskLevel, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A volatility reading for one symbol.
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::VolatilityEvent;
/// use venue_liquidity::domain::value_objects::Symbol;
/// use rust_decimal::Decimal;
///
/// let event = VolatilityEvent::new(
///     Symbol::new("SFRT").unwrap(),
///     Decimal::new(55, 2),
///     Decimal::new(150, 0),
/// );
/// assert_eq!(event.volatility(), Decimal::new(55, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatilityEvent {
    symbol: Symbol,
    volatility: Decimal,
    current_price: Decimal,
    timestamp: Timestamp,
}

impl VolatilityEvent {
    /// Creates a reading taken now.
    #[must_use]
    pub fn new(symbol: Symbol, volatility: Decimal, current_price: Decimal) -> Self {
        Self {
            symbol,
            volatility,
            current_price,
            timestamp: Timestamp::now(),
        }
    }

    /// Returns the symbol.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the observed volatility as a fraction.
    #[inline]
    #[must_use]
    pub fn volatility(&self) -> Decimal {
        self.volatility
    }

    /// Returns the price at the time of the reading.
    #[inline]
    #[must_use]
    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    /// Returns when the reading was taken.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl fmt::Display for VolatilityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Volatility({} {} @ {})",
            self.symbol, self.volatility, self.current_price
        )
    }
}

/// Risk picture built when a protocol escalates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    symbol: Symbol,
    level: RiskLevel,
    price_volatility: Decimal,
    market_risk: Decimal,
    liquidity_risk: Decimal,
    assessed_at: Timestamp,
}

impl RiskAssessment {
    /// Creates an assessment taken now.
    #[must_use]
    pub fn new(
        symbol: Symbol,
        level: RiskLevel,
        price_volatility: Decimal,
        market_risk: Decimal,
        liquidity_risk: Decimal,
    ) -> Self {
        Self {
            symbol,
            level,
            price_volatility,
            market_risk,
            liquidity_risk,
            assessed_at: Timestamp::now(),
        }
    }

    /// Returns the symbol.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the escalation level.
    #[inline]
    #[must_use]
    pub fn level(&self) -> RiskLevel {
        self.level
    }

    /// Returns the observed price volatility.
    #[inline]
    #[must_use]
    pub fn price_volatility(&self) -> Decimal {
        self.price_volatility
    }

    /// Returns the market risk estimate.
    #[inline]
    #[must_use]
    pub fn market_risk(&self) -> Decimal {
        self.market_risk
    }

    /// Returns the liquidity risk estimate.
    #[inline]
    #[must_use]
    pub fn liquidity_risk(&self) -> Decimal {
        self.liquidity_risk
    }

    /// Returns when the assessment was made.
    #[inline]
    #[must_use]
    pub fn assessed_at(&self) -> Timestamp {
        self.assessed_at
    }

    /// Returns the largest of the three risk components.
    #[must_use]
    pub fn overall_risk(&self) -> Decimal {
        self.price_volatility
            .max(self.market_risk)
            .max(self.liquidity_risk)
    }
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Risk({} {} volatility={} market={} liquidity={})",
            self.symbol, self.level, self.price_volatility, self.market_risk, self.liquidity_risk
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn overall_risk_is_max_component() {
        let assessment = RiskAssessment::new(
            Symbol::new("SFRT").unwrap(),
            RiskLevel::Emergency,
            dec!(0.55),
            dec!(0.3),
            dec!(0.2),
        );
        assert_eq!(assessment.overall_risk(), dec!(0.55));

        let calm = RiskAssessment::new(
            Symbol::new("SFRT").unwrap(),
            RiskLevel::Normal,
            dec!(0.01),
            dec!(0.3),
            dec!(0.2),
        );
        assert_eq!(calm.overall_risk(), dec!(0.3));
    }

    #[test]
    fn display_includes_level() {
        let event = VolatilityEvent::new(Symbol::new("SFRT").unwrap(), dec!(0.25), dec!(150));
        assert!(event.to_string().contains("0.25"));
        let assessment = RiskAssessment::new(
            Symbol::new("SFRT").unwrap(),
            RiskLevel::HighAlert,
            dec!(0.25),
            dec!(0.3),
            dec!(0.2),
        );
        assert!(assessment.to_string().contains("HIGH_ALERT"));
    }
}
