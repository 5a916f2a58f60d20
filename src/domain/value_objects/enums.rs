//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! This module provides the core enumerations used throughout the liquidity
//! coordinator:
//!
//! - [`OrderSide`] - Buy or Sell direction
//! - [`OrderStatus`] - Lifecycle of an order submitted to a venue
//! - [`VenueRegion`] - Region tag carried by every venue (display only)
//! - [`ComplianceLevel`] - Venue account compliance tier
//! - [`LiquidityOperationType`] - Market/limit × buy/sell
//! - [`LiquidityAction`] - Outcome of a stabilisation decision
//! - [`RiskLevel`] - Escalation level of the risk manager
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display` and Serde traits; the ones that are read from configuration or
//! venue payloads also implement `FromStr`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side indicating buy or sell direction.
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::value_objects::enums::OrderSide;
///
/// let buy = OrderSide::Buy;
/// assert_eq!(buy.opposite(), OrderSide::Sell);
/// assert_eq!(buy.to_string(), "BUY");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum OrderSide {
    /// Buy order - acquiring the asset.
    Buy = 0,
    /// Sell order - disposing of the asset.
    Sell = 1,
}

impl OrderSide {
    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns true if this is a buy order.
    #[inline]
    #[must_use]
    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }

    /// Returns true if this is a sell order.
    #[inline]
    #[must_use]
    pub const fn is_sell(self) -> bool {
        matches!(self, Self::Sell)
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(ParseEnumError::InvalidValue("OrderSide", s.to_string())),
        }
    }
}

/// Status of an order submitted to a venue.
///
/// `Filled`, `Cancelled`, `Rejected`, `Failed` and `Expired` are terminal.
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::value_objects::enums::OrderStatus;
///
/// assert!(OrderStatus::Filled.is_complete());
/// assert!(OrderStatus::PartiallyFilled.is_success());
/// assert!(OrderStatus::Submitted.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Accepted locally, not yet acknowledged by the venue.
    Pending,
    /// Acknowledged by the venue and resting.
    Submitted,
    /// Some quantity executed, the remainder still working.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Cancelled before completion.
    Cancelled,
    /// Refused by the venue.
    Rejected,
    /// Submission or execution failed.
    Failed,
    /// Lapsed without execution.
    Expired,
}

impl OrderStatus {
    /// Returns true for terminal states.
    #[inline]
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Cancelled | Self::Rejected | Self::Failed | Self::Expired
        )
    }

    /// Returns true if any quantity executed.
    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Filled | Self::PartiallyFilled)
    }

    /// Returns true if the venue refused or the submission failed.
    #[inline]
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Rejected | Self::Failed)
    }

    /// Returns true while the order can still execute.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Submitted | Self::PartiallyFilled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "SUBMITTED" => Ok(Self::Submitted),
            "PARTIALLY_FILLED" => Ok(Self::PartiallyFilled),
            "FILLED" => Ok(Self::Filled),
            "CANCELLED" => Ok(Self::Cancelled),
            "REJECTED" => Ok(Self::Rejected),
            "FAILED" => Ok(Self::Failed),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(ParseEnumError::InvalidValue("OrderStatus", s.to_string())),
        }
    }
}

/// Region tag of a venue.
///
/// Used for display and audit only. Business logic never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VenueRegion {
    /// Domestic (Japanese) regulated exchange.
    Domestic,
    /// Global centralised exchange.
    Global,
    /// Decentralised exchange.
    Decentralized,
    /// Test or paper venue.
    Test,
}

impl VenueRegion {
    /// Returns the short region code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Domestic => "JP",
            Self::Global => "GLOBAL",
            Self::Decentralized => "DEX",
            Self::Test => "TEST",
        }
    }
}

impl fmt::Display for VenueRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compliance tier of the account held at a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceLevel {
    /// Basic verification.
    Basic,
    /// Standard verification.
    #[default]
    Standard,
    /// Premium tier.
    Premium,
    /// Institutional tier.
    Institutional,
    /// Operating with restrictions.
    Restricted,
    /// Account suspended.
    Suspended,
}

impl ComplianceLevel {
    /// Returns true unless the account is suspended.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Suspended)
    }

    /// Returns true for restricted or suspended accounts.
    #[inline]
    #[must_use]
    pub const fn is_restricted(self) -> bool {
        matches!(self, Self::Restricted | Self::Suspended)
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Basic => "BASIC",
            Self::Standard => "STANDARD",
            Self::Premium => "PREMIUM",
            Self::Institutional => "INSTITUTIONAL",
            Self::Restricted => "RESTRICTED",
            Self::Suspended => "SUSPENDED",
        };
        write!(f, "{}", s)
    }
}

/// Kind of order a liquidity operation submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidityOperationType {
    /// Market buy.
    MarketBuy,
    /// Market sell.
    MarketSell,
    /// Limit buy.
    LimitBuy,
    /// Limit sell.
    LimitSell,
}

impl LiquidityOperationType {
    /// Returns the order side.
    #[inline]
    #[must_use]
    pub const fn side(self) -> OrderSide {
        match self {
            Self::MarketBuy | Self::LimitBuy => OrderSide::Buy,
            Self::MarketSell | Self::LimitSell => OrderSide::Sell,
        }
    }

    /// Returns true for market orders.
    #[inline]
    #[must_use]
    pub const fn is_market(self) -> bool {
        matches!(self, Self::MarketBuy | Self::MarketSell)
    }

    /// Returns true for limit orders.
    #[inline]
    #[must_use]
    pub const fn is_limit(self) -> bool {
        !self.is_market()
    }
}

impl fmt::Display for LiquidityOperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MarketBuy => "MARKET_BUY",
            Self::MarketSell => "MARKET_SELL",
            Self::LimitBuy => "LIMIT_BUY",
            Self::LimitSell => "LIMIT_SELL",
        };
        write!(f, "{}", s)
    }
}

/// Action chosen by the liquidity controller for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidityAction {
    /// Price above target: sell into the market.
    StabilizeBySelling,
    /// Price below target: buy from the market.
    StabilizeByBuying,
    /// Too few venues quoting: seed liquidity.
    ProvideLiquidity,
    /// Within tolerance: do nothing.
    HoldReserve,
}

impl LiquidityAction {
    /// Returns true if the action runs a staged program.
    #[inline]
    #[must_use]
    pub const fn is_stabilization(self) -> bool {
        matches!(self, Self::StabilizeBySelling | Self::StabilizeByBuying)
    }
}

impl fmt::Display for LiquidityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StabilizeBySelling => "STABILIZE_BY_SELLING",
            Self::StabilizeByBuying => "STABILIZE_BY_BUYING",
            Self::ProvideLiquidity => "PROVIDE_LIQUIDITY",
            Self::HoldReserve => "HOLD_RESERVE",
        };
        write!(f, "{}", s)
    }
}

/// Escalation level of the risk manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Volatility below the high-alert threshold.
    Normal,
    /// Heightened monitoring, trading continues.
    HighAlert,
    /// Automatic trading paused.
    Emergency,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "NORMAL",
            Self::HighAlert => "HIGH_ALERT",
            Self::Emergency => "EMERGENCY",
        };
        write!(f, "{}", s)
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
