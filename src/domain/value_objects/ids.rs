//! # Venue Identifiers
//!
//! The catalogue of trading venues a client can be registered for.
//!
//! Venues are ordered by declaration, so a `BTreeMap<VenueId, _>` iterates
//! domestic venues first, then global, decentralised and test venues.

use crate::domain::value_objects::enums::{ParseEnumError, VenueRegion};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a trading venue.
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::value_objects::{VenueId, VenueRegion};
///
/// let venue = VenueId::GmoCoin;
/// assert_eq!(venue.api_prefix(), "gmocoin");
/// assert_eq!(venue.region(), VenueRegion::Domestic);
/// assert_eq!(venue.to_string(), "gmocoin");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueId {
    /// bitbank.
    Bitbank,
    /// Coincheck.
    Coincheck,
    /// bitFlyer.
    Bitflyer,
    /// GMO Coin.
    GmoCoin,
    /// Binance.
    Binance,
    /// Bybit.
    Bybit,
    /// OKX (formerly OKEx).
    Okx,
    /// Huobi.
    Huobi,
    /// Uniswap.
    Uniswap,
    /// SushiSwap.
    Sushiswap,
    /// In-process paper venue.
    Mock,
}

impl VenueId {
    /// Every venue in catalogue order.
    pub const ALL: [VenueId; 11] = [
        Self::Bitbank,
        Self::Coincheck,
        Self::Bitflyer,
        Self::GmoCoin,
        Self::Binance,
        Self::Bybit,
        Self::Okx,
        Self::Huobi,
        Self::Uniswap,
        Self::Sushiswap,
        Self::Mock,
    ];

    /// Returns the human readable venue name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Bitbank => "Bitbank",
            Self::Coincheck => "Coincheck",
            Self::Bitflyer => "bitFlyer",
            Self::GmoCoin => "GMO Coin",
            Self::Binance => "Binance",
            Self::Bybit => "Bybit",
            Self::Okx => "OKX",
            Self::Huobi => "Huobi",
            Self::Uniswap => "Uniswap",
            Self::Sushiswap => "SushiSwap",
            Self::Mock => "Mock Exchange",
        }
    }

    /// Returns the prefix used in API routes and configuration keys.
    #[must_use]
    pub const fn api_prefix(self) -> &'static str {
        match self {
            Self::Bitbank => "bitbank",
            Self::Coincheck => "coincheck",
            Self::Bitflyer => "bitflyer",
            Self::GmoCoin => "gmocoin",
            Self::Binance => "binance",
            Self::Bybit => "bybit",
            Self::Okx => "okx",
            Self::Huobi => "huobi",
            Self::Uniswap => "uniswap",
            Self::Sushiswap => "sushiswap",
            Self::Mock => "mock",
        }
    }

    /// Returns the region tag.
    #[must_use]
    pub const fn region(self) -> VenueRegion {
        match self {
            Self::Bitbank | Self::Coincheck | Self::Bitflyer | Self::GmoCoin => {
                VenueRegion::Domestic
            }
            Self::Binance | Self::Bybit | Self::Okx | Self::Huobi => VenueRegion::Global,
            Self::Uniswap | Self::Sushiswap => VenueRegion::Decentralized,
            Self::Mock => VenueRegion::Test,
        }
    }

    /// Returns true for the test venue.
    #[inline]
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Mock)
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_prefix())
    }
}

impl FromStr for VenueId {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            // legacy prefix kept for configs written before the rename
            "okex" => Ok(Self::Okx),
            "gmo_coin" | "gmo" => Ok(Self::GmoCoin),
            "mock_exchange" => Ok(Self::Mock),
            other => Self::ALL
                .into_iter()
                .find(|venue| venue.api_prefix() == other)
                .ok_or_else(|| ParseEnumError::InvalidValue("VenueId", s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn regions_match_catalogue() {
        let domestic: Vec<_> = VenueId::ALL
            .into_iter()
            .filter(|v| v.region() == VenueRegion::Domestic)
            .collect();
        assert_eq!(
            domestic,
            vec![
                VenueId::Bitbank,
                VenueId::Coincheck,
                VenueId::Bitflyer,
                VenueId::GmoCoin
            ]
        );
        assert_eq!(VenueId::Okx.region(), VenueRegion::Global);
        assert_eq!(VenueId::Sushiswap.region(), VenueRegion::Decentralized);
        assert_eq!(VenueId::Mock.region(), VenueRegion::Test);
    }

    #[test]
    fn parse_round_trips_every_prefix() {
        for venue in VenueId::ALL {
            assert_eq!(venue.api_prefix().parse::<VenueId>().unwrap(), venue);
        }
    }

    #[test]
    fn parse_accepts_legacy_names() {
        assert_eq!("OKEX".parse::<VenueId>().unwrap(), VenueId::Okx);
        assert_eq!("gmo_coin".parse::<VenueId>().unwrap(), VenueId::GmoCoin);
        assert!("kraken".parse::<VenueId>().is_err());
    }

    #[test]
    fn ordering_follows_catalogue() {
        let mut shuffled = vec![VenueId::Mock, VenueId::Binance, VenueId::Bitbank];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![VenueId::Bitbank, VenueId::Binance, VenueId::Mock]
        );
    }

    #[test]
    fn serde_snake_case() {
        let json = serde_json::to_string(&VenueId::GmoCoin).unwrap();
        assert_eq!(json, "\"gmo_coin\"");
        let back: VenueId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VenueId::GmoCoin);
    }
}
