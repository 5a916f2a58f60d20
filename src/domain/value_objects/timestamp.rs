//! # Timestamp
//!
//! UTC instant stamped on metrics, orders, trades and risk records.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let yesterday = now.sub_secs(24 * 60 * 60);
//!
//! assert!(yesterday.is_before(&now));
//! assert!(yesterday.is_expired());
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp, serialised as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix milliseconds, or `None` when out of
    /// range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns this instant moved `secs` seconds into the past.
    ///
    /// Saturates at the earliest representable instant.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(
            self.0
                .checked_sub_signed(Duration::seconds(secs))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }

    /// Returns this instant moved `days` days into the future.
    ///
    /// Saturates at the latest representable instant.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(
            self.0
                .checked_add_signed(Duration::days(days))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Returns true if this instant lies in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0 < Utc::now()
    }

    /// Returns true if this instant is strictly before `other`.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
