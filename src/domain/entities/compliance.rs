//! # Compliance Status
//!
//! KYC/AML and trading permissions of the account held at a venue.
//!
//! A venue whose status has `trading_enabled == false` is never eligible
//! for any operation, whatever its other metrics say.

use crate::domain::value_objects::enums::ComplianceLevel;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days between compliance reviews for a fresh standard account.
const REVIEW_INTERVAL_DAYS: i64 = 182;

/// Compliance flags reported by a venue.
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::entities::ComplianceStatus;
///
/// let status = ComplianceStatus::standard();
/// assert!(status.is_fully_enabled());
///
/// let halted = status.with_trading_enabled(false);
/// assert!(!halted.is_trading_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceStatus {
    kyc_verified: bool,
    aml_cleared: bool,
    trading_enabled: bool,
    withdrawal_enabled: bool,
    level: ComplianceLevel,
    restrictions: Option<String>,
    last_verification: Timestamp,
    next_review: Option<Timestamp>,
}

impl ComplianceStatus {
    /// Creates a fully enabled standard-level status due for review in
    /// roughly six months.
    #[must_use]
    pub fn standard() -> Self {
        let now = Timestamp::now();
        Self {
            kyc_verified: true,
            aml_cleared: true,
            trading_enabled: true,
            withdrawal_enabled: true,
            level: ComplianceLevel::Standard,
            restrictions: None,
            last_verification: now,
            next_review: Some(now.add_days(REVIEW_INTERVAL_DAYS)),
        }
    }

    /// Creates a suspended status with trading and withdrawals disabled.
    #[must_use]
    pub fn suspended(reason: impl Into<String>) -> Self {
        Self {
            trading_enabled: false,
            withdrawal_enabled: false,
            level: ComplianceLevel::Suspended,
            restrictions: Some(reason.into()),
            ..Self::standard()
        }
    }

    /// Sets the trading flag.
    #[must_use]
    pub fn with_trading_enabled(mut self, enabled: bool) -> Self {
        self.trading_enabled = enabled;
        self
    }

    /// Sets the withdrawal flag.
    #[must_use]
    pub fn with_withdrawal_enabled(mut self, enabled: bool) -> Self {
        self.withdrawal_enabled = enabled;
        self
    }

    /// Sets the KYC and AML flags.
    #[must_use]
    pub fn with_verification(mut self, kyc_verified: bool, aml_cleared: bool) -> Self {
        self.kyc_verified = kyc_verified;
        self.aml_cleared = aml_cleared;
        self
    }

    /// Sets the compliance level.
    #[must_use]
    pub fn with_level(mut self, level: ComplianceLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets a free-text restriction.
    #[must_use]
    pub fn with_restrictions(mut self, restrictions: impl Into<String>) -> Self {
        self.restrictions = Some(restrictions.into());
        self
    }

    /// Sets the next review date.
    #[must_use]
    pub fn with_next_review(mut self, next_review: Option<Timestamp>) -> Self {
        self.next_review = next_review;
        self
    }

    /// Returns true if KYC is verified.
    #[inline]
    #[must_use]
    pub fn is_kyc_verified(&self) -> bool {
        self.kyc_verified
    }

    /// Returns true if AML screening is cleared.
    #[inline]
    #[must_use]
    pub fn is_aml_cleared(&self) -> bool {
        self.aml_cleared
    }

    /// Returns true if trading is permitted.
    #[inline]
    #[must_use]
    pub fn is_trading_enabled(&self) -> bool {
        self.trading_enabled
    }

    /// Returns true if withdrawals are permitted.
    #[inline]
    #[must_use]
    pub fn is_withdrawal_enabled(&self) -> bool {
        self.withdrawal_enabled
    }

    /// Returns the compliance level.
    #[inline]
    #[must_use]
    pub fn level(&self) -> ComplianceLevel {
        self.level
    }

    /// Returns the restriction text, if any.
    #[inline]
    #[must_use]
    pub fn restrictions(&self) -> Option<&str> {
        self.restrictions.as_deref()
    }

    /// Returns when the account was last verified.
    #[inline]
    #[must_use]
    pub fn last_verification(&self) -> Timestamp {
        self.last_verification
    }

    /// Returns the next review date, if scheduled.
    #[inline]
    #[must_use]
    pub fn next_review(&self) -> Option<Timestamp> {
        self.next_review
    }

    /// Returns true when every permission flag is set.
    #[must_use]
    pub fn is_fully_enabled(&self) -> bool {
        self.kyc_verified && self.aml_cleared && self.trading_enabled && self.withdrawal_enabled
    }

    /// Returns true if a non-blank restriction is recorded.
    #[must_use]
    pub fn has_restrictions(&self) -> bool {
        self.restrictions
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }

    /// Returns true once the scheduled review date has passed.
    #[must_use]
    pub fn is_review_required(&self) -> bool {
        self.next_review.is_some_and(|review| review.is_expired())
    }
}

impl Default for ComplianceStatus {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Compliance(level={} trading={} withdrawal={})",
            self.level, self.trading_enabled, self.withdrawal_enabled
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_is_fully_enabled_and_not_due() {
        let status = ComplianceStatus::standard();
        assert!(status.is_fully_enabled());
        assert_eq!(status.level(), ComplianceLevel::Standard);
        assert!(!status.has_restrictions());
        assert!(!status.is_review_required());
    }

    #[test]
    fn suspended_blocks_trading() {
        let status = ComplianceStatus::suspended("regulator hold");
        assert!(!status.is_trading_enabled());
        assert!(!status.is_fully_enabled());
        assert!(status.level().is_restricted());
        assert_eq!(status.restrictions(), Some("regulator hold"));
    }

    #[test]
    fn blank_restriction_is_not_a_restriction() {
        let status = ComplianceStatus::standard().with_restrictions("   ");
        assert!(!status.has_restrictions());
    }

    #[test]
    fn past_review_date_requires_review() {
        let status = ComplianceStatus::standard()
            .with_next_review(Some(Timestamp::now().sub_secs(60)));
        assert!(status.is_review_required());
        let unscheduled = ComplianceStatus::standard().with_next_review(None);
        assert!(!unscheduled.is_review_required());
    }

    #[test]
    fn missing_kyc_is_not_fully_enabled() {
        let status = ComplianceStatus::standard().with_verification(false, true);
        assert!(status.is_trading_enabled());
        assert!(!status.is_fully_enabled());
    }
}
