//! # Domain Errors
//!
//! Validation failures raised while constructing domain records.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::domain::errors::DomainError;
//!
//! let err = DomainError::invalid_amount("amount must be positive");
//! assert_eq!(err.to_string(), "invalid amount: amount must be positive");
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticError;
use crate::domain::value_objects::VenueId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Amount is zero, negative or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Price is zero, negative or otherwise unusable.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Symbol failed validation.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Minimum order size exceeds the maximum.
    #[error("invalid trading limits: min {min} exceeds max {max}")]
    InvalidLimits {
        /// Minimum order amount.
        min: Decimal,
        /// Maximum order amount.
        max: Decimal,
    },

    /// Buy and sell legs point at the same venue.
    #[error("arbitrage legs must use different venues, both were {0}")]
    SameVenue(VenueId),

    /// Checked arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount(message.into())
    }

    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(message: impl Into<String>) -> Self {
        Self::InvalidPrice(message.into())
    }

    /// Creates an invalid symbol error.
    #[must_use]
    pub fn invalid_symbol(message: impl Into<String>) -> Self {
        Self::InvalidSymbol(message.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
