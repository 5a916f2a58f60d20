//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Component-local faults (one venue timing out, one order rejected) are
//! absorbed into unavailable metrics or failed results and never surface
//! here. `ApplicationError` covers what is left: invalid configuration,
//! broken arithmetic and operations that cannot be planned at all.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)         - Record validation failures
//! ├── Arithmetic(ArithmeticError) - Checked decimal failures
//! ├── Venue(VenueError)           - Venue faults that reached a caller
//! ├── Configuration(String)       - Invalid or missing configuration
//! ├── NoSuitableVenue(String)     - No venue passed selection
//! ├── ProgramInFlight             - A staged program is already running
//! └── ...
//! ```
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::application::error::ApplicationError;
//!
//! let err = ApplicationError::configuration("venue registry is empty");
//! assert!(err.is_configuration());
//! assert!(!err.is_retryable());
//! ```

use crate::domain::errors::DomainError;
use crate::domain::value_objects::ArithmeticError;
use crate::infrastructure::venues::error::VenueError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain validation error.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Checked arithmetic error.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// Venue error.
    #[error("venue error: {0}")]
    Venue(#[from] VenueError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No registered venue can take the operation.
    #[error("no suitable venue: {0}")]
    NoSuitableVenue(String),

    /// A staged program is already executing.
    #[error("staged program already in flight")]
    ProgramInFlight,

    /// Automatic trading is paused.
    #[error("automatic trading is paused")]
    TradingPaused,

    /// Operation timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a no suitable venue error.
    #[must_use]
    pub fn no_suitable_venue(message: impl Into<String>) -> Self {
        Self::NoSuitableVenue(message.into())
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the error is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Venue(e) => e.is_retryable(),
            Self::Timeout(_) | Self::NoSuitableVenue(_) | Self::ProgramInFlight => true,
            _ => false,
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::VenueId;

    #[test]
    fn venue_errors_convert_and_keep_retryability() {
        let err: ApplicationError = VenueError::timeout("slow").into();
        assert!(err.is_retryable());

        let err: ApplicationError = VenueError::authentication("bad key").into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn domain_and_arithmetic_errors_convert() {
        let err: ApplicationError = DomainError::SameVenue(VenueId::Okx).into();
        assert!(matches!(err, ApplicationError::Domain(_)));

        let err: ApplicationError = ArithmeticError::DivisionByZero.into();
        assert!(err.to_string().starts_with("arithmetic error"));
    }

    #[test]
    fn configuration_is_fatal() {
        let err = ApplicationError::configuration("empty registry");
        assert!(err.is_configuration());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "configuration error: empty registry");
    }
}
