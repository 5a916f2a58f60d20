//! # Venue Errors
//!
//! Faults raised by venue clients.
//!
//! Venue faults are expected: the aggregator turns them into unavailable
//! metrics and the execution monitor into failed results. They never reach
//! the scheduler.
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::infrastructure::venues::error::VenueError;
//!
//! let error = VenueError::timeout_after("price request", 2000);
//! assert!(error.is_retryable());
//! assert_eq!(error.to_string(), "venue timeout: price request timed out after 2000ms");
//!
//! let error = VenueError::authentication("invalid API key");
//! assert!(!error.is_retryable());
//! ```

use crate::domain::value_objects::VenueId;
use thiserror::Error;

/// Error type for venue client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    /// The venue did not answer in time.
    #[error("venue timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Elapsed budget in milliseconds, when known.
        timeout_ms: Option<u64>,
    },

    /// Transport failure.
    #[error("venue connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Credentials were refused.
    #[error("venue authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// The venue refused the request parameters.
    #[error("venue invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// The venue does not know the order id.
    #[error("venue order not found: {order_id}")]
    OrderNotFound {
        /// The unknown order id.
        order_id: String,
    },

    /// The venue is offline or in maintenance.
    #[error("venue unavailable: {venue_id} - {message}")]
    Unavailable {
        /// The venue.
        venue_id: VenueId,
        /// Error message.
        message: String,
    },

    /// Anything else, including a crashed client task.
    #[error("venue internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl VenueError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error for `operation` after `timeout_ms`.
    #[must_use]
    pub fn timeout_after(operation: &str, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: format!("{operation} timed out after {timeout_ms}ms"),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an order not found error.
    #[must_use]
    pub fn order_not_found(order_id: impl Into<String>) -> Self {
        Self::OrderNotFound {
            order_id: order_id.into(),
        }
    }

    /// Creates an unavailable error for `venue_id`.
    #[must_use]
    pub fn unavailable(venue_id: VenueId, message: impl Into<String>) -> Self {
        Self::Unavailable {
            venue_id,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the fault is transient and a later cycle may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::Unavailable { .. }
        )
    }

    /// Returns true for timeouts.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for venue operations.
pub type VenueResult<T> = Result<T, VenueError>;
