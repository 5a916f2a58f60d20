//! # Symbol Value Object
//!
//! Validated asset ticker such as `SFRT` or `JPY`.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum accepted ticker length.
const MAX_LEN: usize = 16;

/// An upper-case asset ticker.
///
/// # Invariants
///
/// - Non-empty, at most 16 characters
/// - ASCII alphanumerics only, stored upper-case
///
/// # Examples
///
/// ```
/// use venue_liquidity::domain::value_objects::Symbol;
///
/// let symbol = Symbol::new("sfrt").unwrap();
/// assert_eq!(symbol.as_str(), "SFRT");
/// assert!(Symbol::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Creates a validated symbol.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSymbol` if the input is empty, too long
    /// or contains characters other than ASCII alphanumerics.
    pub fn new(raw: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_symbol("symbol cannot be empty"));
        }
        if trimmed.len() > MAX_LEN {
            return Err(DomainError::invalid_symbol(format!(
                "symbol '{}' longer than {} characters",
                trimmed, MAX_LEN
            )));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_symbol(format!(
                "symbol '{}' contains invalid characters",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the ticker as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}
