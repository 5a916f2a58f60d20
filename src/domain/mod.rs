//! # Domain Layer
//!
//! Value objects and immutable records shared by every component.
//!
//! Nothing in this layer performs I/O. Records are constructed fresh for
//! every aggregation pass or execution attempt and never mutated afterwards.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
