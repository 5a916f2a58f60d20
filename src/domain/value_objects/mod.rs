//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`VenueId`]: enumerated trading venue catalogue
//! - [`Symbol`]: validated asset ticker
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//! - [`ratio`] and [`round_half_up`]: fixed-scale decimal helpers
//!
//! ## Domain Enums
//!
//! - `OrderSide`: Buy or Sell
//! - `OrderStatus`: order lifecycle states
//! - `VenueRegion`: display/audit region tag
//! - `LiquidityOperationType`, `LiquidityAction`, `RiskLevel`

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod symbol;
pub mod timestamp;

pub use arithmetic::{
    ratio, round_half_up, ArithmeticError, ArithmeticResult, CheckedArithmetic,
};
pub use enums::{
    ComplianceLevel, LiquidityAction, LiquidityOperationType, OrderSide, OrderStatus,
    ParseEnumError, RiskLevel, VenueRegion,
};
pub use ids::VenueId;
pub use symbol::Symbol;
pub use timestamp::Timestamp;
