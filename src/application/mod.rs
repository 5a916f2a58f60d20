//! # Application Layer
//!
//! Use cases over the venue port: aggregation, routing, arbitrage,
//! liquidity control and risk management, plus the runtime that wires
//! them together.

pub mod error;
pub mod runtime;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use runtime::{simulated_registry, LiquidityRuntime};
