//! # Venue Liquidity
//!
//! Coordinates trading of a single asset across several independent,
//! partially reliable trading venues.
//!
//! The crate keeps the asset's market price near a target, detects and
//! executes cross-venue arbitrage, and reacts to abnormal volatility by
//! escalating risk controls up to a process-wide trading pause.
//!
//! # Architecture
//!
//! ```text
//! domain/           value objects and immutable records
//! application/      aggregation, selection, arbitrage, execution,
//!                   liquidity control, risk management, scheduling
//! infrastructure/   venue client port, registry, simulated venue
//! config            layered configuration
//! telemetry         tracing subscriber setup
//! ```
//!
//! # Examples
//!
//! ```
//! use venue_liquidity::domain::value_objects::{VenueId, VenueRegion};
//!
//! assert_eq!(VenueId::Bitflyer.region(), VenueRegion::Domestic);
//! assert_eq!("binance".parse::<VenueId>().unwrap(), VenueId::Binance);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
