//! # Infrastructure Layer
//!
//! Adapters to the outside world. The only external collaborator of the
//! coordinator is the trading venue, reached through [`venues::VenueClient`].

pub mod venues;
