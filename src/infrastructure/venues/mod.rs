//! # Venues
//!
//! Venue client port, its error type, the startup registry and an
//! in-memory simulated venue.
//!
//! - [`VenueClient`]: capability set every exchange integration provides
//! - [`VenueRegistry`]: read-only map of registered clients
//! - [`SimulatedVenueClient`]: paper-trading implementation

pub mod error;
pub mod registry;
pub mod simulated;
pub mod traits;

pub use error::{VenueError, VenueResult};
pub use registry::VenueRegistry;
pub use simulated::SimulatedVenueClient;
pub use traits::VenueClient;
