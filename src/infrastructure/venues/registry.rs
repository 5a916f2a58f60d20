//! # Venue Registry
//!
//! Read-only catalogue of venue clients, built once at startup.

use crate::domain::value_objects::VenueId;
use crate::infrastructure::venues::traits::VenueClient;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Venue clients keyed by [`VenueId`].
///
/// Iteration follows catalogue order, so everything derived from the
/// registry (metrics maps, price maps) iterates deterministically.
///
/// Registering a second client for the same venue replaces the first.
#[derive(Debug, Clone, Default)]
pub struct VenueRegistry {
    clients: BTreeMap<VenueId, Arc<dyn VenueClient>>,
}

impl VenueRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client, keyed by its own venue id.
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn VenueClient>) -> Self {
        self.clients.insert(client.venue_id(), client);
        self
    }

    /// Builds a registry from a list of clients.
    #[must_use]
    pub fn from_clients(clients: impl IntoIterator<Item = Arc<dyn VenueClient>>) -> Self {
        clients
            .into_iter()
            .fold(Self::new(), |registry, client| registry.with_client(client))
    }

    /// Returns the client for `venue_id`.
    #[must_use]
    pub fn get(&self, venue_id: VenueId) -> Option<Arc<dyn VenueClient>> {
        self.clients.get(&venue_id).cloned()
    }

    /// Returns true if a client is registered for `venue_id`.
    #[must_use]
    pub fn contains(&self, venue_id: VenueId) -> bool {
        self.clients.contains_key(&venue_id)
    }

    /// Returns the registered venue ids in catalogue order.
    #[must_use]
    pub fn venue_ids(&self) -> Vec<VenueId> {
        self.clients.keys().copied().collect()
    }

    /// Iterates over `(venue, client)` pairs in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (VenueId, &Arc<dyn VenueClient>)> {
        self.clients.iter().map(|(id, client)| (*id, client))
    }

    /// Returns the number of registered venues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no venue is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Symbol;
    use crate::infrastructure::venues::simulated::SimulatedVenueClient;

    fn client(venue_id: VenueId) -> Arc<dyn VenueClient> {
        let base = Symbol::new("SFRT").unwrap();
        let quote = Symbol::new("JPY").unwrap();
        Arc::new(SimulatedVenueClient::new(venue_id, base, quote))
    }

    #[test]
    fn iterates_in_catalogue_order() {
        let registry = VenueRegistry::from_clients([
            client(VenueId::Binance),
            client(VenueId::Bitbank),
            client(VenueId::Mock),
        ]);
        assert_eq!(
            registry.venue_ids(),
            vec![VenueId::Bitbank, VenueId::Binance, VenueId::Mock]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_venue_replaces_client() {
        let registry = VenueRegistry::new()
            .with_client(client(VenueId::Okx))
            .with_client(client(VenueId::Okx));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(VenueId::Okx));
        assert!(registry.get(VenueId::Bybit).is_none());
    }

    #[test]
    fn empty_registry() {
        let registry = VenueRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.iter().count(), 0);
    }
}
