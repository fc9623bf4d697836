//! Caching layer for route catalog lookups.
//!
//! Searches hit the catalog once per request for the origin/destination
//! pair and once for the operator list. Both are cached for a short TTL;
//! id lookups used at booking time always go to the store so a booking
//! never sees a stale route.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::catalog::RouteStore;
use crate::domain::{CatalogRoute, Operator, RouteId, StoreError, Vehicle, VehicleId};

/// Cache key for pair lookups: (origin, destination), lowercased.
type PairKey = (String, String);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached pair lookups.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Route store with caching.
///
/// Wraps any `RouteStore` and caches pair lookups and the operator list.
pub struct CachedRouteStore<S> {
    inner: S,
    pairs: MokaCache<PairKey, Arc<Vec<CatalogRoute>>>,
    operators: MokaCache<(), Arc<Vec<Operator>>>,
}

impl<S: RouteStore> CachedRouteStore<S> {
    /// Create a new cached store.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let pairs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let operators = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(1)
            .build();

        Self {
            inner,
            pairs,
            operators,
        }
    }

    /// Access the underlying store, bypassing the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of cached pair lookups.
    pub fn cache_entry_count(&self) -> u64 {
        self.pairs.entry_count()
    }

    /// Drop every cached entry.
    ///
    /// Call after changing the catalog behind the cache.
    pub fn invalidate_cache(&self) {
        self.pairs.invalidate_all();
        self.operators.invalidate_all();
    }
}

fn pair_key(origin: &str, destination: &str) -> PairKey {
    (
        origin.trim().to_lowercase(),
        destination.trim().to_lowercase(),
    )
}

impl<S: RouteStore> RouteStore for CachedRouteStore<S> {
    async fn all_routes(&self) -> Result<Vec<CatalogRoute>, StoreError> {
        self.inner.all_routes().await
    }

    async fn route(&self, id: RouteId) -> Result<Option<CatalogRoute>, StoreError> {
        self.inner.route(id).await
    }

    async fn routes_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<CatalogRoute>, StoreError> {
        let key = pair_key(origin, destination);

        if let Some(cached) = self.pairs.get(&key).await {
            trace!(origin, destination, "route cache hit");
            return Ok(cached.as_ref().clone());
        }

        let routes = self.inner.routes_between(origin, destination).await?;
        self.pairs.insert(key, Arc::new(routes.clone())).await;
        Ok(routes)
    }

    async fn operators(&self) -> Result<Vec<Operator>, StoreError> {
        if let Some(cached) = self.operators.get(&()).await {
            return Ok(cached.as_ref().clone());
        }

        let operators = self.inner.operators().await?;
        self.operators.insert((), Arc::new(operators.clone())).await;
        Ok(operators)
    }

    async fn vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, StoreError> {
        self.inner.vehicle(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryRouteStore;
    use crate::catalog::fixtures::route;
    use crate::domain::TransportMode;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn keys_ignore_case_and_padding() {
        assert_eq!(pair_key(" Tunis", "SOUSSE "), pair_key("tunis", "sousse"));
        assert_ne!(pair_key("Tunis", "Sousse"), pair_key("Sousse", "Tunis"));
    }

    #[tokio::test]
    async fn serves_cached_pairs_until_invalidated() {
        let store = InMemoryRouteStore::empty();
        store.add_route(route(1, "Tunis", "Sousse", TransportMode::Bus)).await;
        let cached = CachedRouteStore::new(store.clone(), &CacheConfig::default());

        assert_eq!(cached.routes_between("Tunis", "Sousse").await.unwrap().len(), 1);

        // A route added behind the cache is not seen until invalidation.
        store.add_route(route(2, "Tunis", "Sousse", TransportMode::Train)).await;
        assert_eq!(cached.routes_between("tunis", "sousse").await.unwrap().len(), 1);

        cached.invalidate_cache();
        assert_eq!(cached.routes_between("Tunis", "Sousse").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn id_lookups_bypass_cache() {
        let store = InMemoryRouteStore::empty();
        let cached = CachedRouteStore::new(store.clone(), &CacheConfig::default());
        assert!(cached.route(RouteId(1)).await.unwrap().is_none());

        store.add_route(route(1, "Tunis", "Sousse", TransportMode::Bus)).await;
        assert!(cached.route(RouteId(1)).await.unwrap().is_some());
    }
}
