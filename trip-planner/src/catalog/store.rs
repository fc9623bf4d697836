//! Route catalog storage.
//!
//! The catalog is owned by an external persistence collaborator; the core
//! only reads from it. `InMemoryRouteStore` serves a catalog loaded from a
//! JSON file or built in code, for development and tests.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::{CatalogRoute, Operator, RouteId, StoreError, Vehicle, VehicleId};

/// Read access to persisted routes, operators and vehicles.
pub trait RouteStore: Send + Sync {
    /// Every persisted route.
    fn all_routes(&self) -> impl Future<Output = Result<Vec<CatalogRoute>, StoreError>> + Send;

    /// A route by id.
    fn route(
        &self,
        id: RouteId,
    ) -> impl Future<Output = Result<Option<CatalogRoute>, StoreError>> + Send;

    /// Routes whose endpoints match, ignoring case, in catalog order.
    fn routes_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = Result<Vec<CatalogRoute>, StoreError>> + Send;

    /// Registered operators.
    fn operators(&self) -> impl Future<Output = Result<Vec<Operator>, StoreError>> + Send;

    /// A vehicle by id.
    fn vehicle(
        &self,
        id: VehicleId,
    ) -> impl Future<Output = Result<Option<Vehicle>, StoreError>> + Send;
}

/// Catalog contents, as stored in the seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub routes: Vec<CatalogRoute>,
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

/// In-memory catalog.
#[derive(Clone, Default)]
pub struct InMemoryRouteStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryRouteStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// A store with no routes, operators or vehicles.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file.
    ///
    /// The file holds an object with optional `routes`, `operators` and
    /// `vehicles` arrays.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("failed to read {}: {}", path.display(), e))
        })?;
        let catalog: Catalog = serde_json::from_str(&json).map_err(|e| {
            StoreError::Unavailable(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Self::new(catalog))
    }

    /// Replace the whole catalog.
    pub async fn replace(&self, catalog: Catalog) {
        *self.catalog.write().await = catalog;
    }

    pub async fn add_route(&self, route: CatalogRoute) {
        self.catalog.write().await.routes.push(route);
    }

    pub async fn add_operator(&self, operator: Operator) {
        self.catalog.write().await.operators.push(operator);
    }

    pub async fn add_vehicle(&self, vehicle: Vehicle) {
        self.catalog.write().await.vehicles.push(vehicle);
    }

    /// Number of persisted routes.
    pub async fn route_count(&self) -> usize {
        self.catalog.read().await.routes.len()
    }
}

impl RouteStore for InMemoryRouteStore {
    async fn all_routes(&self) -> Result<Vec<CatalogRoute>, StoreError> {
        Ok(self.catalog.read().await.routes.clone())
    }

    async fn route(&self, id: RouteId) -> Result<Option<CatalogRoute>, StoreError> {
        let catalog = self.catalog.read().await;
        Ok(catalog.routes.iter().find(|r| r.id == id).cloned())
    }

    async fn routes_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<CatalogRoute>, StoreError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .routes
            .iter()
            .filter(|r| r.details.connects(origin, destination))
            .cloned()
            .collect())
    }

    async fn operators(&self) -> Result<Vec<Operator>, StoreError> {
        Ok(self.catalog.read().await.operators.clone())
    }

    async fn vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, StoreError> {
        let catalog = self.catalog.read().await;
        Ok(catalog.vehicles.iter().find(|v| v.id == id).cloned())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{OrganisationId, RouteDetails, RouteType, TransportMode};

    use super::*;

    pub fn route(id: u64, origin: &str, destination: &str, mode: TransportMode) -> CatalogRoute {
        CatalogRoute {
            id: RouteId(id),
            organisation: OrganisationId(1),
            details: RouteDetails {
                origin: origin.to_string(),
                destination: destination.to_string(),
                distance_km: 116.5,
                duration_minutes: 88,
                price: 58.3,
                operator: "SNTRI".to_string(),
                mode,
                route_type: RouteType::Direct,
                international: false,
                intra_city: false,
            },
        }
    }

    pub fn vehicle(id: u64, kind: TransportMode) -> Vehicle {
        Vehicle {
            id: VehicleId(id),
            organisation: OrganisationId(1),
            kind,
            label: format!("V-{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::fixtures::*;
    use super::*;
    use crate::domain::TransportMode;

    #[tokio::test]
    async fn routes_between_matches_case_insensitively() {
        let store = InMemoryRouteStore::empty();
        store.add_route(route(1, "Tunis", "Sousse", TransportMode::Bus)).await;
        store.add_route(route(2, "Sousse", "Tunis", TransportMode::Bus)).await;
        store.add_route(route(3, "TUNIS", "sousse", TransportMode::Train)).await;

        let found = store.routes_between("tunis", "Sousse").await.unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RouteId(1), RouteId(3)]);
    }

    #[tokio::test]
    async fn lookups_by_id() {
        let store = InMemoryRouteStore::empty();
        store.add_route(route(7, "Tunis", "Sfax", TransportMode::Train)).await;
        store.add_vehicle(vehicle(3, TransportMode::Train)).await;

        assert!(store.route(RouteId(7)).await.unwrap().is_some());
        assert!(store.route(RouteId(8)).await.unwrap().is_none());
        assert_eq!(
            store.vehicle(VehicleId(3)).await.unwrap().map(|v| v.kind),
            Some(TransportMode::Train)
        );
        assert_eq!(store.all_routes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "routes": [{{
                    "id": 1, "organisation": 2,
                    "origin": "Tunis", "destination": "Sousse",
                    "distance_km": 116.5, "duration_minutes": 88, "price": 58.3,
                    "operator": "SNTRI", "mode": "bus", "route_type": "Direct"
                }}],
                "operators": [{{ "organisation": 2, "name": "SNTRI", "modes": ["bus"] }}]
            }}"#
        )
        .unwrap();

        let store = InMemoryRouteStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.route_count().await, 1);
        assert_eq!(store.operators().await.unwrap()[0].name, "SNTRI");
        assert!(store.vehicle(VehicleId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bundled_sample_catalog_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/routes.json");
        let store = InMemoryRouteStore::from_json_file(path).unwrap();
        assert_eq!(store.route_count().await, 5);
        assert_eq!(store.operators().await.unwrap().len(), 5);
        assert_eq!(
            store.vehicle(VehicleId(3)).await.unwrap().map(|v| v.kind),
            Some(TransportMode::Plane)
        );
        let ferries = store
            .routes_between("port de la goulette", "port de marseille")
            .await
            .unwrap();
        assert!(ferries[0].details.international);
    }

    #[test]
    fn load_reports_bad_files() {
        let err = InMemoryRouteStore::from_json_file("/nonexistent/catalog.json").err();
        assert!(matches!(err, Some(StoreError::Unavailable(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = InMemoryRouteStore::from_json_file(file.path()).err();
        assert!(matches!(err, Some(StoreError::Unavailable(msg)) if msg.contains("failed to parse")));
    }
}
