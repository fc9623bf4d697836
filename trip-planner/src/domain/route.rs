//! Route, operator and vehicle types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{OrganisationId, RouteId, TransportMode, VehicleId};

/// Service level label attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteType {
    Direct,
    Express,
    Standard,
    #[serde(rename = "Économique")]
    Economique,
    Premium,
}

impl RouteType {
    pub const ALL: [RouteType; 5] = [
        RouteType::Direct,
        RouteType::Express,
        RouteType::Standard,
        RouteType::Economique,
        RouteType::Premium,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RouteType::Direct => "Direct",
            RouteType::Express => "Express",
            RouteType::Standard => "Standard",
            RouteType::Economique => "Économique",
            RouteType::Premium => "Premium",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The trip a route offers, shared by catalog and synthesized routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDetails {
    /// Origin location name.
    pub origin: String,

    /// Destination location name.
    pub destination: String,

    /// Distance in kilometres.
    pub distance_km: f64,

    /// Estimated travel time in minutes.
    pub duration_minutes: u32,

    /// One-way price in DT.
    pub price: f64,

    /// Operating company name.
    pub operator: String,

    pub mode: TransportMode,

    pub route_type: RouteType,

    /// Either endpoint lies abroad.
    #[serde(default)]
    pub international: bool,

    /// Both endpoints lie inside the same city.
    #[serde(default)]
    pub intra_city: bool,
}

impl RouteDetails {
    /// Case-insensitive match on both endpoints.
    pub fn connects(&self, origin: &str, destination: &str) -> bool {
        same_name(&self.origin, origin) && same_name(&self.destination, destination)
    }
}

// Location names carry accents, so compare full Unicode lowercase.
fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// A route stored in the catalog and owned by an organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRoute {
    pub id: RouteId,
    pub organisation: OrganisationId,
    #[serde(flatten)]
    pub details: RouteDetails,
}

/// A route returned by a search.
///
/// Catalog routes can be booked by id. Synthesized routes exist only for
/// the response that produced them and carry no id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Route {
    Persisted(CatalogRoute),
    Synthesized(RouteDetails),
}

impl Route {
    pub fn details(&self) -> &RouteDetails {
        match self {
            Route::Persisted(route) => &route.details,
            Route::Synthesized(details) => details,
        }
    }

    /// The catalog id, if this route can be booked.
    pub fn id(&self) -> Option<RouteId> {
        match self {
            Route::Persisted(route) => Some(route.id),
            Route::Synthesized(_) => None,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, Route::Synthesized(_))
    }

    pub fn mode(&self) -> TransportMode {
        self.details().mode
    }
}

/// A registered transport operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub organisation: OrganisationId,
    pub name: String,
    /// Modes this operator runs.
    pub modes: Vec<TransportMode>,
}

impl Operator {
    pub fn serves(&self, mode: TransportMode) -> bool {
        self.modes.contains(&mode)
    }
}

/// A vehicle an operator puts on its routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub organisation: OrganisationId,
    /// The kind of vehicle, expressed as the mode it runs.
    pub kind: TransportMode,
    /// Registration or fleet label.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(mode: TransportMode) -> RouteDetails {
        RouteDetails {
            origin: "Tunis".to_string(),
            destination: "Sousse".to_string(),
            distance_km: 116.5,
            duration_minutes: 88,
            price: 58.3,
            operator: "SNTRI".to_string(),
            mode,
            route_type: RouteType::Direct,
            international: false,
            intra_city: false,
        }
    }

    #[test]
    fn connects_ignores_case() {
        let d = details(TransportMode::Bus);
        assert!(d.connects("tunis", "SOUSSE"));
        assert!(d.connects(" Tunis ", "Sousse"));
        assert!(!d.connects("Sousse", "Tunis"));
    }

    #[test]
    fn only_catalog_routes_have_ids() {
        let persisted = Route::Persisted(CatalogRoute {
            id: RouteId(1),
            organisation: OrganisationId(1),
            details: details(TransportMode::Bus),
        });
        let synthesized = Route::Synthesized(details(TransportMode::Bus));

        assert_eq!(persisted.id(), Some(RouteId(1)));
        assert_eq!(synthesized.id(), None);
        assert!(synthesized.is_synthesized());
        assert!(!persisted.is_synthesized());
    }

    #[test]
    fn route_serializes_with_source_tag() {
        let synthesized = Route::Synthesized(details(TransportMode::Ferry));
        let json = serde_json::to_value(&synthesized).unwrap();
        assert_eq!(json["source"], "synthesized");
        assert_eq!(json["mode"], "ferry");
        assert_eq!(json["route_type"], "Direct");
    }

    #[test]
    fn economique_label() {
        assert_eq!(RouteType::Economique.to_string(), "Économique");
        assert_eq!(
            serde_json::to_string(&RouteType::Economique).unwrap(),
            "\"Économique\""
        );
    }

    #[test]
    fn catalog_route_reads_flat_json() {
        let json = r#"{
            "id": 4,
            "organisation": 2,
            "origin": "Tunis",
            "destination": "Sousse",
            "distance_km": 116.5,
            "duration_minutes": 88,
            "price": 58.3,
            "operator": "SNTRI",
            "mode": "bus",
            "route_type": "Express"
        }"#;
        let route: CatalogRoute = serde_json::from_str(json).unwrap();
        assert_eq!(route.id, RouteId(4));
        assert_eq!(route.details.route_type, RouteType::Express);
        assert!(!route.details.international);
    }
}
