//! Location index and great-circle distances.
//!
//! The index is loaded once at startup and never changes. Lookups are by
//! name, case-insensitive; distances use the haversine formula.

mod table;

use std::collections::HashMap;

use crate::domain::{CoreError, Location, round1};

pub use table::{CAPITAL, TGM_STOPS, builtin_locations};

/// Mean Earth radius used for distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Error returned when a location name is not in the index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown location: {0}")]
pub struct LocationNotFound(pub String);

impl From<LocationNotFound> for CoreError {
    fn from(e: LocationNotFound) -> Self {
        CoreError::LocationNotFound(e.0)
    }
}

/// Great-circle distance between two locations in kilometres, rounded to
/// one decimal place.
///
/// # Examples
///
/// ```
/// use trip_planner::geo::{GeoIndex, distance_km};
///
/// let geo = GeoIndex::tunisia();
/// let tunis = geo.lookup("Tunis").unwrap();
/// let sousse = geo.lookup("Sousse").unwrap();
/// let d = distance_km(tunis, sousse);
/// assert!((116.0..=117.0).contains(&d));
/// ```
pub fn distance_km(a: &Location, b: &Location) -> f64 {
    let (p, q) = (a.coordinates(), b.coordinates());
    let (lat1, lat2) = (p.lat.to_radians(), q.lat.to_radians());
    let dlat = (q.lat - p.lat).to_radians();
    let dlon = (q.lon - p.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    round1(EARTH_RADIUS_KM * c)
}

/// Immutable name → location index.
#[derive(Debug, Clone)]
pub struct GeoIndex {
    locations: Vec<Location>,
    by_name: HashMap<String, usize>,
}

impl GeoIndex {
    /// Build an index over the given locations.
    ///
    /// Later duplicates of a name (ignoring case) are dropped.
    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let mut kept = Vec::new();
        let mut by_name = HashMap::new();
        for location in locations {
            let key = normalize(location.name());
            if by_name.contains_key(&key) {
                continue;
            }
            by_name.insert(key, kept.len());
            kept.push(location);
        }
        Self {
            locations: kept,
            by_name,
        }
    }

    /// Index over the built-in location table.
    pub fn tunisia() -> Self {
        Self::from_locations(builtin_locations())
    }

    /// Look up a location by name.
    pub fn lookup(&self, name: &str) -> Result<&Location, LocationNotFound> {
        self.by_name
            .get(&normalize(name))
            .map(|&i| &self.locations[i])
            .ok_or_else(|| LocationNotFound(name.trim().to_string()))
    }

    /// Distance between two named locations.
    pub fn distance_between(&self, a: &str, b: &str) -> Result<f64, LocationNotFound> {
        Ok(distance_km(self.lookup(a)?, self.lookup(b)?))
    }

    /// All locations, in table order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn index_pair() -> impl Strategy<Value = (usize, usize)> {
        let n = GeoIndex::tunisia().len();
        (0..n, 0..n)
    }

    proptest! {
        /// Distance does not depend on direction
        #[test]
        fn symmetric((i, j) in index_pair()) {
            let geo = GeoIndex::tunisia();
            let locs: Vec<_> = geo.locations().collect();
            prop_assert_eq!(distance_km(locs[i], locs[j]), distance_km(locs[j], locs[i]));
        }

        /// A location is zero kilometres from itself
        #[test]
        fn zero_to_self((i, _) in index_pair()) {
            let geo = GeoIndex::tunisia();
            let loc = geo.locations().nth(i).unwrap();
            prop_assert_eq!(distance_km(loc, loc), 0.0);
        }

        /// Distances are non-negative and bounded by half the circumference
        #[test]
        fn bounded((i, j) in index_pair()) {
            let geo = GeoIndex::tunisia();
            let locs: Vec<_> = geo.locations().collect();
            let d = distance_km(locs[i], locs[j]);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 0.1);
        }
    }
}
