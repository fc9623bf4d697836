//! Named locations and their classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// What sort of place a location is.
///
/// Eligibility rules are written against this classification rather than
/// against the location name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    /// A stop inside the capital, named "Tunis - <district>".
    CapitalDistrict,
    /// A stop inside another city, named "<City> - <district>".
    CityDistrict,
    /// A city taken as a whole.
    City,
    /// A coastal suburb of the capital served by the TGM line.
    CoastalSuburb,
    /// A passenger port.
    Port,
    /// A domestic airport.
    Airport,
    /// A destination abroad, named "<City> (<Country>)".
    Abroad,
}

/// A named place with fixed coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    name: String,
    coordinates: Coordinates,
    kind: LocationKind,
    international: bool,
}

impl Location {
    /// Create a location.
    ///
    /// `international` marks places outside the country; every `Abroad`
    /// location is international, ports may be either.
    pub fn new(
        name: impl Into<String>,
        coordinates: Coordinates,
        kind: LocationKind,
        international: bool,
    ) -> Self {
        Self {
            name: name.into(),
            coordinates,
            kind,
            international: international || kind == LocationKind::Abroad,
        }
    }

    /// Shorthand for a domestic location.
    pub fn domestic(name: impl Into<String>, lat: f64, lon: f64, kind: LocationKind) -> Self {
        Self::new(name, Coordinates::new(lat, lon), kind, false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    pub fn is_international(&self) -> bool {
        self.international
    }

    /// A district of a larger city, named "City - District".
    pub fn is_district(&self) -> bool {
        matches!(
            self.kind,
            LocationKind::CapitalDistrict | LocationKind::CityDistrict
        )
    }

    /// Case-insensitive name comparison.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Which end of a trip a location is being offered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    #[default]
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abroad_is_always_international() {
        let paris = Location::new(
            "Paris (France)",
            Coordinates::new(48.8566, 2.3522),
            LocationKind::Abroad,
            false,
        );
        assert!(paris.is_international());
    }

    #[test]
    fn name_matching_ignores_case_and_padding() {
        let loc = Location::domestic("Tunis - Bardo", 36.8092, 10.1342, LocationKind::CapitalDistrict);
        assert!(loc.name_matches("tunis - bardo"));
        assert!(loc.name_matches("  TUNIS - BARDO "));
        assert!(!loc.name_matches("Bardo"));
    }

    #[test]
    fn district_kinds() {
        let bardo = Location::domestic("Tunis - Bardo", 36.8092, 10.1342, LocationKind::CapitalDistrict);
        let sousse = Location::domestic("Sousse", 35.8245, 10.6346, LocationKind::City);
        assert!(bardo.is_district());
        assert!(!sousse.is_district());
    }
}
