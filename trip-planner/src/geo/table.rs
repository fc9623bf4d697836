//! Built-in location table.
//!
//! Each row carries its classification explicitly. Eligibility rules read
//! the `LocationKind`, never the name.

use crate::domain::{Coordinates, Location, LocationKind};

use LocationKind::*;

/// (name, latitude, longitude, kind, international)
type Row = (&'static str, f64, f64, LocationKind, bool);

/// Name of the capital; its districts are named "Tunis - <district>".
pub const CAPITAL: &str = "Tunis";

/// Closed list of suburbs served by the TGM light rail.
pub const TGM_STOPS: [&str; 4] = ["La Goulette", "Carthage", "Sidi Bou Said", "La Marsa"];

const ROWS: &[Row] = &[
    // Capital districts
    ("Tunis - Centre Ville", 36.8065, 10.1815, CapitalDistrict, false),
    ("Tunis - Bardo", 36.8092, 10.1342, CapitalDistrict, false),
    ("Tunis - Lac", 36.8325, 10.2330, CapitalDistrict, false),
    ("Tunis - Menzah", 36.8390, 10.1700, CapitalDistrict, false),
    ("Tunis - Bab Saadoun", 36.8075, 10.1650, CapitalDistrict, false),
    ("Tunis - Belvédère", 36.8220, 10.1780, CapitalDistrict, false),
    ("Tunis - Ben Arous", 36.7531, 10.2189, CapitalDistrict, false),
    ("Tunis - Ariana", 36.8665, 10.1647, CapitalDistrict, false),
    // Districts of other cities
    ("Sousse - Centre Ville", 35.8245, 10.6346, CityDistrict, false),
    ("Sousse - Port El Kantaoui", 35.8920, 10.5950, CityDistrict, false),
    ("Sfax - Centre Ville", 34.7406, 10.7603, CityDistrict, false),
    ("Sfax - Sakiet Ezzit", 34.8030, 10.7560, CityDistrict, false),
    // Cities
    ("Tunis", 36.8065, 10.1815, City, false),
    ("Sousse", 35.8245, 10.6346, City, false),
    ("Sfax", 34.7406, 10.7603, City, false),
    ("Monastir", 35.7643, 10.8113, City, false),
    ("Mahdia", 35.5047, 11.0622, City, false),
    ("Nabeul", 36.4561, 10.7376, City, false),
    ("Hammamet", 36.4000, 10.6167, City, false),
    ("Bizerte", 37.2744, 9.8739, City, false),
    ("Kairouan", 35.6781, 10.0963, City, false),
    ("Gabès", 33.8815, 10.0982, City, false),
    ("Gafsa", 34.4250, 8.7842, City, false),
    ("Tozeur", 33.9197, 8.1335, City, false),
    ("Djerba", 33.8750, 10.8575, City, false),
    ("Médenine", 33.3549, 10.5055, City, false),
    ("Béja", 36.7256, 9.1817, City, false),
    ("Jendouba", 36.5011, 8.7802, City, false),
    ("Tabarka", 36.9544, 8.7580, City, false),
    ("Kasserine", 35.1676, 8.8365, City, false),
    // TGM suburbs
    ("La Goulette", 36.8181, 10.3050, CoastalSuburb, false),
    ("Carthage", 36.8528, 10.3233, CoastalSuburb, false),
    ("Sidi Bou Said", 36.8687, 10.3416, CoastalSuburb, false),
    ("La Marsa", 36.8782, 10.3247, CoastalSuburb, false),
    // Ports
    ("Port de La Goulette", 36.8125, 10.3050, Port, false),
    ("Port de Sfax", 34.7270, 10.7700, Port, false),
    ("Port de Bizerte", 37.2700, 9.8800, Port, false),
    ("Port de Zarzis", 33.5030, 11.1120, Port, false),
    ("Port de Sousse", 35.8270, 10.6430, Port, false),
    ("Port de Marseille", 43.3100, 5.3650, Port, true),
    ("Port de Gênes", 44.4056, 8.9340, Port, true),
    ("Port de Palerme", 38.1300, 13.3700, Port, true),
    ("Port de Civitavecchia", 42.0930, 11.7960, Port, true),
    // Airports
    ("Aéroport Tunis-Carthage", 36.8510, 10.2272, Airport, false),
    ("Aéroport Enfidha-Hammamet", 36.0758, 10.4386, Airport, false),
    ("Aéroport Monastir Habib Bourguiba", 35.7581, 10.7547, Airport, false),
    ("Aéroport Sfax-Thyna", 34.7180, 10.6910, Airport, false),
    ("Aéroport Djerba-Zarzis", 33.8750, 10.7755, Airport, false),
    ("Aéroport Tozeur-Nefta", 33.9397, 8.1106, Airport, false),
    ("Aéroport Tabarka-Aïn Draham", 36.9800, 8.8769, Airport, false),
    // Destinations abroad
    ("Paris (France)", 48.8566, 2.3522, Abroad, true),
    ("Marseille (France)", 43.2965, 5.3698, Abroad, true),
    ("Lyon (France)", 45.7640, 4.8357, Abroad, true),
    ("Rome (Italie)", 41.9028, 12.4964, Abroad, true),
    ("Francfort (Allemagne)", 50.1109, 8.6821, Abroad, true),
    ("Londres (Royaume-Uni)", 51.5074, -0.1278, Abroad, true),
    ("Istanbul (Turquie)", 41.0082, 28.9784, Abroad, true),
    ("Alger (Algérie)", 36.7538, 3.0588, Abroad, true),
    ("Casablanca (Maroc)", 33.5731, -7.5898, Abroad, true),
    ("Le Caire (Égypte)", 30.0444, 31.2357, Abroad, true),
    ("Djeddah (Arabie saoudite)", 21.4858, 39.1925, Abroad, true),
    ("Dubaï (Émirats arabes unis)", 25.2048, 55.2708, Abroad, true),
];

/// The built-in locations, in table order.
pub fn builtin_locations() -> Vec<Location> {
    ROWS.iter()
        .map(|&(name, lat, lon, kind, international)| {
            Location::new(name, Coordinates::new(lat, lon), kind, international)
        })
        .collect()
}
