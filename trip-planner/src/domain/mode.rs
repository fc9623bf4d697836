//! Transport mode types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown transport mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0}")]
pub struct InvalidMode(pub String);

/// Scaling factors a mode applies to the bus baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeFactors {
    /// Applied to the baseline travel time.
    pub duration: f64,

    /// Applied to the baseline price.
    pub price: f64,

    /// Applied to the geodesic distance before anything else.
    pub distance: f64,
}

/// A transport mode offered by the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Bus,
    Train,
    Taxi,
    Metro,
    Tgm,
    Plane,
    Ferry,
    Other,
}

impl TransportMode {
    /// Every mode, in display order.
    pub const ALL: [TransportMode; 8] = [
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Taxi,
        TransportMode::Metro,
        TransportMode::Tgm,
        TransportMode::Plane,
        TransportMode::Ferry,
        TransportMode::Other,
    ];

    /// Multipliers relative to the bus baseline.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::TransportMode;
    ///
    /// let plane = TransportMode::Plane.factors();
    /// assert_eq!(plane.duration, 0.3);
    /// assert_eq!(plane.price, 5.0);
    /// ```
    pub const fn factors(self) -> ModeFactors {
        let (duration, price, distance) = match self {
            TransportMode::Plane => (0.3, 5.0, 1.0),
            TransportMode::Ferry => (2.0, 2.0, 1.0),
            TransportMode::Train => (0.8, 0.9, 1.0),
            TransportMode::Metro | TransportMode::Tgm => (0.7, 0.3, 0.9),
            TransportMode::Taxi => (0.7, 2.5, 1.0),
            TransportMode::Bus | TransportMode::Other => (1.0, 1.0, 1.0),
        };
        ModeFactors {
            duration,
            price,
            distance,
        }
    }

    /// Machine identifier, as used in query strings and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
            TransportMode::Taxi => "taxi",
            TransportMode::Metro => "metro",
            TransportMode::Tgm => "tgm",
            TransportMode::Plane => "plane",
            TransportMode::Ferry => "ferry",
            TransportMode::Other => "other",
        }
    }

    /// Label shown to travellers.
    pub fn label(self) -> &'static str {
        match self {
            TransportMode::Bus => "Bus",
            TransportMode::Train => "Train",
            TransportMode::Taxi => "Taxi",
            TransportMode::Metro => "Métro",
            TransportMode::Tgm => "TGM",
            TransportMode::Plane => "Avion",
            TransportMode::Ferry => "Ferry",
            TransportMode::Other => "Autre",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransportMode {
    type Err = InvalidMode;

    /// Accepts the machine identifier or the traveller label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        TransportMode::ALL
            .into_iter()
            .find(|m| m.as_str() == needle || m.label().to_lowercase() == needle)
            .ok_or_else(|| InvalidMode(s.to_string()))
    }
}

/// Mode selection for a search: one mode, or every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModeFilter {
    #[default]
    All,
    Only(TransportMode),
}

impl ModeFilter {
    /// Whether a route of the given mode passes this filter.
    pub fn matches(self, mode: TransportMode) -> bool {
        match self {
            ModeFilter::All => true,
            ModeFilter::Only(m) => m == mode,
        }
    }
}

impl fmt::Display for ModeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeFilter::All => f.write_str("Tous"),
            ModeFilter::Only(m) => fmt::Display::fmt(m, f),
        }
    }
}

impl FromStr for ModeFilter {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "tous" => Ok(ModeFilter::All),
            _ => s.parse().map(ModeFilter::Only),
        }
    }
}

impl From<TransportMode> for ModeFilter {
    fn from(mode: TransportMode) -> Self {
        ModeFilter::Only(mode)
    }
}
