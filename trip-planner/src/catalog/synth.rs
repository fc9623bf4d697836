//! Fallback route synthesis.
//!
//! When the catalog has nothing for a search, plausible routes are built
//! from the fare formulas with a little random variance, so the caller
//! always has something to show. Synthesized routes are never stored.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::domain::{
    Location, LocationKind, Operator, Route, RouteDetails, RouteType, TransportMode, round1,
};
use crate::fare::FareEstimator;
use crate::geo::{CAPITAL, distance_km};

use super::config::ResolverConfig;

/// Operator name used when no registered operator runs the mode.
pub fn fallback_operator(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Bus => "SNTRI",
        TransportMode::Train => "SNCFT",
        TransportMode::Taxi => "Taxi Collectif",
        TransportMode::Metro => "Transtu Métro",
        TransportMode::Tgm => "Transtu TGM",
        TransportMode::Plane => "Tunisair",
        TransportMode::Ferry => "CTN",
        TransportMode::Other => "Transport Privé",
    }
}

/// City a location belongs to, when it is part of one.
fn city_of(location: &Location) -> Option<&str> {
    if location.is_district() {
        return location.name().split_once(" - ").map(|(city, _)| city.trim());
    }
    (location.kind() == LocationKind::CoastalSuburb).then_some(CAPITAL)
}

/// Both endpoints lie in the same city.
pub fn is_intra_city(origin: &Location, destination: &Location) -> bool {
    match (city_of(origin), city_of(destination)) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// Scale `value` by a random factor in `[1 - spread, 1 + spread]`.
fn jitter<R: Rng>(rng: &mut R, value: f64, spread: f64) -> f64 {
    if spread <= 0.0 {
        return value;
    }
    value * rng.random_range((1.0 - spread)..=(1.0 + spread))
}

/// Builds synthetic candidate routes.
pub struct Synthesizer<'a> {
    fares: &'a FareEstimator,
    config: &'a ResolverConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(fares: &'a FareEstimator, config: &'a ResolverConfig) -> Self {
        Self { fares, config }
    }

    /// Synthesize routes for the given modes.
    ///
    /// Produces `synthesized_count` routes, or one per mode if there are
    /// more modes than that, assigning modes round-robin. Returns nothing
    /// when `modes` is empty.
    pub fn synthesize<R: Rng>(
        &self,
        rng: &mut R,
        origin: &Location,
        destination: &Location,
        modes: &[TransportMode],
        operators: &[Operator],
    ) -> Vec<Route> {
        if modes.is_empty() {
            return Vec::new();
        }

        let base_distance = distance_km(origin, destination);
        let international = origin.is_international() || destination.is_international();
        let intra_city = is_intra_city(origin, destination);
        let total = self.config.synthesized_count.max(modes.len());

        (0..total)
            .map(|i| {
                let mode = modes[i % modes.len()];
                let distance_km = round1(jitter(rng, base_distance, self.config.distance_jitter));
                let estimate = self.fares.estimate(distance_km, mode, false);
                let price = round1(jitter(rng, estimate.price, self.config.price_jitter));

                let serving: Vec<&Operator> = operators.iter().filter(|o| o.serves(mode)).collect();
                let operator = serving
                    .choose(rng)
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| fallback_operator(mode).to_string());
                let route_type = RouteType::ALL
                    .choose(rng)
                    .copied()
                    .unwrap_or(RouteType::Standard);

                Route::Synthesized(RouteDetails {
                    origin: origin.name().to_string(),
                    destination: destination.name().to_string(),
                    distance_km,
                    duration_minutes: estimate.duration_minutes,
                    price,
                    operator,
                    mode,
                    route_type,
                    international,
                    intra_city,
                })
            })
            .collect()
    }
}
