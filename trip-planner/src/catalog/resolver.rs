//! Route search.
//!
//! Returns the persisted routes for a pair when the catalog has any, and
//! synthesized candidates otherwise. A search never fails for lack of
//! routes; it fails only on bad input, unknown locations or a store
//! error.

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    CoreError, ModeFilter, Route, TransportMode, ValidationError, parse_date_time,
};
use crate::eligibility::ModeEligibility;
use crate::fare::FareEstimator;
use crate::geo::GeoIndex;

use super::config::ResolverConfig;
use super::store::RouteStore;
use super::synth::Synthesizer;

/// A validated search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: String,
    pub destination: String,
    pub mode: ModeFilter,
    pub departure: NaiveDateTime,
    pub passengers: u32,
}

impl SearchRequest {
    /// Parse raw search input.
    ///
    /// Checks that both endpoints are present and distinct and that the
    /// date (`YYYY-MM-DD`) and time (`HH:MM`) parse. An empty mode means
    /// "all modes". The passenger range is checked by the resolver, which
    /// owns the upper bound.
    pub fn parse(
        origin: &str,
        destination: &str,
        mode: &str,
        date: &str,
        time: &str,
        passengers: u32,
    ) -> Result<Self, ValidationError> {
        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() {
            return Err(ValidationError::MissingField("origin"));
        }
        if destination.is_empty() {
            return Err(ValidationError::MissingField("destination"));
        }
        if date.trim().is_empty() {
            return Err(ValidationError::MissingField("date"));
        }
        if time.trim().is_empty() {
            return Err(ValidationError::MissingField("time"));
        }

        let request = Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            mode: mode.parse()?,
            departure: parse_date_time(date.trim(), time.trim())?,
            passengers,
        };
        request.validate(u32::MAX)?;
        Ok(request)
    }

    /// Check the request against the given passenger limit.
    pub fn validate(&self, max_passengers: u32) -> Result<(), ValidationError> {
        if self.origin.trim().to_lowercase() == self.destination.trim().to_lowercase() {
            return Err(ValidationError::SameEndpoints);
        }
        if self.passengers == 0 || self.passengers > max_passengers {
            return Err(ValidationError::InvalidPassengers {
                requested: self.passengers,
                max: max_passengers,
            });
        }
        Ok(())
    }
}

/// Result of a route search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Great-circle distance between the endpoints.
    pub distance_km: f64,

    /// Estimated travel time for the requested mode (bus for "all").
    pub duration_minutes: u32,

    /// One-way price for the requested mode (bus for "all").
    pub estimated_price: f64,

    pub routes: Vec<Route>,
}

impl SearchOutcome {
    /// Whether the routes came from synthesis rather than the catalog.
    pub fn is_synthesized(&self) -> bool {
        self.routes.first().is_some_and(Route::is_synthesized)
    }
}

/// Route search over a catalog store.
pub struct RouteCatalogResolver<'a, S: RouteStore> {
    store: &'a S,
    geo: &'a GeoIndex,
    fares: &'a FareEstimator,
    config: &'a ResolverConfig,
}

impl<'a, S: RouteStore> RouteCatalogResolver<'a, S> {
    pub fn new(
        store: &'a S,
        geo: &'a GeoIndex,
        fares: &'a FareEstimator,
        config: &'a ResolverConfig,
    ) -> Self {
        Self {
            store,
            geo,
            fares,
            config,
        }
    }

    /// Search for routes between two locations.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, CoreError> {
        request.validate(self.config.max_passengers)?;

        let origin = self.geo.lookup(&request.origin)?;
        let destination = self.geo.lookup(&request.destination)?;

        let rules = ModeEligibility::new(self.geo);
        rules.check_pair(request.mode, origin, destination)?;

        let distance_km = crate::geo::distance_km(origin, destination);
        let summary_mode = match request.mode {
            ModeFilter::All => TransportMode::Bus,
            ModeFilter::Only(mode) => mode,
        };
        let summary = self.fares.estimate(distance_km, summary_mode, false);

        let (persisted, operators) = futures::try_join!(
            self.store.routes_between(origin.name(), destination.name()),
            self.store.operators(),
        )?;

        let persisted: Vec<Route> = persisted
            .into_iter()
            .filter(|r| request.mode.matches(r.details.mode))
            .map(Route::Persisted)
            .collect();

        let routes = if !persisted.is_empty() {
            debug!(
                origin = origin.name(),
                destination = destination.name(),
                count = persisted.len(),
                "Serving persisted routes"
            );
            persisted
        } else {
            let modes = match request.mode {
                ModeFilter::All => rules.eligible_modes(origin, destination),
                ModeFilter::Only(mode) => vec![mode],
            };
            if modes.is_empty() {
                info!(
                    origin = origin.name(),
                    destination = destination.name(),
                    "No transport mode serves this pair"
                );
            }

            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let synthesized = Synthesizer::new(self.fares, self.config).synthesize(
                &mut rng,
                origin,
                destination,
                &modes,
                &operators,
            );
            debug!(
                origin = origin.name(),
                destination = destination.name(),
                count = synthesized.len(),
                "Synthesized routes"
            );
            synthesized
        };

        Ok(SearchOutcome {
            distance_km,
            duration_minutes: summary.duration_minutes,
            estimated_price: summary.price,
            routes,
        })
    }
}
