//! Transport mode eligibility rules.
//!
//! Decides which locations a mode may serve as origin or destination, and
//! whether a given (mode, origin, destination) triple is legal. A pair is
//! valid exactly when the origin is an origin candidate and the
//! destination is a destination candidate for the mode.

use crate::domain::{
    Endpoint, Location, LocationKind, ModeFilter, TransportMode, ValidationError,
};
use crate::geo::{GeoIndex, TGM_STOPS};

/// Whether `location` may serve as `endpoint` for `mode`.
pub fn accepts(mode: TransportMode, endpoint: Endpoint, location: &Location) -> bool {
    use LocationKind::*;

    let kind = location.kind();
    match mode {
        TransportMode::Plane => match endpoint {
            Endpoint::Origin => kind == Airport,
            Endpoint::Destination => matches!(kind, Airport | Abroad),
        },
        TransportMode::Ferry => kind == Port,
        TransportMode::Train => {
            !location.is_international()
                && matches!(kind, City | CapitalDistrict | CityDistrict | CoastalSuburb)
        }
        TransportMode::Metro => kind == CapitalDistrict,
        TransportMode::Tgm => TGM_STOPS.iter().any(|stop| location.name_matches(stop)),
        TransportMode::Taxi | TransportMode::Bus | TransportMode::Other => {
            !location.is_international()
        }
    }
}

/// Same as [`accepts`], with "all modes" accepting every location.
pub fn filter_accepts(filter: ModeFilter, endpoint: Endpoint, location: &Location) -> bool {
    match filter {
        ModeFilter::All => true,
        ModeFilter::Only(mode) => accepts(mode, endpoint, location),
    }
}

/// Eligibility rules bound to a location index.
#[derive(Debug, Clone, Copy)]
pub struct ModeEligibility<'a> {
    geo: &'a GeoIndex,
}

impl<'a> ModeEligibility<'a> {
    pub fn new(geo: &'a GeoIndex) -> Self {
        Self { geo }
    }

    /// Locations offered for `endpoint` once `filter` is chosen, in table order.
    pub fn candidate_locations(&self, filter: ModeFilter, endpoint: Endpoint) -> Vec<&'a Location> {
        self.geo
            .locations()
            .filter(|loc| filter_accepts(filter, endpoint, loc))
            .collect()
    }

    /// Whether the pair is legal for the filter.
    pub fn is_valid_pair(
        &self,
        filter: ModeFilter,
        origin: &Location,
        destination: &Location,
    ) -> bool {
        self.check_pair(filter, origin, destination).is_ok()
    }

    /// Like [`is_valid_pair`](Self::is_valid_pair) but reports which
    /// endpoint was rejected.
    pub fn check_pair(
        &self,
        filter: ModeFilter,
        origin: &Location,
        destination: &Location,
    ) -> Result<(), ValidationError> {
        let ModeFilter::Only(mode) = filter else {
            return Ok(());
        };
        for (endpoint, location) in [
            (Endpoint::Origin, origin),
            (Endpoint::Destination, destination),
        ] {
            if !accepts(mode, endpoint, location) {
                return Err(ValidationError::IncompatibleLocation {
                    mode,
                    endpoint,
                    location: location.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Every mode that can serve the pair, in display order.
    pub fn eligible_modes(&self, origin: &Location, destination: &Location) -> Vec<TransportMode> {
        TransportMode::ALL
            .into_iter()
            .filter(|&mode| {
                accepts(mode, Endpoint::Origin, origin)
                    && accepts(mode, Endpoint::Destination, destination)
            })
            .collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::select;

    proptest! {
        /// A pair is valid iff both ends are offered as candidates
        #[test]
        fn pair_validity_matches_candidates(
            mode in select(TransportMode::ALL.to_vec()),
            i in 0usize..64,
            j in 0usize..64,
        ) {
            let geo = GeoIndex::tunisia();
            let rules = ModeEligibility::new(&geo);
            let locs: Vec<_> = geo.locations().collect();
            let origin = locs[i % locs.len()];
            let destination = locs[j % locs.len()];

            let filter = ModeFilter::Only(mode);
            let origins = rules.candidate_locations(filter, Endpoint::Origin);
            let destinations = rules.candidate_locations(filter, Endpoint::Destination);
            let expected = origins.iter().any(|l| l.name() == origin.name())
                && destinations.iter().any(|l| l.name() == destination.name());

            prop_assert_eq!(rules.is_valid_pair(filter, origin, destination), expected);
        }
    }
}
