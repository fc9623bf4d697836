//! Domain error types.
//!
//! `ValidationError` covers bad or incompatible user input and is always
//! reported back to the caller. `CoreError` is what the core operations
//! return; it wraps validation failures alongside lookup misses, terminal
//! state rejections and collaborator failures.

use super::{
    Endpoint, InvalidMode, InvalidUserId, ReservationId, ReservationStatus, RouteId, TimeError,
    TransportMode, VehicleId,
};

/// Rejected user input. Each variant names the precondition that failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A location cannot be used as this endpoint for this mode
    #[error("incompatible location for {mode}: {location} cannot be used as {endpoint}")]
    IncompatibleLocation {
        mode: TransportMode,
        endpoint: Endpoint,
        location: String,
    },

    /// Origin and destination are the same place
    #[error("origin and destination must differ")]
    SameEndpoints,

    /// Passenger count outside the accepted range
    #[error("passenger count must be between 1 and {max}, got {requested}")]
    InvalidPassengers { requested: u32, max: u32 },

    /// A required field was empty or absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Date or time string could not be parsed
    #[error(transparent)]
    MalformedTime(#[from] TimeError),

    /// Transport mode string could not be parsed
    #[error(transparent)]
    UnknownMode(#[from] InvalidMode),

    /// User identifier was blank
    #[error(transparent)]
    InvalidUser(#[from] InvalidUserId),

    /// Round trip booked without a return date/time
    #[error("round-trip requires a return date/time")]
    MissingReturn,

    /// Return is not after departure
    #[error("return date/time must be after departure")]
    ReturnBeforeDeparture,

    /// Vehicle belongs to a different operator than the route
    #[error("vehicle {vehicle} is not operated on route {route}")]
    VehicleNotOnRoute { vehicle: VehicleId, route: RouteId },

    /// Status change not permitted by the reservation lifecycle
    #[error("cannot move reservation from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Status string could not be parsed
    #[error("{0}")]
    UnknownStatus(String),
}

/// Failure reported by a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Optimistic concurrency check failed
    #[error("reservation {id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        id: ReservationId,
        expected: u64,
        found: u64,
    },

    /// Record to update does not exist
    #[error("reservation {0} does not exist")]
    Missing(ReservationId),

    /// Backing store could not serve the request
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the core operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("unknown location: {0}")]
    LocationNotFound(String),

    #[error("reservation {id} is {status} and can no longer be changed")]
    TerminalState {
        id: ReservationId,
        status: ReservationStatus,
    },

    #[error("route {0} not found")]
    RouteNotFound(RouteId),

    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),

    #[error("reservation {0} not found")]
    ReservationNotFound(ReservationId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TimeError> for CoreError {
    fn from(e: TimeError) -> Self {
        CoreError::Validation(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_hhmm;

    #[test]
    fn error_display() {
        let err = ValidationError::IncompatibleLocation {
            mode: TransportMode::Metro,
            endpoint: Endpoint::Destination,
            location: "Sousse - Centre Ville".into(),
        };
        assert_eq!(
            err.to_string(),
            "incompatible location for Métro: Sousse - Centre Ville cannot be used as destination"
        );

        assert_eq!(
            ValidationError::MissingReturn.to_string(),
            "round-trip requires a return date/time"
        );

        let err = CoreError::TerminalState {
            id: ReservationId(5),
            status: ReservationStatus::Cancelled,
        };
        assert_eq!(
            err.to_string(),
            "reservation 5 is cancelled and can no longer be changed"
        );

        let err = CoreError::LocationNotFound("Atlantis".into());
        assert_eq!(err.to_string(), "unknown location: Atlantis");
    }

    #[test]
    fn time_errors_become_validation_errors() {
        let err: CoreError = parse_hhmm("9h").unwrap_err().into();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MalformedTime(_))
        ));
    }

    #[test]
    fn store_errors_pass_through() {
        let err: CoreError = StoreError::Unavailable("disk full".into()).into();
        assert_eq!(err.to_string(), "store unavailable: disk full");
    }
}
