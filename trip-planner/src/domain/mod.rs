//! Domain types for the trip planner.
//!
//! This module contains the value types shared by every component:
//! locations, transport modes, routes, reservations and the error
//! taxonomy. Types validate their input at construction time.

mod error;
mod ids;
mod location;
mod mode;
mod reservation;
mod route;
mod time;

pub use error::{CoreError, StoreError, ValidationError};
pub use ids::{InvalidUserId, OrganisationId, ReservationId, RouteId, Session, UserId, VehicleId};
pub use location::{Coordinates, Endpoint, Location, LocationKind};
pub use mode::{InvalidMode, ModeFactors, ModeFilter, TransportMode};
pub use reservation::{PaymentMethod, Reservation, ReservationStatus};
pub use route::{CatalogRoute, Operator, Route, RouteDetails, RouteType, Vehicle};
pub use time::{TimeError, parse_date, parse_date_time, parse_hhmm};

/// Round an amount to one decimal place.
///
/// All distances and prices are reported at this precision.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
