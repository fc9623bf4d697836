//! Reservation lifecycle: booking, editing, payment, cancellation and
//! completion of trips on catalog routes.

mod lifecycle;
mod payment;
mod store;

pub use lifecycle::{BookingRequest, ReservationEdit, ReservationLifecycle};
pub use payment::{PaymentConfig, PaymentError, PaymentHandle};
pub use store::{InMemoryReservationStore, NewReservation, ReservationStore};
