//! Reservation lifecycle.
//!
//! ```text
//! create ─► Pending ──pay──► Confirmed ──status──► Completed
//!              │                 │
//!              └──────cancel─────┴──────────────► Cancelled
//! ```
//!
//! Completed and Cancelled are terminal: every mutating operation on a
//! terminal reservation fails with `CoreError::TerminalState` and leaves
//! the stored record untouched. The charged price is recomputed from the
//! fare formulas whenever a booking is created or edited.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::catalog::RouteStore;
use crate::domain::{
    CatalogRoute, CoreError, PaymentMethod, Reservation, ReservationId, ReservationStatus,
    RouteId, Session, ValidationError, Vehicle, VehicleId,
};
use crate::fare::FareEstimator;
use crate::notify::{NotificationKind, Notifier, send_or_log};

use super::payment::{PaymentConfig, PaymentHandle};
use super::store::{NewReservation, ReservationStore};

/// Input for a new booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub route: RouteId,
    pub vehicle: VehicleId,
    pub departure: NaiveDateTime,
    pub round_trip: bool,
    pub return_at: Option<NaiveDateTime>,
    pub payment_method: PaymentMethod,
}

/// Changes to an existing booking. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationEdit {
    pub route: Option<RouteId>,
    pub vehicle: Option<VehicleId>,
    pub departure: Option<NaiveDateTime>,
    pub round_trip: Option<bool>,
    pub return_at: Option<NaiveDateTime>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<ReservationStatus>,
}

/// Check the trip shape and normalise the return date/time.
///
/// A round trip needs a return strictly after departure; a one-way trip
/// never keeps one.
fn check_trip(
    departure: NaiveDateTime,
    round_trip: bool,
    return_at: Option<NaiveDateTime>,
) -> Result<Option<NaiveDateTime>, ValidationError> {
    if !round_trip {
        return Ok(None);
    }
    match return_at {
        None => Err(ValidationError::MissingReturn),
        Some(ret) if ret <= departure => Err(ValidationError::ReturnBeforeDeparture),
        Some(ret) => Ok(Some(ret)),
    }
}

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn guard_open(reservation: &Reservation) -> Result<(), CoreError> {
    if reservation.is_terminal() {
        return Err(CoreError::TerminalState {
            id: reservation.id,
            status: reservation.status,
        });
    }
    Ok(())
}

fn payload(reservation: &Reservation) -> serde_json::Value {
    serde_json::to_value(reservation).unwrap_or_default()
}

/// Booking operations over a route catalog and a reservation store.
pub struct ReservationLifecycle<R, S, N> {
    routes: Arc<R>,
    reservations: Arc<S>,
    fares: Arc<FareEstimator>,
    notifier: Arc<N>,
    payment: PaymentConfig,
}

impl<R, S, N> Clone for ReservationLifecycle<R, S, N> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
            reservations: self.reservations.clone(),
            fares: self.fares.clone(),
            notifier: self.notifier.clone(),
            payment: self.payment.clone(),
        }
    }
}

impl<R: RouteStore, S: ReservationStore, N: Notifier> ReservationLifecycle<R, S, N> {
    pub fn new(
        routes: Arc<R>,
        reservations: Arc<S>,
        fares: Arc<FareEstimator>,
        notifier: Arc<N>,
        payment: PaymentConfig,
    ) -> Self {
        Self {
            routes,
            reservations,
            fares,
            notifier,
            payment,
        }
    }

    pub fn reservations(&self) -> &S {
        &self.reservations
    }

    /// Book a persisted route.
    ///
    /// Card and cash bookings start Pending and unpaid; prepaid bookings
    /// are settled on the spot and start Confirmed.
    pub async fn create(
        &self,
        session: &Session,
        request: BookingRequest,
    ) -> Result<Reservation, CoreError> {
        let return_at = check_trip(request.departure, request.round_trip, request.return_at)?;
        let (route, vehicle) = self.booking_pair(request.route, request.vehicle).await?;
        let fare = self.fares.estimate_booking(
            route.details.distance_km,
            route.details.mode,
            request.round_trip,
            vehicle.kind,
        );

        let prepaid = request.payment_method.settles_at_booking();
        let reservation = self
            .reservations
            .insert(NewReservation {
                user: session.user.clone(),
                route: route.id,
                vehicle: vehicle.id,
                departure: request.departure,
                round_trip: request.round_trip,
                return_at,
                price: fare.price,
                paid: prepaid,
                payment_method: request.payment_method,
                status: if prepaid {
                    ReservationStatus::Confirmed
                } else {
                    ReservationStatus::Pending
                },
                created_at: now(),
            })
            .await?;

        info!(
            reservation = %reservation.id,
            user = %reservation.user,
            route = %reservation.route,
            price = reservation.price,
            status = %reservation.status,
            "Reservation created"
        );
        send_or_log(
            self.notifier.as_ref(),
            NotificationKind::BookingConfirmation,
            &reservation.user,
            payload(&reservation),
        );
        Ok(reservation)
    }

    /// Change an open reservation and recompute its price.
    ///
    /// The status only changes when the edit names one, and then only
    /// along a permitted transition.
    pub async fn edit(
        &self,
        session: &Session,
        id: ReservationId,
        edit: ReservationEdit,
    ) -> Result<Reservation, CoreError> {
        let mut reservation = self.get(session, id).await?;
        guard_open(&reservation)?;

        let departure = edit.departure.unwrap_or(reservation.departure);
        let round_trip = edit.round_trip.unwrap_or(reservation.round_trip);
        let return_at = check_trip(departure, round_trip, edit.return_at.or(reservation.return_at))?;

        let previous_status = reservation.status;
        if let Some(status) = edit.status.filter(|&s| s != previous_status) {
            if !previous_status.can_transition_to(status) {
                return Err(ValidationError::InvalidTransition {
                    from: previous_status,
                    to: status,
                }
                .into());
            }
            reservation.status = status;
        }

        let (route, vehicle) = self
            .booking_pair(
                edit.route.unwrap_or(reservation.route),
                edit.vehicle.unwrap_or(reservation.vehicle),
            )
            .await?;
        let fare = self.fares.estimate_booking(
            route.details.distance_km,
            route.details.mode,
            round_trip,
            vehicle.kind,
        );

        reservation.route = route.id;
        reservation.vehicle = vehicle.id;
        reservation.departure = departure;
        reservation.round_trip = round_trip;
        reservation.return_at = return_at;
        reservation.price = fare.price;
        if let Some(method) = edit.payment_method {
            reservation.payment_method = method;
        }
        reservation.updated_at = now();

        let updated = self.reservations.update(reservation).await?;
        info!(
            reservation = %updated.id,
            price = updated.price,
            status = %updated.status,
            "Reservation edited"
        );
        if updated.status != previous_status {
            send_or_log(
                self.notifier.as_ref(),
                NotificationKind::StatusChange,
                &updated.user,
                payload(&updated),
            );
        }
        Ok(updated)
    }

    /// Cancel an open reservation.
    pub async fn cancel(
        &self,
        session: &Session,
        id: ReservationId,
    ) -> Result<Reservation, CoreError> {
        let mut reservation = self.get(session, id).await?;
        guard_open(&reservation)?;

        reservation.status = ReservationStatus::Cancelled;
        reservation.updated_at = now();
        let updated = self.reservations.update(reservation).await?;

        info!(reservation = %updated.id, "Reservation cancelled");
        send_or_log(
            self.notifier.as_ref(),
            NotificationKind::Cancellation,
            &updated.user,
            payload(&updated),
        );
        Ok(updated)
    }

    /// Administrative status change.
    ///
    /// Allowed for the reservation's owner and for staff of the
    /// organisation that runs the booked route.
    pub async fn change_status(
        &self,
        session: &Session,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation, CoreError> {
        let mut reservation = self.load_for_staff(session, id).await?;
        guard_open(&reservation)?;
        if reservation.status == status {
            debug!(reservation = %id, %status, "Status unchanged");
            return Ok(reservation);
        }
        if !reservation.status.can_transition_to(status) {
            return Err(ValidationError::InvalidTransition {
                from: reservation.status,
                to: status,
            }
            .into());
        }

        let previous = reservation.status;
        reservation.status = status;
        reservation.updated_at = now();
        let updated = self.reservations.update(reservation).await?;

        info!(
            reservation = %updated.id,
            from = %previous,
            to = %updated.status,
            "Reservation status changed"
        );
        send_or_log(
            self.notifier.as_ref(),
            NotificationKind::StatusChange,
            &updated.user,
            payload(&updated),
        );
        Ok(updated)
    }

    /// Record a successful payment: the reservation becomes Confirmed and
    /// paid. Paying an already paid reservation changes nothing.
    pub async fn confirm_payment(&self, id: ReservationId) -> Result<Reservation, CoreError> {
        let mut reservation = self
            .reservations
            .get(id)
            .await?
            .ok_or(CoreError::ReservationNotFound(id))?;
        guard_open(&reservation)?;
        if reservation.paid {
            debug!(reservation = %id, "Reservation already paid");
            return Ok(reservation);
        }

        reservation.paid = true;
        reservation.status = ReservationStatus::Confirmed;
        reservation.updated_at = now();
        let updated = self.reservations.update(reservation).await?;

        info!(reservation = %updated.id, price = updated.price, "Payment confirmed");
        send_or_log(
            self.notifier.as_ref(),
            NotificationKind::PaymentReceipt,
            &updated.user,
            payload(&updated),
        );
        Ok(updated)
    }

    /// A reservation owned by the session user.
    ///
    /// Reservations of other users are reported as not found.
    pub async fn get(&self, session: &Session, id: ReservationId) -> Result<Reservation, CoreError> {
        self.reservations
            .get(id)
            .await?
            .filter(|r| r.user == session.user)
            .ok_or(CoreError::ReservationNotFound(id))
    }

    /// Every reservation of the session user, oldest first.
    pub async fn list_for_user(&self, session: &Session) -> Result<Vec<Reservation>, CoreError> {
        Ok(self.reservations.list_for_user(&session.user).await?)
    }

    async fn load_for_staff(
        &self,
        session: &Session,
        id: ReservationId,
    ) -> Result<Reservation, CoreError> {
        let reservation = self
            .reservations
            .get(id)
            .await?
            .ok_or(CoreError::ReservationNotFound(id))?;
        if reservation.user == session.user {
            return Ok(reservation);
        }

        let Some(organisation) = session.organisation else {
            return Err(CoreError::ReservationNotFound(id));
        };
        match self.routes.route(reservation.route).await? {
            Some(route) if route.organisation == organisation => Ok(reservation),
            _ => Err(CoreError::ReservationNotFound(id)),
        }
    }

    /// Fetch a route and a vehicle that belong to the same organisation.
    async fn booking_pair(
        &self,
        route: RouteId,
        vehicle: VehicleId,
    ) -> Result<(CatalogRoute, Vehicle), CoreError> {
        let (route_rec, vehicle_rec) =
            futures::try_join!(self.routes.route(route), self.routes.vehicle(vehicle))?;
        let route_rec = route_rec.ok_or(CoreError::RouteNotFound(route))?;
        let vehicle_rec = vehicle_rec.ok_or(CoreError::VehicleNotFound(vehicle))?;
        if vehicle_rec.organisation != route_rec.organisation {
            return Err(ValidationError::VehicleNotOnRoute { vehicle, route }.into());
        }
        Ok((route_rec, vehicle_rec))
    }
}

impl<R, S, N> ReservationLifecycle<R, S, N>
where
    R: RouteStore + 'static,
    S: ReservationStore + 'static,
    N: Notifier + 'static,
{
    /// Start paying for an open reservation.
    ///
    /// The reservation is confirmed when the returned handle's delay
    /// elapses. Aborting the handle first leaves it unchanged.
    pub async fn start_payment(
        &self,
        session: &Session,
        id: ReservationId,
    ) -> Result<PaymentHandle, CoreError> {
        let reservation = self.get(session, id).await?;
        guard_open(&reservation)?;

        let lifecycle = self.clone();
        Ok(PaymentHandle::spawn(id, self.payment.delay, async move {
            lifecycle.confirm_payment(id).await
        }))
    }
}
