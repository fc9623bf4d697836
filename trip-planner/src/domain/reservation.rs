//! Reservation records and their status machine.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ReservationId, RouteId, UserId, VehicleId};

/// Lifecycle status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Completed and cancelled reservations never change again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled
        )
    }

    /// Whether the status machine allows moving from `self` to `next`.
    ///
    /// Every non-terminal status may move to any status except back to
    /// `Pending`; terminal statuses allow nothing.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        !self.is_terminal() && next != ReservationStatus::Pending
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        })
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "en attente" => Ok(ReservationStatus::Pending),
            "confirmed" | "confirmée" => Ok(ReservationStatus::Confirmed),
            "completed" | "terminée" => Ok(ReservationStatus::Completed),
            "cancelled" | "canceled" | "annulée" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// How the traveller pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online card payment, settled asynchronously after booking.
    Card,
    /// Paid in cash on boarding.
    Cash,
    /// Already settled when the booking is made (voucher, account credit).
    Prepaid,
}

impl PaymentMethod {
    /// Whether payment is complete the moment the booking is created.
    pub fn settles_at_booking(self) -> bool {
        matches!(self, PaymentMethod::Prepaid)
    }
}

/// A user's booking of a catalog route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub user: UserId,
    pub route: RouteId,
    pub vehicle: VehicleId,
    pub departure: NaiveDateTime,
    pub round_trip: bool,
    pub return_at: Option<NaiveDateTime>,
    /// Charged price in DT, fixed by the last fare computation.
    pub price: f64,
    pub paid: bool,
    pub payment_method: PaymentMethod,
    pub status: ReservationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Incremented on every stored update.
    pub version: u64,
}

impl Reservation {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
