//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Endpoint, Location, LocationKind, PaymentMethod, ReservationId, ReservationStatus, RouteId,
    ValidationError, VehicleId, parse_date_time,
};
use crate::reservation::{BookingRequest, ReservationEdit};

/// Query for candidate locations.
#[derive(Debug, Deserialize)]
pub struct LocationsQuery {
    /// Transport mode id or label; empty or absent means all modes
    pub mode: Option<String>,

    /// Which end of the trip the list is for (defaults to origin)
    pub role: Option<Endpoint>,
}

/// A location offered to the user.
#[derive(Debug, Serialize)]
pub struct LocationResult {
    pub name: String,
    pub kind: LocationKind,
    pub international: bool,
    pub lat: f64,
    pub lon: f64,
}

impl From<&Location> for LocationResult {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name().to_string(),
            kind: location.kind(),
            international: location.is_international(),
            lat: location.coordinates().lat,
            lon: location.coordinates().lon,
        }
    }
}

/// Candidate locations for a mode and endpoint.
#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub mode: String,
    pub role: Endpoint,
    pub locations: Vec<LocationResult>,
}

/// Query for a route search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,

    /// Transport mode id or label; empty or absent means all modes
    pub mode: Option<String>,

    /// Travel date, YYYY-MM-DD
    pub date: String,

    /// Departure time, HH:MM
    pub time: String,

    /// Number of travellers (defaults to 1)
    pub passengers: Option<u32>,
}

/// Parse an optional date/time pair; both halves or neither.
fn optional_date_time(
    date: Option<&str>,
    time: Option<&str>,
    date_field: &'static str,
    time_field: &'static str,
) -> Result<Option<NaiveDateTime>, ValidationError> {
    let date = date.map(str::trim).filter(|s| !s.is_empty());
    let time = time.map(str::trim).filter(|s| !s.is_empty());
    match (date, time) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(ValidationError::MissingField(time_field)),
        (None, Some(_)) => Err(ValidationError::MissingField(date_field)),
        (Some(date), Some(time)) => Ok(Some(parse_date_time(date, time)?)),
    }
}

/// Request to book a route.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub route_id: RouteId,
    pub vehicle_id: VehicleId,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub round_trip: bool,
    pub return_date: Option<String>,
    pub return_time: Option<String>,
    pub payment_method: PaymentMethod,
}

impl CreateReservationRequest {
    pub fn into_booking(self) -> Result<BookingRequest, ValidationError> {
        let departure = optional_date_time(
            Some(self.date.as_str()),
            Some(self.time.as_str()),
            "date",
            "time",
        )?
        .ok_or(ValidationError::MissingField("date"))?;
        let return_at = optional_date_time(
            self.return_date.as_deref(),
            self.return_time.as_deref(),
            "return_date",
            "return_time",
        )?;

        Ok(BookingRequest {
            route: self.route_id,
            vehicle: self.vehicle_id,
            departure,
            round_trip: self.round_trip,
            return_at,
            payment_method: self.payment_method,
        })
    }
}

/// Request to edit a booking. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct EditReservationRequest {
    pub route_id: Option<RouteId>,
    pub vehicle_id: Option<VehicleId>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub round_trip: Option<bool>,
    pub return_date: Option<String>,
    pub return_time: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<String>,
}

impl EditReservationRequest {
    pub fn into_edit(self) -> Result<ReservationEdit, ValidationError> {
        Ok(ReservationEdit {
            route: self.route_id,
            vehicle: self.vehicle_id,
            departure: optional_date_time(
                self.date.as_deref(),
                self.time.as_deref(),
                "date",
                "time",
            )?,
            round_trip: self.round_trip,
            return_at: optional_date_time(
                self.return_date.as_deref(),
                self.return_time.as_deref(),
                "return_date",
                "return_time",
            )?,
            payment_method: self.payment_method,
            status: self.status.as_deref().map(parse_status).transpose()?,
        })
    }
}

/// Request to change a booking's status.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub fn parse_status(s: &str) -> Result<ReservationStatus, ValidationError> {
    s.parse().map_err(ValidationError::UnknownStatus)
}

/// Response when a payment has been started.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub reservation_id: ReservationId,
    pub status: &'static str,
    pub settles_in_ms: u64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(json: &str) -> CreateReservationRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn create_request_parses_dates() {
        let booking = create_request(
            r#"{"route_id": 1, "vehicle_id": 2, "date": "2026-06-10", "time": "08:15",
                "round_trip": true, "return_date": "2026-06-12", "return_time": "18:00",
                "payment_method": "card"}"#,
        )
        .into_booking()
        .unwrap();

        assert_eq!(booking.route, RouteId(1));
        assert_eq!(booking.departure.to_string(), "2026-06-10 08:15:00");
        assert_eq!(
            booking.return_at.map(|t| t.to_string()),
            Some("2026-06-12 18:00:00".to_string())
        );
    }

    #[test]
    fn create_request_defaults_to_one_way() {
        let booking = create_request(
            r#"{"route_id": 1, "vehicle_id": 2, "date": "2026-06-10", "time": "08:15",
                "payment_method": "cash"}"#,
        )
        .into_booking()
        .unwrap();
        assert!(!booking.round_trip);
        assert_eq!(booking.return_at, None);
    }

    #[test]
    fn half_a_return_is_rejected() {
        let err = create_request(
            r#"{"route_id": 1, "vehicle_id": 2, "date": "2026-06-10", "time": "08:15",
                "round_trip": true, "return_date": "2026-06-12", "payment_method": "card"}"#,
        )
        .into_booking()
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("return_time"));
    }

    #[test]
    fn malformed_departure_is_rejected() {
        let err = create_request(
            r#"{"route_id": 1, "vehicle_id": 2, "date": "10/06/2026", "time": "08:15",
                "payment_method": "card"}"#,
        )
        .into_booking()
        .unwrap_err();
        assert!(matches!(err, ValidationError::MalformedTime(_)));
    }

    #[test]
    fn edit_request_keeps_absent_fields() {
        let edit = EditReservationRequest::default().into_edit().unwrap();
        assert_eq!(edit, ReservationEdit::default());

        let edit = EditReservationRequest {
            status: Some("Terminée".into()),
            round_trip: Some(false),
            ..Default::default()
        }
        .into_edit()
        .unwrap();
        assert_eq!(edit.status, Some(ReservationStatus::Completed));
        assert_eq!(edit.round_trip, Some(false));
    }

    #[test]
    fn unknown_status() {
        assert!(matches!(
            parse_status("shipped"),
            Err(ValidationError::UnknownStatus(_))
        ));
    }
}
