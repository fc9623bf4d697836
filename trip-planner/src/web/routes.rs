//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, warn};

use crate::catalog::{SearchOutcome, SearchRequest};
use crate::domain::{
    CoreError, Endpoint, ModeFilter, OrganisationId, Reservation, ReservationId, Session,
    StoreError, UserId, ValidationError,
};
use crate::eligibility::ModeEligibility;

use super::dto::*;
use super::state::AppState;

/// Header carrying the authenticated user id.
pub const USER_HEADER: &str = "x-user-id";

/// Header carrying the organisation a staff user acts for.
pub const ORGANISATION_HEADER: &str = "x-organisation-id";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/locations", get(list_locations))
        .route("/api/routes/search", get(search_routes))
        .route(
            "/api/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route(
            "/api/reservations/:id",
            get(get_reservation).patch(edit_reservation),
        )
        .route("/api/reservations/:id/cancel", post(cancel_reservation))
        .route("/api/reservations/:id/status", post(change_status))
        .route("/api/reservations/:id/pay", post(start_payment))
        .with_state(state)
}

/// Build the caller's session from request headers.
fn session(headers: &HeaderMap) -> Result<Session, AppError> {
    let user = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ValidationError::MissingField(USER_HEADER))?;
    let user = UserId::new(user).map_err(ValidationError::from)?;

    let organisation = headers
        .get(ORGANISATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.trim().parse::<u64>().map(OrganisationId).map_err(|_| AppError::BadRequest {
                message: format!("invalid {ORGANISATION_HEADER}: {v}"),
            })
        })
        .transpose()?;

    Ok(Session { user, organisation })
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Locations selectable for a mode and trip end.
async fn list_locations(
    State(state): State<AppState>,
    Query(req): Query<LocationsQuery>,
) -> Result<Json<LocationsResponse>, AppError> {
    let mode: ModeFilter = req
        .mode
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(ValidationError::from)?;
    let role = req.role.unwrap_or(Endpoint::Origin);

    let locations = ModeEligibility::new(&state.geo)
        .candidate_locations(mode, role)
        .into_iter()
        .map(LocationResult::from)
        .collect();

    Ok(Json(LocationsResponse {
        mode: mode.to_string(),
        role,
        locations,
    }))
}

/// Search routes between two locations.
async fn search_routes(
    State(state): State<AppState>,
    Query(req): Query<SearchQuery>,
) -> Result<Json<SearchOutcome>, AppError> {
    let request = SearchRequest::parse(
        &req.origin,
        &req.destination,
        req.mode.as_deref().unwrap_or_default(),
        &req.date,
        &req.time,
        req.passengers.unwrap_or(1),
    )?;
    let outcome = state.resolver().search(&request).await?;
    Ok(Json(outcome))
}

/// The caller's reservations.
async fn list_reservations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let session = session(&headers)?;
    Ok(Json(state.lifecycle.list_for_user(&session).await?))
}

/// Book a route.
async fn create_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let session = session(&headers)?;
    let reservation = state
        .lifecycle
        .create(&session, req.into_booking()?)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn get_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Reservation>, AppError> {
    let session = session(&headers)?;
    Ok(Json(state.lifecycle.get(&session, ReservationId(id)).await?))
}

async fn edit_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<EditReservationRequest>,
) -> Result<Json<Reservation>, AppError> {
    let session = session(&headers)?;
    let edit = req.into_edit()?;
    Ok(Json(
        state
            .lifecycle
            .edit(&session, ReservationId(id), edit)
            .await?,
    ))
}

/// Cancel a reservation, stopping any payment still in flight.
async fn cancel_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Reservation>, AppError> {
    let session = session(&headers)?;
    let id = ReservationId(id);
    let reservation = state.lifecycle.cancel(&session, id).await?;
    state.abort_payment(id);
    Ok(Json(reservation))
}

async fn change_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Reservation>, AppError> {
    let session = session(&headers)?;
    let status = parse_status(&req.status)?;
    Ok(Json(
        state
            .lifecycle
            .change_status(&session, ReservationId(id), status)
            .await?,
    ))
}

/// Start a simulated payment; the reservation is confirmed once it
/// settles.
async fn start_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    let session = session(&headers)?;
    let id = ReservationId(id);
    let handle = state.lifecycle.start_payment(&session, id).await?;
    state.track_payment(handle);

    Ok((
        StatusCode::ACCEPTED,
        Json(PaymentResponse {
            reservation_id: id,
            status: "processing",
            settles_in_ms: state.payment.delay.as_millis() as u64,
        }),
    ))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        let message = e.to_string();
        match e {
            CoreError::Validation(_) => AppError::BadRequest { message },
            CoreError::LocationNotFound(_)
            | CoreError::RouteNotFound(_)
            | CoreError::VehicleNotFound(_)
            | CoreError::ReservationNotFound(_)
            | CoreError::Store(StoreError::Missing(_)) => AppError::NotFound { message },
            CoreError::TerminalState { .. } | CoreError::Store(StoreError::Conflict { .. }) => {
                AppError::Conflict { message }
            }
            CoreError::Store(StoreError::Unavailable(_)) => AppError::Internal { message },
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, message = self.message(), "Request failed");
        } else {
            warn!(%status, message = self.message(), "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
