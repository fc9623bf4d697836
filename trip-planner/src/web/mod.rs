//! Web layer for the trip planner.
//!
//! Provides JSON endpoints for location lists, route search and the
//! reservation lifecycle.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, ORGANISATION_HEADER, USER_HEADER, create_router};
pub use state::{AppState, CatalogStore, Lifecycle};
