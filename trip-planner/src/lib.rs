//! Trip planning, fare estimation and reservation core.
//!
//! Decides which transport modes may serve a pair of locations, prices
//! trips from great-circle distance, finds or synthesizes routes for a
//! search, and runs bookings through their lifecycle.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod eligibility;
pub mod fare;
pub mod geo;
pub mod notify;
pub mod reservation;
pub mod web;
