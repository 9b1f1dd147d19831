//! HTTP API module for the Booking Scheduling Engine.
//!
//! This module provides the REST API endpoints for creating bookings,
//! managing booking alerts, and reading the aggregated event stream.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ClaimRequest, ConfirmRequest, ConvertBookingRequest, CreateAlertRequest, CreateBookingRequest,
    EventStreamQuery, RecurrenceRequest, ResolveRequest,
};
pub use response::ApiError;
pub use state::AppState;
