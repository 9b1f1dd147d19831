//! HTTP request handlers for the Booking Scheduling Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Interval, Viewer};

use super::request::{
    ClaimRequest, ConfirmRequest, ConvertBookingRequest, CreateAlertRequest, CreateBookingRequest,
    EventStreamQuery, ResolveRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/bookings", post(create_booking_handler))
        .route("/bookings/:id/cancel", post(cancel_booking_handler))
        .route("/bookings/:id/complete", post(complete_booking_handler))
        .route("/bookings/:id/convert", post(convert_booking_handler))
        .route("/series/:id", put(reschedule_series_handler))
        .route("/series/:id/cancel", post(cancel_series_handler))
        .route("/alerts", post(create_alert_handler))
        .route("/alerts/:id/claim", post(claim_alert_handler))
        .route("/alerts/:id/confirm", post(confirm_alert_handler))
        .route("/alerts/:id/reject", post(reject_alert_handler))
        .route("/alerts/:id/cancel", post(cancel_alert_handler))
        .route("/events", get(event_stream_handler))
        .with_state(state)
}

/// Converts an engine result into an HTTP response, logging failures
/// against the request's correlation id.
fn respond<T: Serialize>(correlation_id: Uuid, result: EngineResult<T>) -> Response {
    match result {
        Ok(value) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(value),
        )
            .into_response(),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Request failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for POST /bookings.
///
/// Accepts a booking request (single or recurring) and returns every
/// booking created, or a conflict report when any slot is unavailable.
async fn create_booking_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing booking request");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let result = request
        .into_parts()
        .and_then(|(template, recurrence)| state.engine().create_booking(&template, recurrence.as_ref()));
    respond(correlation_id, result)
}

/// Handler for POST /bookings/{id}/cancel.
async fn cancel_booking_handler(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %booking_id, "Cancelling booking");
    respond(correlation_id, state.engine().cancel_booking(booking_id))
}

/// Handler for POST /bookings/{id}/complete.
async fn complete_booking_handler(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %booking_id, "Completing booking");
    respond(correlation_id, state.engine().complete_booking(booking_id))
}

/// Handler for POST /bookings/{id}/convert.
///
/// Cancels the booking and raises an open alert over its slot.
async fn convert_booking_handler(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<ConvertBookingRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %booking_id, "Converting booking to alert");
    respond(
        correlation_id,
        state
            .engine()
            .convert_booking_to_alert(booking_id, request.target_staff),
    )
}

/// Handler for PUT /series/{id}.
///
/// Replaces every booking in the series from a new template and
/// recurrence.
async fn reschedule_series_handler(
    State(state): State<AppState>,
    Path(series_id): Path<Uuid>,
    Json(request): Json<CreateBookingRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %series_id, "Rescheduling series");
    let result = request.into_parts().and_then(|(template, recurrence)| {
        state
            .engine()
            .reschedule_series(series_id, &template, recurrence.as_ref())
    });
    respond(correlation_id, result)
}

/// Handler for POST /series/{id}/cancel.
async fn cancel_series_handler(
    State(state): State<AppState>,
    Path(series_id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %series_id, "Cancelling series");
    respond(correlation_id, state.engine().cancel_series(series_id))
}

/// Handler for POST /alerts.
async fn create_alert_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateAlertRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating alert");
    let result = Interval::new(request.start_time, request.end_time).and_then(|interval| {
        state.engine().create_alert(
            interval,
            request.service_id,
            request.client_id,
            request.target_staff,
        )
    });
    respond(correlation_id, result)
}

/// Handler for POST /alerts/{id}/claim.
async fn claim_alert_handler(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(request): Json<ClaimRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %alert_id, staff_id = %request.staff_id, "Claiming alert");
    respond(
        correlation_id,
        state.engine().claim_alert(alert_id, request.staff_id),
    )
}

/// Handler for POST /alerts/{id}/confirm.
///
/// Re-checks availability before the claim becomes a booking; a new
/// conflict since the claim surfaces as a 409 conflict report.
async fn confirm_alert_handler(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(request): Json<ConfirmRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %alert_id, manager_id = %request.manager_id, "Confirming alert");
    respond(
        correlation_id,
        state.engine().confirm_alert(alert_id, request.manager_id),
    )
}

/// Handler for POST /alerts/{id}/reject.
async fn reject_alert_handler(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(request): Json<ResolveRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %alert_id, manager_id = %request.manager_id, "Rejecting claim");
    respond(
        correlation_id,
        state
            .engine()
            .reject_alert(alert_id, request.manager_id, &request.reason),
    )
}

/// Handler for POST /alerts/{id}/cancel.
async fn cancel_alert_handler(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(request): Json<ResolveRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %alert_id, manager_id = %request.manager_id, "Cancelling alert");
    respond(
        correlation_id,
        state
            .engine()
            .cancel_alert(alert_id, request.manager_id, &request.reason),
    )
}

/// Handler for GET /events.
///
/// Returns the role-filtered calendar event stream over the requested
/// range.
async fn event_stream_handler(
    State(state): State<AppState>,
    Query(query): Query<EventStreamQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        viewer_id = %query.viewer_id,
        role = ?query.role,
        "Building event stream"
    );
    let viewer = Viewer {
        id: query.viewer_id,
        role: query.role,
    };
    let result = Interval::new(query.from, query.to).and_then(|range| {
        let staff_filter = query.staff_filter()?;
        state
            .engine()
            .event_stream(&viewer, &range, staff_filter.as_deref())
    });
    respond(correlation_id, result)
}
