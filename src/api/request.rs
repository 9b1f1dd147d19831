//! Request types for the Booking Scheduling Engine API.
//!
//! This module defines the JSON request structures for the booking,
//! series, alert, and event-stream endpoints.

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::Role;
use crate::scheduling::{BookingTemplate, Recurrence};

/// Request body for `POST /bookings` and `PUT /series/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// The staff member to book.
    pub staff_id: Uuid,
    /// The client the booking is for.
    pub client_id: Uuid,
    /// The service being delivered.
    pub service_id: Uuid,
    /// The start of the (first) booking slot.
    pub start_time: NaiveDateTime,
    /// The end of the (first) booking slot.
    pub end_time: NaiveDateTime,
    /// Notes copied to every created booking.
    #[serde(default)]
    pub notes: Option<String>,
    /// Optional weekly recurrence.
    #[serde(default)]
    pub recurrence: Option<RecurrenceRequest>,
}

impl CreateBookingRequest {
    /// Splits the request into the engine's template and recurrence types.
    pub fn into_parts(self) -> EngineResult<(BookingTemplate, Option<Recurrence>)> {
        let template = BookingTemplate {
            staff_id: self.staff_id,
            client_id: self.client_id,
            service_id: self.service_id,
            start_time: self.start_time,
            end_time: self.end_time,
            notes: self.notes,
        };
        let recurrence = self.recurrence.map(RecurrenceRequest::into_recurrence).transpose()?;
        Ok((template, recurrence))
    }
}

/// Weekly recurrence selection in a booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRequest {
    /// Weekday names ("monday", "tue", ...) to repeat on.
    pub weekdays: Vec<String>,
    /// How many additional weeks to repeat beyond the template's week.
    #[serde(default)]
    pub extra_weeks: u8,
}

impl RecurrenceRequest {
    fn into_recurrence(self) -> EngineResult<Recurrence> {
        let mut weekdays = Vec::with_capacity(self.weekdays.len());
        for name in &self.weekdays {
            let weekday: Weekday = name.parse().map_err(|_| EngineError::InvalidRecurrence {
                message: format!("unknown weekday name '{name}'"),
            })?;
            weekdays.push(weekday);
        }
        Ok(Recurrence {
            weekdays,
            extra_weeks: self.extra_weeks,
        })
    }
}

/// Request body for `POST /alerts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlertRequest {
    /// The start of the shift that needs covering.
    pub start_time: NaiveDateTime,
    /// The end of the shift that needs covering.
    pub end_time: NaiveDateTime,
    /// The service the shift delivers.
    pub service_id: Uuid,
    /// The client the shift is for.
    pub client_id: Uuid,
    /// Optional allow-list of staff who may claim the alert.
    #[serde(default)]
    pub target_staff: Vec<Uuid>,
}

/// Request body for `POST /bookings/{id}/convert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertBookingRequest {
    /// Optional allow-list of staff who may claim the resulting alert.
    #[serde(default)]
    pub target_staff: Vec<Uuid>,
}

/// Request body for `POST /alerts/{id}/claim`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// The staff member claiming the alert.
    pub staff_id: Uuid,
}

/// Request body for `POST /alerts/{id}/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRequest {
    /// The manager confirming the claim.
    pub manager_id: Uuid,
}

/// Request body for `POST /alerts/{id}/reject` and `POST /alerts/{id}/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// The manager resolving the alert.
    pub manager_id: Uuid,
    /// The reason recorded for audit. Must be non-empty.
    pub reason: String,
}

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStreamQuery {
    /// The id of the viewer requesting the stream.
    pub viewer_id: Uuid,
    /// The viewer's role.
    pub role: Role,
    /// The start of the requested date range.
    pub from: NaiveDateTime,
    /// The end of the requested date range.
    pub to: NaiveDateTime,
    /// Optional comma-separated staff ids narrowing a supervisory view.
    #[serde(default)]
    pub staff: Option<String>,
}

impl EventStreamQuery {
    /// Parses the optional comma-separated staff selection.
    pub fn staff_filter(&self) -> EngineResult<Option<Vec<Uuid>>> {
        let Some(raw) = self.staff.as_deref() else {
            return Ok(None);
        };
        let mut ids = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = part.parse().map_err(|_| EngineError::Validation {
                field: "staff".to_string(),
                message: format!("'{part}' is not a valid staff id"),
            })?;
            ids.push(id);
        }
        Ok(Some(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_request_parses_weekday_names() {
        let request = RecurrenceRequest {
            weekdays: vec!["monday".to_string(), "wed".to_string()],
            extra_weeks: 1,
        };
        let recurrence = request.into_recurrence().unwrap();
        assert_eq!(recurrence.weekdays, vec![Weekday::Mon, Weekday::Wed]);
        assert_eq!(recurrence.extra_weeks, 1);
    }

    #[test]
    fn test_unknown_weekday_name_is_invalid_recurrence() {
        let request = RecurrenceRequest {
            weekdays: vec!["someday".to_string()],
            extra_weeks: 0,
        };
        assert!(matches!(
            request.into_recurrence(),
            Err(EngineError::InvalidRecurrence { .. })
        ));
    }

    #[test]
    fn test_staff_filter_parses_comma_separated_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let query = EventStreamQuery {
            viewer_id: Uuid::new_v4(),
            role: Role::Manager,
            from: NaiveDateTime::parse_from_str("2026-03-02 00:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            to: NaiveDateTime::parse_from_str("2026-03-09 00:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            staff: Some(format!("{a}, {b}")),
        };
        assert_eq!(query.staff_filter().unwrap(), Some(vec![a, b]));
    }

    #[test]
    fn test_malformed_staff_filter_is_a_validation_error() {
        let query = EventStreamQuery {
            viewer_id: Uuid::new_v4(),
            role: Role::Manager,
            from: NaiveDateTime::parse_from_str("2026-03-02 00:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            to: NaiveDateTime::parse_from_str("2026-03-09 00:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            staff: Some("not-a-uuid".to_string()),
        };
        assert!(matches!(
            query.staff_filter(),
            Err(EngineError::Validation { .. })
        ));
    }
}
