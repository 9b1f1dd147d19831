//! Booking model and status lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Interval;

/// The lifecycle status of a booking.
///
/// Only non-cancelled bookings participate in conflict checks: cancelling
/// a booking frees its slot without deleting the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// The booking is confirmed and in the future.
    Scheduled,
    /// The booking is currently underway.
    InProgress,
    /// The booking took place.
    Completed,
    /// The booking was cancelled; its slot no longer blocks the staff member.
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Scheduled => write!(f, "scheduled"),
            BookingStatus::InProgress => write!(f, "in_progress"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A scheduled appointment between one staff member, one client, and one
/// service at a fixed interval.
///
/// Invariant (maintained by the scheduling pipeline, verified by the
/// availability checker): a non-cancelled booking for a given `staff_id`
/// never overlaps any other non-cancelled booking for the same `staff_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier for the booking.
    pub id: Uuid,
    /// The staff member assigned to the booking.
    pub staff_id: Uuid,
    /// The client the booking is for.
    pub client_id: Uuid,
    /// The service being delivered.
    pub service_id: Uuid,
    /// The booked time slot.
    pub interval: Interval,
    /// The lifecycle status of the booking.
    pub status: BookingStatus,
    /// Groups instances created by one recurring request; `None` for
    /// bookings created singly.
    #[serde(default)]
    pub series_id: Option<Uuid>,
    /// Free-form notes attached to the booking.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Booking {
    /// Returns true iff this booking blocks the staff member's schedule,
    /// i.e. it should participate in conflict checks.
    pub fn blocks_schedule(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}
