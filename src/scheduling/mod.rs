//! Pure scheduling logic for the Booking Scheduling Engine.
//!
//! This module contains the side-effect-free half of the engine: the
//! recurrence expander, which turns a booking template into concrete
//! instances, and the availability checker, which detects collisions with
//! existing bookings and leave. Orchestration over a store lives in
//! [`crate::engine`].

mod conflicts;
mod recurrence;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use conflicts::{Candidate, Conflict, ConflictKind, ConflictReport, check_conflicts};
pub use recurrence::{Expansion, Recurrence, expand_recurrence};

/// The shared fields of one booking request: who, what, and the slot that
/// defines the time-of-day and duration of every expanded instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingTemplate {
    /// The staff member to book.
    pub staff_id: Uuid,
    /// The client the booking is for.
    pub client_id: Uuid,
    /// The service being delivered.
    pub service_id: Uuid,
    /// The template's start instant.
    pub start_time: NaiveDateTime,
    /// The template's end instant. `end_time - start_time` is the duration
    /// of every expanded instance.
    pub end_time: NaiveDateTime,
    /// Notes copied to every created booking.
    #[serde(default)]
    pub notes: Option<String>,
}
