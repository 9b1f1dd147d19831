//! Error types for the Booking Scheduling Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while scheduling bookings and
//! resolving booking alerts.

use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use crate::scheduling::ConflictReport;

/// The main error type for the Booking Scheduling Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application. Nothing in
/// this engine is fatal at the process level: every variant describes a
/// per-request failure the caller can recover from.
///
/// # Example
///
/// ```
/// use booking_engine::error::EngineError;
/// use uuid::Uuid;
///
/// let id = Uuid::nil();
/// let error = EngineError::AlertNotFound { id };
/// assert_eq!(
///     error.to_string(),
///     format!("Booking alert not found: {id}")
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An interval was constructed with a start that is not before its end.
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        /// The offending start instant.
        start: NaiveDateTime,
        /// The offending end instant.
        end: NaiveDateTime,
    },

    /// A recurrence request was malformed (e.g., no weekdays selected while
    /// recurrence is enabled, or a weekday/week count outside policy bounds).
    #[error("Invalid recurrence: {message}")]
    InvalidRecurrence {
        /// A description of what made the recurrence invalid.
        message: String,
    },

    /// A request field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// One or more candidate intervals overlap an existing commitment.
    ///
    /// Carries the full [`ConflictReport`] so callers can surface which
    /// staff member, interval, and conflict kind blocked the request.
    #[error("Scheduling conflict: {report}")]
    Conflict {
        /// The conflicts that blocked the request.
        report: ConflictReport,
    },

    /// A transition was attempted from a status that does not permit it.
    #[error("Cannot {action} {entity} {id} in status '{status}'")]
    StateTransition {
        /// The kind of entity the transition was attempted on.
        entity: String,
        /// The entity the transition was attempted on.
        id: Uuid,
        /// The status the entity was in when the transition was attempted.
        status: String,
        /// The transition that was attempted (claim, confirm, reject,
        /// cancel, complete).
        action: String,
    },

    /// An optimistic precondition failed: the entity changed between the
    /// read and the conditional write. The caller should refresh and retry.
    #[error("Concurrent modification of {entity} {id}: refresh and retry")]
    Concurrency {
        /// The kind of entity that changed (e.g. "alert", "booking").
        entity: String,
        /// The id of the entity that changed.
        id: Uuid,
    },

    /// No booking alert exists with the given id.
    #[error("Booking alert not found: {id}")]
    AlertNotFound {
        /// The alert id that was not found.
        id: Uuid,
    },

    /// No booking exists with the given id.
    #[error("Booking not found: {id}")]
    BookingNotFound {
        /// The booking id that was not found.
        id: Uuid,
    },

    /// No bookings share the given series id.
    #[error("Booking series not found: {id}")]
    SeriesNotFound {
        /// The series id that was not found.
        id: Uuid,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
