//! Storage collaborator contract.
//!
//! Persistence is out of scope for the engine; this module defines what
//! the engine requires from whatever storage layer backs it: filtered
//! fetches, a conflict-guarded atomic multi-insert, a conditional update
//! keyed on id plus expected status (the storage equivalent of
//! compare-and-swap), and an atomic series rewrite under the same guard. [`MemoryStore`]
//! implements the contract in-process for tests and the API binary.

mod memory;

use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{AlertStatus, Booking, BookingAlert, BookingStatus, Interval, LeaveRequest};

pub use memory::MemoryStore;

/// The storage operations the scheduling engine depends on.
///
/// All fetches are bounded by a date range supplied by the caller; the
/// engine never scans unfiltered tables. Conditional updates must fail
/// explicitly (never overwrite) when the persisted status no longer
/// matches the expected one.
pub trait ScheduleStore: Send + Sync {
    /// Fetches bookings whose interval overlaps `range`, optionally
    /// narrowed to one staff member.
    fn bookings_in_range(
        &self,
        range: &Interval,
        staff_id: Option<Uuid>,
    ) -> EngineResult<Vec<Booking>>;

    /// Fetches all bookings sharing a series id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::SeriesNotFound`] when no
    /// booking carries the series id.
    fn bookings_in_series(&self, series_id: Uuid) -> EngineResult<Vec<Booking>>;

    /// Fetches one booking by id.
    fn booking(&self, id: Uuid) -> EngineResult<Booking>;

    /// Fetches leave requests whose (end-of-day normalized) range overlaps
    /// `range`, optionally narrowed to one staff member.
    fn leave_in_range(
        &self,
        range: &Interval,
        staff_id: Option<Uuid>,
    ) -> EngineResult<Vec<LeaveRequest>>;

    /// Fetches booking alerts whose interval overlaps `range`.
    fn alerts_in_range(&self, range: &Interval) -> EngineResult<Vec<BookingAlert>>;

    /// Fetches one alert by id.
    fn alert(&self, id: Uuid) -> EngineResult<BookingAlert>;

    /// Inserts a batch of bookings atomically: either every booking is
    /// persisted or none are.
    ///
    /// The no-double-booking precondition must be re-verified inside the
    /// same atomic scope as the write: the engine's conflict check and
    /// this insert are separate calls, so a concurrent writer may have
    /// persisted an overlapping booking between them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::Concurrency`] when any booking
    /// in the batch overlaps a non-cancelled booking already persisted for
    /// the same staff member.
    fn insert_bookings_if_clear(&self, bookings: &[Booking]) -> EngineResult<()>;

    /// Inserts a new booking alert.
    fn insert_alert(&self, alert: &BookingAlert) -> EngineResult<()>;

    /// Writes `updated` over the booking with the same id, but only if the
    /// persisted status still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::Concurrency`] when the
    /// persisted status has changed since the caller's read.
    fn update_booking_if_status(
        &self,
        expected: BookingStatus,
        updated: &Booking,
    ) -> EngineResult<Booking>;

    /// Writes `updated` over the alert with the same id, but only if the
    /// persisted status still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::Concurrency`] when the
    /// persisted status has changed since the caller's read.
    fn update_alert_if_status(
        &self,
        expected: AlertStatus,
        updated: &BookingAlert,
    ) -> EngineResult<BookingAlert>;

    /// Atomically replaces every booking sharing `series_id` with the
    /// provided set, under the same re-verified precondition as
    /// [`ScheduleStore::insert_bookings_if_clear`]: the replacements must
    /// not overlap any non-cancelled same-staff booking outside the series.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::SeriesNotFound`] when no
    /// booking carries the series id, and
    /// [`crate::error::EngineError::Concurrency`] when a replacement
    /// overlaps a booking outside the series.
    fn replace_series(&self, series_id: Uuid, bookings: &[Booking]) -> EngineResult<()>;
}
