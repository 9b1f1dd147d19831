//! Booking creation and series operations.
//!
//! Expansion, conflict check, and persistence for one booking request are
//! a single logical transaction: either every expanded instance is
//! created or none are. Series-wide edits and cancellations run through
//! the same conflict-check pipeline as creation, preserving the
//! no-double-booking invariant.

use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AlertStatus, Booking, BookingAlert, BookingStatus, Interval};
use crate::scheduling::{
    BookingTemplate, Candidate, Expansion, Recurrence, check_conflicts, expand_recurrence,
};
use crate::store::ScheduleStore;

use super::BookingEngine;

impl BookingEngine {
    /// Creates one booking, or a series of bookings when a recurrence is
    /// requested.
    ///
    /// All candidates are validated against the staff member's existing
    /// non-cancelled bookings and pending/approved leave before anything
    /// is persisted; a single conflict rejects the whole batch.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidRecurrence`] / [`EngineError::InvalidInterval`]
    ///   for malformed input;
    /// - [`EngineError::Conflict`] when any candidate collides with an
    ///   existing commitment;
    /// - [`EngineError::Concurrency`] when a concurrent writer filled an
    ///   overlapping slot between the conflict check and the write.
    pub fn create_booking(
        &self,
        template: &BookingTemplate,
        recurrence: Option<&Recurrence>,
    ) -> EngineResult<Vec<Booking>> {
        let expansion = expand_recurrence(template, recurrence, self.policy())?;
        self.check_expansion(template, &expansion, None)?;

        let bookings = materialize(template, &expansion, expansion.series_id);
        // The conflict check above ran outside the store's atomic scope;
        // the guarded insert re-verifies it at the point of mutation so
        // two racing requests cannot both persist.
        self.store().insert_bookings_if_clear(&bookings)?;

        info!(
            staff_id = %template.staff_id,
            count = bookings.len(),
            series_id = ?expansion.series_id,
            "created booking(s)"
        );
        Ok(bookings)
    }

    /// Rewrites every booking in a series from a new template and
    /// recurrence, through the same expansion and conflict-check pipeline
    /// as creation. The series keeps its id; the old instances are
    /// replaced atomically.
    pub fn reschedule_series(
        &self,
        series_id: Uuid,
        template: &BookingTemplate,
        recurrence: Option<&Recurrence>,
    ) -> EngineResult<Vec<Booking>> {
        // Confirms the series exists before any further work.
        self.store().bookings_in_series(series_id)?;

        let expansion = expand_recurrence(template, recurrence, self.policy())?;
        // The series' own bookings must not count as conflicts against
        // their replacements.
        self.check_expansion(template, &expansion, Some(series_id))?;

        let bookings = materialize(template, &expansion, Some(series_id));
        self.store().replace_series(series_id, &bookings)?;

        info!(
            %series_id,
            staff_id = %template.staff_id,
            count = bookings.len(),
            "rescheduled series"
        );
        Ok(bookings)
    }

    /// Soft-cancels every non-cancelled booking in a series.
    pub fn cancel_series(&self, series_id: Uuid) -> EngineResult<Vec<Booking>> {
        let mut bookings = self.store().bookings_in_series(series_id)?;
        for booking in &mut bookings {
            if booking.blocks_schedule() {
                booking.status = BookingStatus::Cancelled;
            }
        }
        self.store().replace_series(series_id, &bookings)?;

        info!(%series_id, count = bookings.len(), "cancelled series");
        Ok(bookings)
    }

    /// Soft-cancels one booking, freeing its slot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StateTransition`] when the booking is
    /// already cancelled.
    pub fn cancel_booking(&self, booking_id: Uuid) -> EngineResult<Booking> {
        let booking = self.store().booking(booking_id)?;
        if !booking.blocks_schedule() {
            return Err(transition_error(&booking, "cancel"));
        }
        let mut updated = booking.clone();
        updated.status = BookingStatus::Cancelled;
        let updated = self
            .store()
            .update_booking_if_status(booking.status, &updated)?;

        info!(booking_id = %updated.id, "cancelled booking");
        Ok(updated)
    }

    /// Marks a scheduled or in-progress booking as completed.
    pub fn complete_booking(&self, booking_id: Uuid) -> EngineResult<Booking> {
        let booking = self.store().booking(booking_id)?;
        if !matches!(
            booking.status,
            BookingStatus::Scheduled | BookingStatus::InProgress
        ) {
            return Err(transition_error(&booking, "complete"));
        }
        let mut updated = booking.clone();
        updated.status = BookingStatus::Completed;
        let updated = self
            .store()
            .update_booking_if_status(booking.status, &updated)?;
        Ok(updated)
    }

    /// Converts an existing booking into an open alert: the source booking
    /// is cancelled and a new alert carrying its slot, service, and client
    /// is opened for a replacement staff member.
    ///
    /// `target_staff` optionally restricts who may claim the alert.
    pub fn convert_booking_to_alert(
        &self,
        booking_id: Uuid,
        target_staff: Vec<Uuid>,
    ) -> EngineResult<BookingAlert> {
        let booking = self.store().booking(booking_id)?;
        if !booking.blocks_schedule() {
            return Err(transition_error(&booking, "convert"));
        }

        let mut cancelled = booking.clone();
        cancelled.status = BookingStatus::Cancelled;
        self.store()
            .update_booking_if_status(booking.status, &cancelled)?;

        let alert = BookingAlert {
            id: Uuid::new_v4(),
            interval: booking.interval,
            service_id: booking.service_id,
            client_id: booking.client_id,
            target_staff,
            status: AlertStatus::Open,
            claimed_by: None,
            original_booking_id: Some(booking.id),
            resolution_reason: None,
        };
        self.store().insert_alert(&alert)?;

        info!(
            booking_id = %booking.id,
            alert_id = %alert.id,
            "converted booking to alert"
        );
        Ok(alert)
    }

    /// Creates an open alert directly (a manager posting a shift that was
    /// never booked).
    pub fn create_alert(
        &self,
        interval: Interval,
        service_id: Uuid,
        client_id: Uuid,
        target_staff: Vec<Uuid>,
    ) -> EngineResult<BookingAlert> {
        let alert = BookingAlert {
            id: Uuid::new_v4(),
            interval,
            service_id,
            client_id,
            target_staff,
            status: AlertStatus::Open,
            claimed_by: None,
            original_booking_id: None,
            resolution_reason: None,
        };
        self.store().insert_alert(&alert)?;
        info!(alert_id = %alert.id, "created alert");
        Ok(alert)
    }

    /// Runs the availability checker for every interval in an expansion,
    /// against the staff member's commitments fetched over the covered
    /// range. `exclude_series` drops that series' own bookings from the
    /// comparison set.
    fn check_expansion(
        &self,
        template: &BookingTemplate,
        expansion: &Expansion,
        exclude_series: Option<Uuid>,
    ) -> EngineResult<()> {
        let Some(covered) = expansion.covered_range() else {
            return Err(EngineError::InvalidRecurrence {
                message: "expansion produced no instances".to_string(),
            });
        };

        let existing: Vec<_> = self
            .store()
            .bookings_in_range(&covered, Some(template.staff_id))?
            .into_iter()
            .filter(|b| exclude_series.is_none() || b.series_id != exclude_series)
            .collect();
        let leave = self
            .store()
            .leave_in_range(&covered, Some(template.staff_id))?;

        let candidates: Vec<Candidate> = expansion
            .intervals
            .iter()
            .map(|interval| Candidate {
                staff_id: template.staff_id,
                interval: *interval,
            })
            .collect();

        let report = check_conflicts(&candidates, &existing, &leave);
        if report.is_clear() {
            Ok(())
        } else {
            Err(EngineError::Conflict { report })
        }
    }
}

fn materialize(
    template: &BookingTemplate,
    expansion: &Expansion,
    series_id: Option<Uuid>,
) -> Vec<Booking> {
    expansion
        .intervals
        .iter()
        .map(|interval| Booking {
            id: Uuid::new_v4(),
            staff_id: template.staff_id,
            client_id: template.client_id,
            service_id: template.service_id,
            interval: *interval,
            status: BookingStatus::Scheduled,
            series_id,
            notes: template.notes.clone(),
        })
        .collect()
}

fn transition_error(booking: &Booking, action: &str) -> EngineError {
    EngineError::StateTransition {
        entity: "booking".to_string(),
        id: booking.id,
        status: booking.status.to_string(),
        action: action.to_string(),
    }
}
