//! The booking alert state machine.
//!
//! Canonical transitions: `open -> pending_confirmation` on claim,
//! `pending_confirmation -> confirmed` (creating a booking) or back to
//! `open` on reject, and `open | claimed | pending_confirmation ->
//! cancelled`. Every write is conditioned on the status read immediately
//! before it: two staff members racing to claim the same alert produce
//! exactly one winner, and the loser is told to refresh and retry.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AlertStatus, Booking, BookingAlert, BookingStatus};
use crate::scheduling::{Candidate, check_conflicts};
use crate::store::ScheduleStore;

use super::BookingEngine;

/// The outcome of a successful alert confirmation: the terminal alert and
/// the booking created for the claimant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedAlert {
    /// The alert, now in `confirmed` status.
    pub alert: BookingAlert,
    /// The booking created for the claiming staff member.
    pub booking: Booking,
}

impl BookingEngine {
    /// Claims an open alert for a staff member, moving it to
    /// `pending_confirmation` for manager review.
    ///
    /// # Errors
    ///
    /// - [`EngineError::StateTransition`] when the alert is not open;
    /// - [`EngineError::Validation`] when the alert's allow-list excludes
    ///   the staff member;
    /// - [`EngineError::Concurrency`] when another claim won the race
    ///   between this read and the write.
    pub fn claim_alert(&self, alert_id: Uuid, staff_id: Uuid) -> EngineResult<BookingAlert> {
        let alert = self.store().alert(alert_id)?;
        if alert.status != AlertStatus::Open {
            return Err(transition_error(&alert, "claim"));
        }
        if !alert.is_claimable_by(staff_id) {
            return Err(EngineError::Validation {
                field: "staff_id".to_string(),
                message: "staff member is not in the alert's allow-list".to_string(),
            });
        }

        let mut updated = alert;
        updated.status = AlertStatus::PendingConfirmation;
        updated.claimed_by = Some(staff_id);
        // Only the first writer that still observes `open` may win.
        let updated = self
            .store()
            .update_alert_if_status(AlertStatus::Open, &updated)?;

        info!(%alert_id, %staff_id, "alert claimed");
        Ok(updated)
    }

    /// Confirms a claimed alert: checks the claimant's availability over
    /// the alert's interval and, if conflict-free, creates the concrete
    /// booking and closes the alert as `confirmed`.
    ///
    /// If the alert originated from a cancelled booking, that booking
    /// stays cancelled; the new booking replaces it.
    ///
    /// # Errors
    ///
    /// - [`EngineError::StateTransition`] when the alert is not pending
    ///   confirmation;
    /// - [`EngineError::Conflict`] when the claimant has a booking or
    ///   leave overlap; the alert stays in `pending_confirmation` and the
    ///   manager must reject or pick another claimant;
    /// - [`EngineError::Concurrency`] when a racing write gave the
    ///   claimant an overlapping booking after the availability check;
    ///   the confirmation is rolled back and the alert stays in
    ///   `pending_confirmation`.
    pub fn confirm_alert(&self, alert_id: Uuid, manager_id: Uuid) -> EngineResult<ConfirmedAlert> {
        let alert = self.store().alert(alert_id)?;
        if alert.status != AlertStatus::PendingConfirmation {
            return Err(transition_error(&alert, "confirm"));
        }
        let Some(claimant) = alert.claimed_by else {
            // A pending alert always carries its claimant; a record without
            // one cannot be confirmed.
            return Err(EngineError::Validation {
                field: "claimed_by".to_string(),
                message: "alert is pending confirmation but has no claimant".to_string(),
            });
        };

        let candidates = [Candidate {
            staff_id: claimant,
            interval: alert.interval,
        }];
        let bookings = self
            .store()
            .bookings_in_range(&alert.interval, Some(claimant))?;
        let leave = self.store().leave_in_range(&alert.interval, Some(claimant))?;
        let report = check_conflicts(&candidates, &bookings, &leave);
        if !report.is_clear() {
            warn!(
                %alert_id,
                %claimant,
                conflicts = report.total(),
                "confirmation blocked by claimant conflicts"
            );
            return Err(EngineError::Conflict { report });
        }

        let mut updated = alert.clone();
        updated.status = AlertStatus::Confirmed;
        let updated = self
            .store()
            .update_alert_if_status(AlertStatus::PendingConfirmation, &updated)?;

        let booking = Booking {
            id: Uuid::new_v4(),
            staff_id: claimant,
            client_id: alert.client_id,
            service_id: alert.service_id,
            interval: alert.interval,
            status: BookingStatus::Scheduled,
            series_id: None,
            notes: None,
        };
        // The availability check above ran outside the store's atomic
        // scope; the guarded insert re-verifies it. If the claimant gained
        // an overlapping booking in the window, roll the alert back so it
        // is not stranded confirmed without a booking.
        if let Err(err) = self
            .store()
            .insert_bookings_if_clear(std::slice::from_ref(&booking))
        {
            warn!(
                %alert_id,
                %claimant,
                error = %err,
                "booking write lost a race, reverting confirmation"
            );
            let mut reverted = updated;
            reverted.status = AlertStatus::PendingConfirmation;
            self.store()
                .update_alert_if_status(AlertStatus::Confirmed, &reverted)?;
            return Err(err);
        }

        info!(%alert_id, %manager_id, %claimant, booking_id = %booking.id, "alert confirmed");
        Ok(ConfirmedAlert {
            alert: updated,
            booking,
        })
    }

    /// Rejects a pending claim: reopens the alert, clears the claimant,
    /// and records the reason for audit. The caller is expected to notify
    /// the other eligible staff (see [`BookingAlert::eligible_staff`]).
    ///
    /// # Errors
    ///
    /// - [`EngineError::Validation`] when `reason` is empty;
    /// - [`EngineError::StateTransition`] when the alert is not pending
    ///   confirmation.
    pub fn reject_alert(
        &self,
        alert_id: Uuid,
        manager_id: Uuid,
        reason: &str,
    ) -> EngineResult<BookingAlert> {
        require_reason(reason)?;
        let alert = self.store().alert(alert_id)?;
        if alert.status != AlertStatus::PendingConfirmation {
            return Err(transition_error(&alert, "reject"));
        }

        let rejected_claimant = alert.claimed_by;
        let mut updated = alert;
        updated.status = AlertStatus::Open;
        updated.claimed_by = None;
        updated.resolution_reason = Some(reason.to_string());
        let updated = self
            .store()
            .update_alert_if_status(AlertStatus::PendingConfirmation, &updated)?;

        info!(
            %alert_id,
            %manager_id,
            claimant = ?rejected_claimant,
            eligible = updated.eligible_staff(rejected_claimant).len(),
            "claim rejected, alert reopened"
        );
        Ok(updated)
    }

    /// Cancels an alert permanently, recording the reason. Valid from
    /// `open`, `claimed` (the reserved legacy value), and
    /// `pending_confirmation`; no further transitions exist afterwards.
    pub fn cancel_alert(
        &self,
        alert_id: Uuid,
        manager_id: Uuid,
        reason: &str,
    ) -> EngineResult<BookingAlert> {
        require_reason(reason)?;
        let alert = self.store().alert(alert_id)?;
        if !matches!(
            alert.status,
            AlertStatus::Open | AlertStatus::Claimed | AlertStatus::PendingConfirmation
        ) {
            return Err(transition_error(&alert, "cancel"));
        }

        let previous_status = alert.status;
        let mut updated = alert;
        updated.status = AlertStatus::Cancelled;
        updated.resolution_reason = Some(reason.to_string());
        let updated = self
            .store()
            .update_alert_if_status(previous_status, &updated)?;

        info!(%alert_id, %manager_id, "alert cancelled");
        Ok(updated)
    }
}

fn require_reason(reason: &str) -> EngineResult<()> {
    if reason.trim().is_empty() {
        return Err(EngineError::Validation {
            field: "reason".to_string(),
            message: "a non-empty reason is required".to_string(),
        });
    }
    Ok(())
}

fn transition_error(alert: &BookingAlert, action: &str) -> EngineError {
    EngineError::StateTransition {
        entity: "alert".to_string(),
        id: alert.id,
        status: alert.status.to_string(),
        action: action.to_string(),
    }
}
