//! Availability checking logic.
//!
//! Pure functions that decide whether candidate intervals collide with a
//! staff member's existing commitments. Booking overlaps and leave
//! overlaps are reported distinctly: callers surface different messages
//! for them, and leave conflicts block alert confirmation even when no
//! booking exists yet.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Booking, Interval, LeaveRequest, LeaveStatus};

/// A candidate interval to be checked for a specific staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// The staff member the candidate would be booked against.
    pub staff_id: Uuid,
    /// The candidate time slot.
    pub interval: Interval,
}

/// The kind of commitment a candidate collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The candidate overlaps an existing non-cancelled booking.
    Booking,
    /// The candidate overlaps a pending or approved leave request.
    Leave,
}

/// One detected collision between a candidate and an existing commitment.
///
/// Carries enough detail (staff, both intervals, conflict kind, source
/// entity) for the caller to present an actionable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// The staff member both intervals belong to.
    pub staff_id: Uuid,
    /// The candidate interval that was rejected.
    pub candidate: Interval,
    /// The interval of the existing commitment.
    pub conflicting: Interval,
    /// Whether the commitment is a booking or a leave request.
    pub kind: ConflictKind,
    /// The id of the conflicting booking or leave request.
    pub source_id: Uuid,
    /// For leave conflicts, whether the leave is pending or approved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_status: Option<LeaveStatus>,
}

/// The outcome of checking a batch of candidates.
///
/// The batch is conflict-free only if both lists are empty; otherwise the
/// whole batch is rejected (partial application of a recurring series is
/// not permitted).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Collisions with existing non-cancelled bookings.
    pub booking_conflicts: Vec<Conflict>,
    /// Collisions with pending or approved leave.
    pub leave_conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// Returns true iff no candidate produced either conflict kind.
    pub fn is_clear(&self) -> bool {
        self.booking_conflicts.is_empty() && self.leave_conflicts.is_empty()
    }

    /// Returns the total number of detected conflicts.
    pub fn total(&self) -> usize {
        self.booking_conflicts.len() + self.leave_conflicts.len()
    }
}

impl std::fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} booking conflict(s) and {} leave conflict(s)",
            self.booking_conflicts.len(),
            self.leave_conflicts.len()
        )
    }
}

/// Checks every candidate against existing bookings and leave requests.
///
/// Rules, in order:
/// 1. a candidate overlapping a non-cancelled booking for the same staff
///    member is a booking conflict;
/// 2. a candidate overlapping a pending or approved leave request for the
///    same staff member (inclusive leave days normalized to end-of-day)
///    is a leave conflict.
///
/// Commitments belonging to other staff members never conflict. This is a
/// pure function: callers are responsible for persistence.
pub fn check_conflicts(
    candidates: &[Candidate],
    bookings: &[Booking],
    leave_requests: &[LeaveRequest],
) -> ConflictReport {
    let mut report = ConflictReport::default();

    for candidate in candidates {
        for booking in bookings {
            if booking.staff_id == candidate.staff_id
                && booking.blocks_schedule()
                && booking.interval.overlaps(&candidate.interval)
            {
                report.booking_conflicts.push(Conflict {
                    staff_id: candidate.staff_id,
                    candidate: candidate.interval,
                    conflicting: booking.interval,
                    kind: ConflictKind::Booking,
                    source_id: booking.id,
                    leave_status: None,
                });
            }
        }

        for leave in leave_requests {
            if leave.staff_id == candidate.staff_id && leave.blocks_schedule() {
                let leave_interval = leave.to_interval();
                if leave_interval.overlaps(&candidate.interval) {
                    report.leave_conflicts.push(Conflict {
                        staff_id: candidate.staff_id,
                        candidate: candidate.interval,
                        conflicting: leave_interval,
                        kind: ConflictKind::Leave,
                        source_id: leave.id,
                        leave_status: Some(leave.status),
                    });
                }
            }
        }
    }

    report
}
