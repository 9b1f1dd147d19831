//! Calendar event aggregation.
//!
//! Merges bookings, booking alerts, and leave requests for a given viewer
//! into a single role-filtered, staff-attributed event stream, used both
//! for display and as the read side of further conflict checks.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::models::{AlertStatus, Booking, BookingAlert, Interval, LeaveRequest, Viewer};

/// The kind of commitment an event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A booking.
    Booking,
    /// A booking alert (open shift-coverage request).
    Alert,
    /// A leave request.
    Leave,
}

/// One entry in the aggregated event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The id of the underlying booking, alert, or leave request.
    pub id: Uuid,
    /// What kind of commitment the event represents.
    pub kind: EventKind,
    /// The display column the event is attributed to: bookings and leave
    /// use their staff member; open alerts (not yet staff-specific) are
    /// attributed to the viewing staff member.
    pub resource_id: Uuid,
    /// The staff member actually assigned, if any.
    pub staff_id: Option<Uuid>,
    /// The event's time range.
    pub interval: Interval,
    /// The underlying entity's status label.
    pub status: String,
}

/// Builds the event stream for a viewer over a date range.
///
/// Role-based composition:
/// - a staff viewer sees their own bookings, all open alerts whose
///   allow-list does not exclude them, and their own leave requests;
/// - a manager/admin/superuser viewer sees all bookings and leave
///   (optionally narrowed to an explicit staff selection) and all alerts;
/// - a client viewer sees only their own bookings.
///
/// Cancelled bookings are omitted: their slot no longer represents a
/// commitment (when one was converted to an alert, the alert stands in
/// for it). Events are ordered ascending by start time. Overlapping
/// booking/leave events for the same staff member indicate a
/// data-integrity violation the availability checker should have
/// prevented; they are logged and kept in the stream, never dropped.
pub fn build_event_stream(
    viewer: &Viewer,
    range: &Interval,
    staff_filter: Option<&[Uuid]>,
    bookings: &[Booking],
    alerts: &[BookingAlert],
    leave_requests: &[LeaveRequest],
) -> Vec<Event> {
    let mut events = Vec::new();
    let sees_all = viewer.role.sees_all_staff();
    let is_client = viewer.role == crate::models::Role::Client;

    let staff_selected = |staff_id: Uuid| -> bool {
        staff_filter.is_none_or(|selection| selection.contains(&staff_id))
    };

    for booking in bookings {
        if !booking.blocks_schedule() || !booking.interval.overlaps(range) {
            continue;
        }
        let visible = if is_client {
            booking.client_id == viewer.id
        } else if sees_all {
            staff_selected(booking.staff_id)
        } else {
            booking.staff_id == viewer.id
        };
        if visible {
            events.push(Event {
                id: booking.id,
                kind: EventKind::Booking,
                resource_id: booking.staff_id,
                staff_id: Some(booking.staff_id),
                interval: booking.interval,
                status: booking.status.to_string(),
            });
        }
    }

    if !is_client {
        for alert in alerts {
            if !alert.interval.overlaps(range) {
                continue;
            }
            let visible = if sees_all {
                true
            } else {
                alert.status == AlertStatus::Open && alert.is_claimable_by(viewer.id)
            };
            if visible {
                events.push(Event {
                    id: alert.id,
                    kind: EventKind::Alert,
                    // Open alerts are not staff-specific yet; render them in
                    // the viewing staff member's own column.
                    resource_id: alert.claimed_by.unwrap_or(viewer.id),
                    staff_id: alert.claimed_by,
                    interval: alert.interval,
                    status: alert.status.to_string(),
                });
            }
        }

        for leave in leave_requests {
            let leave_interval = leave.to_interval();
            if !leave_interval.overlaps(range) {
                continue;
            }
            let visible = if sees_all {
                staff_selected(leave.staff_id)
            } else {
                leave.staff_id == viewer.id
            };
            if visible {
                events.push(Event {
                    id: leave.id,
                    kind: EventKind::Leave,
                    resource_id: leave.staff_id,
                    staff_id: Some(leave.staff_id),
                    interval: leave_interval,
                    status: leave.status.to_string(),
                });
            }
        }
    }

    events.sort_by_key(|e| e.interval.start);
    flag_integrity_violations(&events);
    events
}

/// Logs any same-staff overlap between booking/leave events.
///
/// A successful write path never produces these; seeing one means the
/// stored data violates the no-double-booking invariant.
fn flag_integrity_violations(events: &[Event]) {
    for (i, a) in events.iter().enumerate() {
        if a.kind == EventKind::Alert {
            continue;
        }
        for b in &events[i + 1..] {
            if b.kind == EventKind::Alert {
                continue;
            }
            // Events are sorted by start; once b starts after a ends there
            // is nothing further to compare against a.
            if b.interval.start >= a.interval.end {
                break;
            }
            if a.staff_id == b.staff_id && a.interval.overlaps(&b.interval) {
                warn!(
                    first_event = %a.id,
                    second_event = %b.id,
                    staff_id = ?a.staff_id,
                    "overlapping events for the same staff member: stored data violates the no-double-booking invariant"
                );
            }
        }
    }
}
