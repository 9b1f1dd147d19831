//! Leave request model.
//!
//! Leave requests are created by staff and reviewed (approved/denied)
//! outside this engine; the scheduling engine only reads them when
//! checking availability.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Interval;

/// The review status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review. Pending leave still blocks scheduling.
    Pending,
    /// Approved by a reviewer.
    Approved,
    /// Denied by a reviewer; the request is inert.
    Denied,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Denied => write!(f, "denied"),
        }
    }
}

/// A staff-submitted request for time off, at calendar-day granularity.
///
/// The range is inclusive on both ends: a request for a single day has
/// `start_date == end_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the leave request.
    pub id: Uuid,
    /// The staff member requesting leave.
    pub staff_id: Uuid,
    /// The first day of leave (inclusive).
    pub start_date: NaiveDate,
    /// The last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// The review status of the request.
    pub status: LeaveStatus,
    /// The reason given by the staff member.
    pub reason: String,
}

impl LeaveRequest {
    /// Returns true iff this request blocks scheduling: both pending and
    /// approved leave participate in conflict checks, denied leave does not.
    pub fn blocks_schedule(&self) -> bool {
        matches!(self.status, LeaveStatus::Pending | LeaveStatus::Approved)
    }

    /// Returns the leave range as a half-open interval, normalizing the
    /// inclusive end day to the following midnight.
    pub fn to_interval(&self) -> Interval {
        let start = self.start_date.and_hms_opt(0, 0, 0).expect("valid midnight");
        let end = (self.end_date + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .expect("valid midnight");
        // start <= end_date guarantees start < end after normalization
        Interval { start, end }
    }
}
