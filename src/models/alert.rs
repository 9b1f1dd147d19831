//! Booking alert model.
//!
//! A booking alert is an open request for a replacement staff member to
//! cover a shift. Alerts are never deleted: terminal states are retained
//! for audit, and all mutation goes through the state machine in
//! [`crate::engine::alerts`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Interval;

/// The state-machine variable of a booking alert.
///
/// Canonical transitions: `Open -> PendingConfirmation` on claim, then on
/// manager review either `PendingConfirmation -> Confirmed` or, on reject,
/// `PendingConfirmation -> Open` (clearing the claimant), and
/// `Open | Claimed | PendingConfirmation -> Cancelled`. `Confirmed`,
/// `Rejected`, and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Awaiting a claim from an eligible staff member.
    Open,
    /// Reserved legacy value. No transition produces it; a record bearing
    /// it may still be cancelled but can never skip manager review.
    Claimed,
    /// Claimed by a staff member, awaiting manager confirmation.
    PendingConfirmation,
    /// Confirmed by a manager; a concrete booking was created. Terminal.
    Confirmed,
    /// Reserved legacy value, like [`AlertStatus::Claimed`]: no current
    /// operation emits it, because rejecting a claim reopens the alert for
    /// other claimants instead of closing it. A record bearing it is
    /// terminal and permits no further transitions.
    Rejected,
    /// Cancelled by a manager. Terminal.
    Cancelled,
}

impl AlertStatus {
    /// Returns true iff no further transitions are valid from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AlertStatus::Confirmed | AlertStatus::Rejected | AlertStatus::Cancelled
        )
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertStatus::Open => write!(f, "open"),
            AlertStatus::Claimed => write!(f, "claimed"),
            AlertStatus::PendingConfirmation => write!(f, "pending_confirmation"),
            AlertStatus::Confirmed => write!(f, "confirmed"),
            AlertStatus::Rejected => write!(f, "rejected"),
            AlertStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// An open shift that needs a replacement staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingAlert {
    /// Unique identifier for the alert.
    pub id: Uuid,
    /// The shift slot that needs covering.
    pub interval: Interval,
    /// The service the shift delivers.
    pub service_id: Uuid,
    /// The client the shift is for.
    pub client_id: Uuid,
    /// Optional allow-list of staff who may claim the alert; empty means
    /// any staff member is eligible.
    #[serde(default)]
    pub target_staff: Vec<Uuid>,
    /// The state-machine variable.
    pub status: AlertStatus,
    /// The staff member whose claim is awaiting confirmation, if any.
    #[serde(default)]
    pub claimed_by: Option<Uuid>,
    /// The cancelled booking this alert was converted from, if any.
    #[serde(default)]
    pub original_booking_id: Option<Uuid>,
    /// The reason recorded by the last reject or cancel, for audit.
    #[serde(default)]
    pub resolution_reason: Option<String>,
}

impl BookingAlert {
    /// Returns true iff the given staff member may claim this alert:
    /// either the allow-list is empty or they are a member of it.
    pub fn is_claimable_by(&self, staff_id: Uuid) -> bool {
        self.target_staff.is_empty() || self.target_staff.contains(&staff_id)
    }

    /// Returns the staff members eligible to claim the alert, excluding
    /// `excluded` (used to re-notify others after a reject).
    pub fn eligible_staff(&self, excluded: Option<Uuid>) -> Vec<Uuid> {
        self.target_staff
            .iter()
            .copied()
            .filter(|id| Some(*id) != excluded)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_alert(target_staff: Vec<Uuid>) -> BookingAlert {
        BookingAlert {
            id: Uuid::new_v4(),
            interval: Interval::new(
                make_datetime("2026-03-02", "09:00:00"),
                make_datetime("2026-03-02", "17:00:00"),
            )
            .unwrap(),
            service_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            target_staff,
            status: AlertStatus::Open,
            claimed_by: None,
            original_booking_id: None,
            resolution_reason: None,
        }
    }

    #[test]
    fn test_empty_allow_list_means_any_staff() {
        let alert = make_alert(vec![]);
        assert!(alert.is_claimable_by(Uuid::new_v4()));
    }

    #[test]
    fn test_allow_list_excludes_non_members() {
        let member = Uuid::new_v4();
        let alert = make_alert(vec![member]);
        assert!(alert.is_claimable_by(member));
        assert!(!alert.is_claimable_by(Uuid::new_v4()));
    }

    #[test]
    fn test_eligible_staff_excludes_rejected_claimant() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let alert = make_alert(vec![a, b]);
        assert_eq!(alert.eligible_staff(Some(a)), vec![b]);
        assert_eq!(alert.eligible_staff(None), vec![a, b]);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(AlertStatus::Confirmed.is_terminal());
        assert!(AlertStatus::Rejected.is_terminal());
        assert!(AlertStatus::Cancelled.is_terminal());
        assert!(!AlertStatus::Open.is_terminal());
        assert!(!AlertStatus::Claimed.is_terminal());
        assert!(!AlertStatus::PendingConfirmation.is_terminal());
    }

    #[test]
    fn test_status_serialization_is_snake_case() {
        let json = serde_json::to_string(&AlertStatus::PendingConfirmation).unwrap();
        assert_eq!(json, "\"pending_confirmation\"");
    }

    #[test]
    fn test_status_display_matches_wire_format() {
        assert_eq!(AlertStatus::PendingConfirmation.to_string(), "pending_confirmation");
        assert_eq!(AlertStatus::Open.to_string(), "open");
    }
}
