//! Viewer capability object for role-based event filtering.
//!
//! Replaces ad hoc role-string comparisons: every read-side operation
//! takes a [`Viewer`] and asks it what it may see.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role a viewer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A staff member: sees their own commitments and open alerts.
    Staff,
    /// A manager: sees the full schedule.
    Manager,
    /// An administrator: sees the full schedule.
    Admin,
    /// A superuser: sees the full schedule.
    Superuser,
    /// A client: sees only their own bookings.
    Client,
}

impl Role {
    /// Returns true iff the role may see every staff member's schedule.
    pub fn sees_all_staff(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin | Role::Superuser)
    }
}

/// The identity and role of the party requesting an event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// The viewer's id in the shared staff/client id space.
    pub id: Uuid,
    /// The viewer's role.
    pub role: Role,
}
