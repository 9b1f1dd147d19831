//! Orchestration over a [`ScheduleStore`].
//!
//! The pure modules ([`crate::scheduling`], [`crate::calendar`]) know
//! nothing about persistence; this module wires them to the store: the
//! booking/series pipeline lives in [`bookings`] (inherent methods on
//! [`BookingEngine`]), the alert state machine in [`alerts`].

mod alerts;
mod bookings;

use std::sync::Arc;

use uuid::Uuid;

use crate::calendar::{Event, build_event_stream};
use crate::config::SchedulePolicy;
use crate::error::EngineResult;
use crate::models::{Interval, Viewer};
use crate::store::ScheduleStore;

pub use alerts::ConfirmedAlert;

/// The scheduling engine: expansion, conflict checking, persistence, and
/// the alert state machine, invoked per-request in a stateless
/// request/response style.
#[derive(Clone)]
pub struct BookingEngine {
    store: Arc<dyn ScheduleStore>,
    policy: SchedulePolicy,
}

impl BookingEngine {
    /// Creates an engine over the given store and policy.
    pub fn new(store: Arc<dyn ScheduleStore>, policy: SchedulePolicy) -> Self {
        Self { store, policy }
    }

    /// Returns the store the engine operates on.
    pub fn store(&self) -> &dyn ScheduleStore {
        self.store.as_ref()
    }

    /// Returns the scheduling policy in effect.
    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    /// Builds the aggregated event stream for a viewer over a date range,
    /// fetching the current commitments from the store.
    ///
    /// `staff_filter` is the explicit staff selection for supervisory
    /// viewers; it has no effect for staff or client viewers.
    pub fn event_stream(
        &self,
        viewer: &Viewer,
        range: &Interval,
        staff_filter: Option<&[Uuid]>,
    ) -> EngineResult<Vec<Event>> {
        let bookings = self.store.bookings_in_range(range, None)?;
        let alerts = self.store.alerts_in_range(range)?;
        let leave = self.store.leave_in_range(range, None)?;
        Ok(build_event_stream(
            viewer,
            range,
            staff_filter,
            &bookings,
            &alerts,
            &leave,
        ))
    }
}
