//! Read-side calendar aggregation for the Booking Scheduling Engine.

mod events;

pub use events::{Event, EventKind, build_event_stream};
