//! Configuration for the Booking Scheduling Engine.
//!
//! This module provides types and loading functionality for the
//! scheduling policy (recurrence bounds, bookable weekdays).

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{PolicyFile, SchedulePolicy};
