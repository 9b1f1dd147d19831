//! Core data models for the Booking Scheduling Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod alert;
mod booking;
mod interval;
mod leave;
mod viewer;

pub use alert::{AlertStatus, BookingAlert};
pub use booking::{Booking, BookingStatus};
pub use interval::Interval;
pub use leave::{LeaveRequest, LeaveStatus};
pub use viewer::{Role, Viewer};
