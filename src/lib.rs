//! Booking Scheduling & Conflict Resolution Engine.
//!
//! This crate expands a single booking request (optionally recurring over
//! multiple weekdays and weeks) into concrete time-boxed booking instances,
//! validates every instance against a staff member's existing commitments
//! (other bookings, approved/pending leave) to prevent double-booking, and
//! drives the lifecycle of booking alerts (open shift-coverage requests)
//! through a claim/confirm/reject/cancel state machine.

#![warn(missing_docs)]

pub mod api;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod scheduling;
pub mod store;
