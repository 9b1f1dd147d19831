//! Application state for the Booking Scheduling Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::BookingEngine;

/// Shared application state.
///
/// Contains the scheduling engine (and, through it, the store and
/// policy) shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<BookingEngine>,
}

impl AppState {
    /// Creates a new application state over the given engine.
    pub fn new(engine: BookingEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the scheduling engine.
    pub fn engine(&self) -> &BookingEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
