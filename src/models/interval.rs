//! Half-open time interval value type.
//!
//! This module defines the [`Interval`] struct used by every component of
//! the engine: bookings, booking alerts, leave normalization, conflict
//! checks, and the calendar event stream all speak in intervals.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A half-open time range `[start, end)`.
///
/// Half-open semantics mean a booking ending at 10:00 does not conflict
/// with one starting at 10:00. Construct via [`Interval::new`], which
/// enforces the `start < end` invariant.
///
/// # Example
///
/// ```
/// use booking_engine::models::Interval;
/// use chrono::NaiveDateTime;
///
/// let parse = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let morning = Interval::new(parse("2026-03-02 09:00:00"), parse("2026-03-02 10:00:00")).unwrap();
/// let next = Interval::new(parse("2026-03-02 10:00:00"), parse("2026-03-02 11:00:00")).unwrap();
/// assert!(!morning.overlaps(&next)); // back-to-back is not a conflict
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// The start instant (inclusive).
    pub start: NaiveDateTime,
    /// The end instant (exclusive).
    pub end: NaiveDateTime,
}

impl Interval {
    /// Creates a new interval, enforcing `start < end`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInterval`] if `start` is not strictly
    /// before `end` (zero-length intervals are rejected).
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> EngineResult<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(EngineError::InvalidInterval { start, end })
        }
    }

    /// Returns true iff the two intervals overlap.
    ///
    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Adjacent intervals, where one ends exactly when the other starts,
    /// do NOT overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true iff `instant` falls within the interval
    /// (`start <= instant < end`).
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Returns the duration of the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn interval(start: &str, end: &str) -> Interval {
        Interval::new(
            make_datetime("2026-03-02", start),
            make_datetime("2026-03-02", end),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_reversed_bounds() {
        let result = Interval::new(
            make_datetime("2026-03-02", "11:00:00"),
            make_datetime("2026-03-02", "10:00:00"),
        );
        assert!(matches!(result, Err(EngineError::InvalidInterval { .. })));
    }

    #[test]
    fn test_new_rejects_zero_length() {
        let instant = make_datetime("2026-03-02", "10:00:00");
        assert!(Interval::new(instant, instant).is_err());
    }

    #[test]
    fn test_overlapping_intervals_overlap() {
        let a = interval("10:00:00", "11:00:00");
        let b = interval("10:30:00", "11:30:00");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_adjacent_intervals_do_not_overlap() {
        // A booking ending at 10:00 does not conflict with one starting at 10:00.
        let a = interval("09:00:00", "10:00:00");
        let b = interval("10:00:00", "11:00:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_contained_interval_overlaps() {
        let outer = interval("09:00:00", "17:00:00");
        let inner = interval("12:00:00", "13:00:00");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_contains_is_half_open() {
        let i = interval("09:00:00", "10:00:00");
        assert!(i.contains(make_datetime("2026-03-02", "09:00:00")));
        assert!(i.contains(make_datetime("2026-03-02", "09:59:59")));
        assert!(!i.contains(make_datetime("2026-03-02", "10:00:00")));
        assert!(!i.contains(make_datetime("2026-03-02", "08:59:59")));
    }

    #[test]
    fn test_duration() {
        let i = interval("09:00:00", "10:30:00");
        assert_eq!(i.duration(), Duration::minutes(90));
    }

    #[test]
    fn test_interval_serialization_round_trip() {
        let i = interval("09:00:00", "10:00:00");
        let json = serde_json::to_string(&i).unwrap();
        let back: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(i, back);
    }

    /// Generates an arbitrary valid interval within a one-year window.
    fn arb_interval() -> impl Strategy<Value = Interval> {
        (0i64..525_600, 1i64..1_440).prop_map(|(offset, len)| {
            let base = make_datetime("2026-01-01", "00:00:00");
            let start = base + Duration::minutes(offset);
            Interval::new(start, start + Duration::minutes(len)).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_interval(), b in arb_interval()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_interval_overlaps_itself(a in arb_interval()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn prop_overlap_implies_shared_instant(a in arb_interval(), b in arb_interval()) {
            // If the intervals overlap, the later start is inside both.
            if a.overlaps(&b) {
                let shared = a.start.max(b.start);
                prop_assert!(a.contains(shared));
                prop_assert!(b.contains(shared));
            }
        }

        #[test]
        fn prop_contains_implies_overlap_with_point_neighborhood(a in arb_interval()) {
            // Every interval contains its own start.
            prop_assert!(a.contains(a.start));
            prop_assert!(!a.contains(a.end));
        }
    }
}
