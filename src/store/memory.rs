//! In-memory implementation of the storage contract.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AlertStatus, Booking, BookingAlert, BookingStatus, Interval, LeaveRequest};

use super::ScheduleStore;

#[derive(Debug, Default)]
struct Inner {
    bookings: HashMap<Uuid, Booking>,
    leave: HashMap<Uuid, LeaveRequest>,
    alerts: HashMap<Uuid, BookingAlert>,
}

/// A `Mutex`-guarded in-memory [`ScheduleStore`].
///
/// Conditional updates hold the lock across the status comparison and the
/// write, giving the same compare-and-swap semantics a database would
/// provide with a conditional `UPDATE ... WHERE status = ?`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a leave request. The engine only ever reads leave; this is
    /// how tests and callers place leave data in the store.
    pub fn seed_leave(&self, leave: LeaveRequest) {
        self.lock().leave.insert(leave.id, leave);
    }

    /// Seeds a booking directly, bypassing the scheduling pipeline.
    pub fn seed_booking(&self, booking: Booking) {
        self.lock().bookings.insert(booking.id, booking);
    }

    /// Seeds an alert directly, bypassing the state machine.
    pub fn seed_alert(&self, alert: BookingAlert) {
        self.lock().alerts.insert(alert.id, alert);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-write; propagating the panic
        // is the only sound option for an in-memory store.
        self.inner.lock().expect("store lock poisoned")
    }
}

impl ScheduleStore for MemoryStore {
    fn bookings_in_range(
        &self,
        range: &Interval,
        staff_id: Option<Uuid>,
    ) -> EngineResult<Vec<Booking>> {
        let inner = self.lock();
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.interval.overlaps(range))
            .filter(|b| staff_id.is_none_or(|id| b.staff_id == id))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.interval.start);
        Ok(bookings)
    }

    fn bookings_in_series(&self, series_id: Uuid) -> EngineResult<Vec<Booking>> {
        let inner = self.lock();
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.series_id == Some(series_id))
            .cloned()
            .collect();
        if bookings.is_empty() {
            return Err(EngineError::SeriesNotFound { id: series_id });
        }
        bookings.sort_by_key(|b| b.interval.start);
        Ok(bookings)
    }

    fn booking(&self, id: Uuid) -> EngineResult<Booking> {
        self.lock()
            .bookings
            .get(&id)
            .cloned()
            .ok_or(EngineError::BookingNotFound { id })
    }

    fn leave_in_range(
        &self,
        range: &Interval,
        staff_id: Option<Uuid>,
    ) -> EngineResult<Vec<LeaveRequest>> {
        let inner = self.lock();
        let mut leave: Vec<LeaveRequest> = inner
            .leave
            .values()
            .filter(|l| l.to_interval().overlaps(range))
            .filter(|l| staff_id.is_none_or(|id| l.staff_id == id))
            .cloned()
            .collect();
        leave.sort_by_key(|l| l.start_date);
        Ok(leave)
    }

    fn alerts_in_range(&self, range: &Interval) -> EngineResult<Vec<BookingAlert>> {
        let inner = self.lock();
        let mut alerts: Vec<BookingAlert> = inner
            .alerts
            .values()
            .filter(|a| a.interval.overlaps(range))
            .cloned()
            .collect();
        alerts.sort_by_key(|a| a.interval.start);
        Ok(alerts)
    }

    fn alert(&self, id: Uuid) -> EngineResult<BookingAlert> {
        self.lock()
            .alerts
            .get(&id)
            .cloned()
            .ok_or(EngineError::AlertNotFound { id })
    }

    fn insert_bookings_if_clear(&self, bookings: &[Booking]) -> EngineResult<()> {
        let mut inner = self.lock();
        // All-or-nothing: verify the whole batch, including the
        // no-double-booking precondition, before touching the map. The
        // engine's own conflict check ran outside this lock and may be
        // stale by now.
        for booking in bookings {
            if inner.bookings.contains_key(&booking.id) {
                return Err(EngineError::Concurrency {
                    entity: "booking".to_string(),
                    id: booking.id,
                });
            }
            if let Some(clash) = overlapping_blocker(&inner, booking, None) {
                return Err(EngineError::Concurrency {
                    entity: "booking".to_string(),
                    id: clash,
                });
            }
        }
        for booking in bookings {
            inner.bookings.insert(booking.id, booking.clone());
        }
        Ok(())
    }

    fn insert_alert(&self, alert: &BookingAlert) -> EngineResult<()> {
        let mut inner = self.lock();
        if inner.alerts.contains_key(&alert.id) {
            return Err(EngineError::Concurrency {
                entity: "alert".to_string(),
                id: alert.id,
            });
        }
        inner.alerts.insert(alert.id, alert.clone());
        Ok(())
    }

    fn update_booking_if_status(
        &self,
        expected: BookingStatus,
        updated: &Booking,
    ) -> EngineResult<Booking> {
        let mut inner = self.lock();
        let current = inner
            .bookings
            .get(&updated.id)
            .ok_or(EngineError::BookingNotFound { id: updated.id })?;
        if current.status != expected {
            return Err(EngineError::Concurrency {
                entity: "booking".to_string(),
                id: updated.id,
            });
        }
        inner.bookings.insert(updated.id, updated.clone());
        Ok(updated.clone())
    }

    fn update_alert_if_status(
        &self,
        expected: AlertStatus,
        updated: &BookingAlert,
    ) -> EngineResult<BookingAlert> {
        let mut inner = self.lock();
        let current = inner
            .alerts
            .get(&updated.id)
            .ok_or(EngineError::AlertNotFound { id: updated.id })?;
        if current.status != expected {
            return Err(EngineError::Concurrency {
                entity: "alert".to_string(),
                id: updated.id,
            });
        }
        inner.alerts.insert(updated.id, updated.clone());
        Ok(updated.clone())
    }

    fn replace_series(&self, series_id: Uuid, bookings: &[Booking]) -> EngineResult<()> {
        let mut inner = self.lock();
        if !inner
            .bookings
            .values()
            .any(|b| b.series_id == Some(series_id))
        {
            return Err(EngineError::SeriesNotFound { id: series_id });
        }
        // Same precondition as the guarded insert, ignoring the series'
        // own (about-to-be-removed) bookings. Verified in full before any
        // mutation so a rejected rewrite leaves the old series intact.
        for booking in bookings {
            if let Some(clash) = overlapping_blocker(&inner, booking, Some(series_id)) {
                return Err(EngineError::Concurrency {
                    entity: "booking".to_string(),
                    id: clash,
                });
            }
        }
        inner.bookings.retain(|_, b| b.series_id != Some(series_id));
        for booking in bookings {
            inner.bookings.insert(booking.id, booking.clone());
        }
        Ok(())
    }
}

/// Returns the id of a stored non-cancelled booking for the same staff
/// member that overlaps `booking`, ignoring bookings in `exclude_series`.
/// Cancelled candidates never block.
fn overlapping_blocker(
    inner: &Inner,
    booking: &Booking,
    exclude_series: Option<Uuid>,
) -> Option<Uuid> {
    if !booking.blocks_schedule() {
        return None;
    }
    inner
        .bookings
        .values()
        .find(|existing| {
            existing.staff_id == booking.staff_id
                && existing.blocks_schedule()
                && (exclude_series.is_none() || existing.series_id != exclude_series)
                && existing.interval.overlaps(&booking.interval)
        })
        .map(|existing| existing.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

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

    fn booking(staff_id: Uuid, start: &str, end: &str) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            staff_id,
            client_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            interval: interval(start, end),
            status: BookingStatus::Scheduled,
            series_id: None,
            notes: None,
        }
    }

    fn alert(start: &str, end: &str) -> BookingAlert {
        BookingAlert {
            id: Uuid::new_v4(),
            interval: interval(start, end),
            service_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            target_staff: vec![],
            status: AlertStatus::Open,
            claimed_by: None,
            original_booking_id: None,
            resolution_reason: None,
        }
    }

    #[test]
    fn test_bookings_in_range_filters_by_overlap_and_staff() {
        let store = MemoryStore::new();
        let staff = Uuid::new_v4();
        let in_range = booking(staff, "09:00:00", "10:00:00");
        store.seed_booking(in_range.clone());
        store.seed_booking(booking(staff, "14:00:00", "15:00:00"));
        store.seed_booking(booking(Uuid::new_v4(), "09:00:00", "10:00:00"));

        let found = store
            .bookings_in_range(&interval("08:00:00", "11:00:00"), Some(staff))
            .unwrap();
        assert_eq!(found, vec![in_range]);
    }

    #[test]
    fn test_insert_bookings_is_all_or_nothing() {
        let store = MemoryStore::new();
        let staff = Uuid::new_v4();
        let existing = booking(staff, "09:00:00", "10:00:00");
        store.seed_booking(existing.clone());

        // Batch containing a duplicate id must leave the store untouched.
        let fresh = booking(staff, "11:00:00", "12:00:00");
        let result = store.insert_bookings_if_clear(&[fresh.clone(), existing.clone()]);
        assert!(result.is_err());
        assert!(store.booking(fresh.id).is_err());
    }

    #[test]
    fn test_insert_rejects_overlap_that_appeared_since_the_check() {
        let store = MemoryStore::new();
        let staff = Uuid::new_v4();
        store.seed_booking(booking(staff, "09:00:00", "10:00:00"));

        // A batch that overlaps a stored non-cancelled booking must fail
        // with a concurrency error even though the caller's own conflict
        // check (run earlier, outside the lock) may have seen a clear
        // schedule.
        let early = booking(staff, "07:00:00", "08:00:00");
        let clashing = booking(staff, "09:30:00", "10:30:00");
        let result = store.insert_bookings_if_clear(&[early.clone(), clashing]);
        assert!(matches!(result, Err(EngineError::Concurrency { .. })));
        // Nothing from the batch was persisted.
        assert!(store.booking(early.id).is_err());
    }

    #[test]
    fn test_insert_ignores_cancelled_and_other_staff_bookings() {
        let store = MemoryStore::new();
        let staff = Uuid::new_v4();
        let mut cancelled = booking(staff, "09:00:00", "10:00:00");
        cancelled.status = BookingStatus::Cancelled;
        store.seed_booking(cancelled);
        store.seed_booking(booking(Uuid::new_v4(), "09:00:00", "10:00:00"));

        let fresh = booking(staff, "09:00:00", "10:00:00");
        assert!(store.insert_bookings_if_clear(&[fresh]).is_ok());
    }

    #[test]
    fn test_update_alert_if_status_rejects_stale_expectation() {
        let store = MemoryStore::new();
        let mut a = alert("09:00:00", "17:00:00");
        store.seed_alert(a.clone());

        // First conditional write wins.
        a.status = AlertStatus::PendingConfirmation;
        a.claimed_by = Some(Uuid::new_v4());
        store
            .update_alert_if_status(AlertStatus::Open, &a)
            .unwrap();

        // Second writer still expects Open and must lose.
        let mut rival = a.clone();
        rival.claimed_by = Some(Uuid::new_v4());
        let result = store.update_alert_if_status(AlertStatus::Open, &rival);
        assert!(matches!(result, Err(EngineError::Concurrency { .. })));

        // The winner's claim is intact.
        assert_eq!(store.alert(a.id).unwrap().claimed_by, a.claimed_by);
    }

    #[test]
    fn test_update_missing_alert_is_not_found() {
        let store = MemoryStore::new();
        let a = alert("09:00:00", "17:00:00");
        let result = store.update_alert_if_status(AlertStatus::Open, &a);
        assert!(matches!(result, Err(EngineError::AlertNotFound { .. })));
    }

    #[test]
    fn test_replace_series_swaps_all_members() {
        let store = MemoryStore::new();
        let staff = Uuid::new_v4();
        let series = Uuid::new_v4();

        let mut old_a = booking(staff, "09:00:00", "10:00:00");
        old_a.series_id = Some(series);
        let mut old_b = booking(staff, "11:00:00", "12:00:00");
        old_b.series_id = Some(series);
        store.seed_booking(old_a.clone());
        store.seed_booking(old_b.clone());

        let mut new_a = booking(staff, "13:00:00", "14:00:00");
        new_a.series_id = Some(series);
        store.replace_series(series, &[new_a.clone()]).unwrap();

        assert!(store.booking(old_a.id).is_err());
        assert!(store.booking(old_b.id).is_err());
        assert_eq!(store.bookings_in_series(series).unwrap(), vec![new_a]);
    }

    #[test]
    fn test_replace_series_rejects_overlap_outside_the_series() {
        let store = MemoryStore::new();
        let staff = Uuid::new_v4();
        let series = Uuid::new_v4();

        let mut member = booking(staff, "09:00:00", "10:00:00");
        member.series_id = Some(series);
        store.seed_booking(member.clone());
        // A standalone booking occupies the target slot.
        let standalone = booking(staff, "13:00:00", "14:00:00");
        store.seed_booking(standalone);

        let mut replacement = booking(staff, "13:30:00", "14:30:00");
        replacement.series_id = Some(series);
        let result = store.replace_series(series, &[replacement]);
        assert!(matches!(result, Err(EngineError::Concurrency { .. })));

        // The rejected rewrite left the old series intact.
        assert_eq!(store.bookings_in_series(series).unwrap(), vec![member]);
    }

    #[test]
    fn test_replace_series_overlapping_its_own_members_is_allowed() {
        let store = MemoryStore::new();
        let staff = Uuid::new_v4();
        let series = Uuid::new_v4();

        let mut member = booking(staff, "09:00:00", "10:00:00");
        member.series_id = Some(series);
        store.seed_booking(member);

        // Shifted thirty minutes: overlaps only the member it replaces.
        let mut replacement = booking(staff, "09:30:00", "10:30:00");
        replacement.series_id = Some(series);
        assert!(store.replace_series(series, &[replacement.clone()]).is_ok());
        assert_eq!(store.bookings_in_series(series).unwrap(), vec![replacement]);
    }

    #[test]
    fn test_replace_unknown_series_is_not_found() {
        let store = MemoryStore::new();
        let result = store.replace_series(Uuid::new_v4(), &[]);
        assert!(matches!(result, Err(EngineError::SeriesNotFound { .. })));
    }

    #[test]
    fn test_leave_in_range_uses_end_of_day_normalization() {
        let store = MemoryStore::new();
        let staff = Uuid::new_v4();
        store.seed_leave(LeaveRequest {
            id: Uuid::new_v4(),
            staff_id: staff,
            start_date: chrono::NaiveDate::parse_from_str("2026-03-02", "%Y-%m-%d").unwrap(),
            end_date: chrono::NaiveDate::parse_from_str("2026-03-02", "%Y-%m-%d").unwrap(),
            status: crate::models::LeaveStatus::Approved,
            reason: "leave".to_string(),
        });

        // Late-evening range on the leave day still sees the request.
        let found = store
            .leave_in_range(&interval("22:00:00", "23:00:00"), Some(staff))
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
