//! Recurrence expansion logic.
//!
//! Turns one booking template plus a weekday selection and a week count
//! into an ordered list of concrete `[start, end)` instances, anchored to
//! the Monday of the week containing the template's start date.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, Weekday};
use uuid::Uuid;

use crate::config::SchedulePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::Interval;

use super::BookingTemplate;

/// A weekly recurrence request: repeat the template on the selected
/// weekdays for the template's week plus `extra_weeks` following weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    /// The weekdays to repeat on. Must be non-empty and within the
    /// policy's bookable weekdays.
    pub weekdays: Vec<Weekday>,
    /// How many additional weeks to repeat beyond the template's week.
    pub extra_weeks: u8,
}

/// The result of expanding a booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Shared series id when more than one instance was produced.
    pub series_id: Option<Uuid>,
    /// The concrete instances, ascending by start time, de-duplicated.
    pub intervals: Vec<Interval>,
}

impl Expansion {
    /// Returns the overall date range covered by the expansion, from the
    /// earliest start to the latest end.
    ///
    /// Returns `None` for an empty expansion.
    pub fn covered_range(&self) -> Option<Interval> {
        let first = self.intervals.first()?;
        let end = self.intervals.iter().map(|i| i.end).max()?;
        Some(Interval {
            start: first.start,
            end,
        })
    }
}

/// Expands a booking template into concrete instances.
///
/// With no recurrence, emits exactly one instance at the template's
/// start/end. Otherwise computes the Monday of the week containing the
/// template's start date and, for each week offset `0..=extra_weeks` and
/// each selected weekday, produces a candidate at the template's
/// time-of-day with the template's exact duration. Identical `(date, time)`
/// pairs are de-duplicated (the template's own weekday, if selected,
/// reproduces the original slot).
///
/// # Errors
///
/// - [`EngineError::InvalidInterval`] if the template's start is not
///   before its end.
/// - [`EngineError::InvalidRecurrence`] if recurrence is enabled with zero
///   weekdays selected, with a weekday outside the policy's bookable days,
///   or with a week count above the policy maximum.
pub fn expand_recurrence(
    template: &BookingTemplate,
    recurrence: Option<&Recurrence>,
    policy: &SchedulePolicy,
) -> EngineResult<Expansion> {
    let base = Interval::new(template.start_time, template.end_time)?;

    let Some(recurrence) = recurrence else {
        return Ok(Expansion {
            series_id: None,
            intervals: vec![base],
        });
    };

    if recurrence.weekdays.is_empty() {
        return Err(EngineError::InvalidRecurrence {
            message: "recurrence is enabled but no weekdays are selected".to_string(),
        });
    }
    if recurrence.extra_weeks > policy.max_extra_weeks {
        return Err(EngineError::InvalidRecurrence {
            message: format!(
                "week count {} exceeds the maximum of {}",
                recurrence.extra_weeks, policy.max_extra_weeks
            ),
        });
    }
    for weekday in &recurrence.weekdays {
        if !policy.bookable_weekdays.contains(weekday) {
            return Err(EngineError::InvalidRecurrence {
                message: format!("{weekday} is not a bookable weekday"),
            });
        }
    }

    let start_date = template.start_time.date();
    let week_start = start_date
        - Duration::days(i64::from(start_date.weekday().num_days_from_monday()));
    let time_of_day = template.start_time.time();
    let duration = base.duration();

    // BTreeSet both de-duplicates identical (date, time) pairs and keeps
    // the instances ordered ascending by start.
    let mut starts = BTreeSet::new();
    for week_offset in 0..=i64::from(recurrence.extra_weeks) {
        for weekday in &recurrence.weekdays {
            let date = week_start
                + Duration::days(
                    week_offset * 7 + i64::from(weekday.num_days_from_monday()),
                );
            starts.insert(date.and_time(time_of_day));
        }
    }

    let intervals: Vec<Interval> = starts
        .into_iter()
        .map(|start| Interval {
            start,
            end: start + duration,
        })
        .collect();

    let series_id = if intervals.len() > 1 {
        Some(Uuid::new_v4())
    } else {
        None
    };

    Ok(Expansion {
        series_id,
        intervals,
    })
}
