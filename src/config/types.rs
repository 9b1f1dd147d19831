//! Configuration types for the Booking Scheduling Engine.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Scheduling policy consumed by the recurrence expander.
///
/// The defaults match the product's fixed weekly pattern: bookings recur
/// on business days only, for at most three weeks beyond the template's
/// own week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePolicy {
    /// Maximum number of additional weeks a recurrence may cover.
    pub max_extra_weeks: u8,
    /// The weekdays a recurrence may select.
    pub bookable_weekdays: Vec<Weekday>,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            max_extra_weeks: 3,
            bookable_weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

/// On-disk representation of `policy.yaml`.
///
/// Weekdays are stored as names ("monday", "tue", ...) and parsed into
/// [`chrono::Weekday`] by the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyFile {
    /// Maximum number of additional weeks a recurrence may cover.
    #[serde(default = "default_max_extra_weeks")]
    pub max_extra_weeks: u8,
    /// The weekdays a recurrence may select, by name.
    #[serde(default = "default_bookable_weekdays")]
    pub bookable_weekdays: Vec<String>,
}

fn default_max_extra_weeks() -> u8 {
    3
}

fn default_bookable_weekdays() -> Vec<String> {
    ["monday", "tuesday", "wednesday", "thursday", "friday"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_business_days_three_weeks() {
        let policy = SchedulePolicy::default();
        assert_eq!(policy.max_extra_weeks, 3);
        assert_eq!(policy.bookable_weekdays.len(), 5);
        assert!(!policy.bookable_weekdays.contains(&Weekday::Sat));
        assert!(!policy.bookable_weekdays.contains(&Weekday::Sun));
    }

    #[test]
    fn test_policy_file_fields_default_when_absent() {
        let file: PolicyFile = serde_yaml::from_str("{}").unwrap();
        assert_eq!(file.max_extra_weeks, 3);
        assert_eq!(file.bookable_weekdays.len(), 5);
    }
}
