//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the
//! scheduling policy from a YAML file.

use std::fs;
use std::path::Path;

use chrono::Weekday;

use crate::error::{EngineError, EngineResult};

use super::types::{PolicyFile, SchedulePolicy};

/// Loads and provides access to the scheduling policy.
///
/// # Example
///
/// ```no_run
/// use booking_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/policy.yaml").unwrap();
/// let policy = loader.policy();
/// assert!(policy.max_extra_weeks <= 3);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: SchedulePolicy,
}

impl ConfigLoader {
    /// Loads the policy from the specified YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigNotFound`] if the file is missing and
    /// [`EngineError::ConfigParseError`] if it contains invalid YAML or an
    /// unknown weekday name.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml(&content, &path_str)
    }

    /// Builds a loader with the default policy (business days, at most
    /// three extra weeks), for callers that supply no config file.
    pub fn with_defaults() -> Self {
        Self {
            policy: SchedulePolicy::default(),
        }
    }

    /// Returns the loaded scheduling policy.
    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    fn from_yaml(content: &str, path: &str) -> EngineResult<Self> {
        let file: PolicyFile =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let mut bookable_weekdays = Vec::with_capacity(file.bookable_weekdays.len());
        for name in &file.bookable_weekdays {
            let weekday: Weekday =
                name.parse()
                    .map_err(|_| EngineError::ConfigParseError {
                        path: path.to_string(),
                        message: format!("unknown weekday name '{name}'"),
                    })?;
            bookable_weekdays.push(weekday);
        }

        Ok(Self {
            policy: SchedulePolicy {
                max_extra_weeks: file.max_extra_weeks,
                bookable_weekdays,
            },
        })
    }
}
