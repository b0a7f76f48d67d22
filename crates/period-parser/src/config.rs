//! Tracking configuration.
//!
//! Loaded from JSON; every field is optional and falls back to
//! [`TrackerConfig::default`]:
//!
//! ```json
//! {
//!   "start_date": "2014-01-01",
//!   "years": { "min": 2010, "max": 2019 },
//!   "week_start": "sunday"
//! }
//! ```
//!
//! Either year bound may be omitted; the other keeps its default.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::period::{parse_lenient, ClassifyOptions, WeekStartDay, YearBounds};

/// Default tracking start date when none is configured.
pub const DEFAULT_START_DATE: &str = "2014-01-01";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// When tracking began; the lower bound of the default period.
    pub start_date: String,
    /// Years accepted by the numeric token shapes.
    pub years: YearBounds,
    /// Which day starts the week for the `week` keyword.
    pub week_start: WeekStartDay,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            start_date: DEFAULT_START_DATE.to_string(),
            years: YearBounds::default(),
            week_start: WeekStartDay::default(),
        }
    }
}

impl TrackerConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("loading config from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace the start date, re-validating it.
    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Result<Self, ConfigError> {
        self.start_date = start_date.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if parse_lenient(&self.start_date).is_none() {
            return Err(ConfigError::InvalidStartDate(self.start_date.clone()));
        }
        YearBounds::new(self.years.min, self.years.max)?;
        Ok(())
    }

    /// The subset of the config the classifier needs.
    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            years: self.years,
            week_start: self.week_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = TrackerConfig::from_json("{}").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.start_date, "2014-01-01");
        assert_eq!(config.years, YearBounds { min: 2010, max: 2019 });
        assert_eq!(config.week_start, WeekStartDay::Sunday);
    }

    #[test]
    fn test_full_document() {
        let config = TrackerConfig::from_json(
            r#"{"start_date": "2015-03-01T00:00:00Z", "years": {"min": 2015, "max": 2030}, "week_start": "monday"}"#,
        )
        .unwrap();
        assert_eq!(config.start_date, "2015-03-01T00:00:00Z");
        let options = config.classify_options();
        assert_eq!(options.years, YearBounds { min: 2015, max: 2030 });
        assert_eq!(options.week_start, WeekStartDay::Monday);
    }

    #[test]
    fn test_partial_years_keep_default_bound() {
        let config = TrackerConfig::from_json(r#"{"years": {"min": 2015}}"#).unwrap();
        assert_eq!(config.years, YearBounds { min: 2015, max: 2019 });

        let config = TrackerConfig::from_json(r#"{"years": {"max": 2029}}"#).unwrap();
        assert_eq!(config.years, YearBounds { min: 2010, max: 2029 });
    }

    #[test]
    fn test_rejects_unparseable_start_date() {
        let err = TrackerConfig::from_json(r#"{"start_date": "whenever"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStartDate(ref s) if s == "whenever"));
    }

    #[test]
    fn test_rejects_inverted_years() {
        let err = TrackerConfig::from_json(r#"{"years": {"min": 2020, "max": 2010}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYearBounds { .. }));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = TrackerConfig::from_json(r#"{"startDate": "2014-01-01"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TrackerConfig::from_path("/nonexistent/period-parser.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_with_start_date() {
        let config = TrackerConfig::default().with_start_date("2016-05-01").unwrap();
        assert_eq!(config.start_date, "2016-05-01");
        assert!(TrackerConfig::default().with_start_date("later").is_err());
    }
}
