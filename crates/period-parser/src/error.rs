//! Error types for period-parser operations.

use serde::Serialize;
use thiserror::Error;

/// Why a single token could not be turned into a [`Period`](crate::Period).
///
/// The set is closed and carries no payload: callers match on the kind or
/// read the stable [`code`](ClassifyError::code).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClassifyError {
    /// Shaped like a full date, but not a day on the calendar (e.g. `2015-02-30`).
    #[error("EINVALIDDATE")]
    #[serde(rename = "EINVALIDDATE")]
    InvalidDate,

    /// Parseable as a date, but not one of the supported token shapes.
    #[error("EBADDATEFORMAT")]
    #[serde(rename = "EBADDATEFORMAT")]
    BadDateFormat,

    /// Not a date at all.
    #[error("ENOMATCH")]
    #[serde(rename = "ENOMATCH")]
    NoMatch,
}

impl ClassifyError {
    /// The stable error code reported to users.
    pub fn code(self) -> &'static str {
        match self {
            ClassifyError::InvalidDate => "EINVALIDDATE",
            ClassifyError::BadDateFormat => "EBADDATEFORMAT",
            ClassifyError::NoMatch => "ENOMATCH",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid start date: '{0}'")]
    InvalidStartDate(String),

    #[error("Invalid year bounds: {min} > {max}")]
    InvalidYearBounds { min: i32, max: i32 },
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
