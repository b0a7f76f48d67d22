//! # period-parser
//!
//! Deterministic reporting-period resolution.
//!
//! Turns the date tokens a user types on the command line (`2015-06-15`,
//! `2015-06`, `6`, `2015`, `week`, `today`, `yesterday`, or an explicit
//! `{from, to}` range) into ordered `[start, end]` pairs of UTC instants.
//! Everything is evaluated against a caller-supplied "now", so a batch is
//! reproducible and never observes the clock moving mid-way.
//!
//! ## Modules
//!
//! - [`period`] — token classification and batch formatting
//! - [`input`] — default range synthesis from `--from` / `--to` or empty input
//! - [`config`] — tracking start date, year bounds, week start
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use period_parser::{format_periods, synthesize_input, InputOptions, Token, TrackerConfig};
//!
//! let now = Utc.with_ymd_and_hms(2015, 6, 10, 12, 30, 0).unwrap();
//! let config = TrackerConfig::default();
//! let tokens = synthesize_input(vec![Token::from("2015-05")], &InputOptions::default(), &config, now);
//! let periods = format_periods(&tokens, now, &config.classify_options()).unwrap();
//! assert_eq!(periods[0].end.to_string(), "2015-05-31T23:59:59.999Z");
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod period;

pub use config::{TrackerConfig, DEFAULT_START_DATE};
pub use error::{ClassifyError, ConfigError};
pub use input::{synthesize_input, InputOptions};
pub use period::{
    format_periods, parse_lenient, resolve_period, Boundary, ClassifyOptions, Period, Token,
    WeekStartDay, YearBounds,
};
