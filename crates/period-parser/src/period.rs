//! Reporting-period resolution.
//!
//! Turns user tokens (`2015-06-15`, `2015-06`, `6`, `2015`, `week`, `today`,
//! `yesterday`, or an explicit `{from, to}` range) into [`Period`]s: pairs of
//! UTC boundaries. All functions take the reference "now" as an explicit
//! argument and never read the system clock, so a whole batch is evaluated
//! against one snapshot.
//!
//! # Dispatch
//!
//! Text tokens are matched against an ordered resolver table; the first
//! resolver that recognizes the token's shape decides the outcome. A token
//! no resolver recognizes is rejected with [`ClassifyError::BadDateFormat`]
//! if it still parses as some date, or [`ClassifyError::NoMatch`] otherwise.
//!
//! # Open periods
//!
//! A year-month or year token naming the anchor's own month or year ends at
//! the anchor itself rather than at the end of the month or year.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ClassifyError, ConfigError, Result};

/// Output format for boundaries: millisecond precision, `Z` suffix.
pub const BOUNDARY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

static FULL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-\d{2}-\d{2}$").expect("full date pattern"));
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])$").expect("year-month pattern"));
// `0` and `00` are deliberately not months: they would roll back to the
// previous December. They fall through to the fallback as `ENOMATCH`.
static MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0?[1-9]|1[0-2])$").expect("month pattern"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("year pattern"));
static LOOSE_YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("loose year-month pattern"));
static DATE_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})T(\d{2})$").expect("date-hour pattern"));
static WEEK_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-?W(\d{2})(?:-?(\d))?$").expect("week date pattern"));
static ORDINAL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-?(\d{3})$").expect("ordinal date pattern"));

// ── Options ─────────────────────────────────────────────────────────────────

/// Which day begins the week resolved by the `week` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// ISO 8601 (Monday = day 0 of the week).
    Monday,
    /// US convention (Sunday = day 0 of the week).
    #[default]
    Sunday,
}

/// How many days `weekday` is from the week-start day.
fn days_from_week_start(weekday: Weekday, week_start: WeekStartDay) -> i64 {
    match week_start {
        WeekStartDay::Monday => weekday.num_days_from_monday() as i64,
        WeekStartDay::Sunday => weekday.num_days_from_sunday() as i64,
    }
}

/// Inclusive range of years accepted by the `YYYY`, `YYYY-MM` and
/// `YYYY-MM-DD` token shapes.
///
/// Defaults to 2010–2019. Tokens outside the range are not rejected outright:
/// they fall through to the fallback and come back as
/// [`ClassifyError::BadDateFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    pub fn new(min: i32, max: i32) -> std::result::Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidYearBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: 2010,
            max: 2019,
        }
    }
}

/// Options for [`resolve_period`] and [`format_periods`].
#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    /// Years accepted by the numeric token shapes.
    pub years: YearBounds,
    /// Which day starts the week for the `week` keyword.
    pub week_start: WeekStartDay,
}

// ── Tokens and periods ──────────────────────────────────────────────────────

/// One user-supplied period designator.
///
/// Deserializes from either a JSON string or a `{"from": .., "to": ..}` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Text(String),
    Range { from: String, to: String },
}

impl Token {
    pub fn range(from: impl Into<String>, to: impl Into<String>) -> Self {
        Token::Range {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Text(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Text(s)
    }
}

/// One end of a [`Period`].
///
/// `Invalid` only ever comes out of a range token whose `from` or `to` did not
/// parse; every other token shape yields `At` on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Boundary {
    At(DateTime<Utc>),
    Invalid,
}

impl Boundary {
    /// Parse leniently, yielding `Invalid` instead of failing.
    pub fn parse(s: &str) -> Self {
        parse_lenient(s).map_or(Boundary::Invalid, Boundary::At)
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Boundary::At(dt) => Some(*dt),
            Boundary::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Boundary::At(_))
    }
}

impl From<DateTime<Utc>> for Boundary {
    fn from(dt: DateTime<Utc>) -> Self {
        Boundary::At(dt)
    }
}

impl PartialEq<DateTime<Utc>> for Boundary {
    fn eq(&self, other: &DateTime<Utc>) -> bool {
        self.datetime().as_ref() == Some(other)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::At(dt) => write!(f, "{}", dt.format(BOUNDARY_FORMAT)),
            Boundary::Invalid => f.write_str("Invalid date"),
        }
    }
}

impl Serialize for Boundary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved `[start, end]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: Boundary,
    pub end: Boundary,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Boundary::At(start),
            end: Boundary::At(end),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_valid() && self.end.is_valid()
    }
}

// ── resolve_period / format_periods ─────────────────────────────────────────

/// Per-batch snapshot shared by every resolver.
struct Context<'a> {
    anchor: DateTime<Utc>,
    /// The anchor's `YYYY-MM`, compared textually against year-month tokens.
    current_month: String,
    options: &'a ClassifyOptions,
}

impl<'a> Context<'a> {
    fn new(anchor: DateTime<Utc>, options: &'a ClassifyOptions) -> Self {
        Self {
            anchor,
            current_month: anchor.format("%Y-%m").to_string(),
            options,
        }
    }
}

/// A resolver returns `None` when the token is not its shape.
type Resolver = fn(&str, &Context<'_>) -> Option<Result<Period>>;

/// Text token shapes in priority order.
const RESOLVERS: &[(&str, Resolver)] = &[
    ("full date", try_full_date),
    ("year-month", try_year_month),
    ("month", try_month),
    ("year", try_year),
    ("week", try_week),
    ("today", try_today),
    ("yesterday", try_yesterday),
];

/// Resolve a single token against `anchor`.
///
/// # Errors
///
/// - [`ClassifyError::InvalidDate`] for a `YYYY-MM-DD` token that is not a calendar day
/// - [`ClassifyError::BadDateFormat`] for a date-like token of an unsupported shape
/// - [`ClassifyError::NoMatch`] for anything else
///
/// Range tokens never fail; unparseable boundaries become [`Boundary::Invalid`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use period_parser::{resolve_period, ClassifyOptions, Token};
///
/// let anchor = Utc.with_ymd_and_hms(2015, 6, 10, 12, 0, 0).unwrap();
/// let period = resolve_period(&Token::from("2015-06-15"), anchor, &ClassifyOptions::default()).unwrap();
/// assert_eq!(period.start.to_string(), "2015-06-15T00:00:00.000Z");
/// assert_eq!(period.end.to_string(), "2015-06-15T23:59:59.999Z");
/// ```
pub fn resolve_period(
    token: &Token,
    anchor: DateTime<Utc>,
    options: &ClassifyOptions,
) -> Result<Period> {
    resolve_in(token, &Context::new(anchor, options))
}

/// Resolve every token in order against one `anchor`.
///
/// Stops at the first token that fails and returns only that error; periods
/// resolved before it are dropped.
pub fn format_periods(
    tokens: &[Token],
    anchor: DateTime<Utc>,
    options: &ClassifyOptions,
) -> Result<Vec<Period>> {
    let ctx = Context::new(anchor, options);
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            trace!("resolving token #{index}: {token:?}");
            resolve_in(token, &ctx)
        })
        .collect()
}

fn resolve_in(token: &Token, ctx: &Context<'_>) -> Result<Period> {
    let text = match token {
        Token::Range { from, to } => {
            let period = Period {
                start: Boundary::parse(from),
                end: Boundary::parse(to),
            };
            if !period.is_valid() {
                debug!("range '{from}'..'{to}' has an unparseable boundary");
            }
            return Ok(period);
        }
        Token::Text(text) => text.as_str(),
    };

    for (shape, resolve) in RESOLVERS {
        if let Some(result) = resolve(text, ctx) {
            debug!("token '{text}' matched {shape}");
            return result;
        }
    }

    let err = if parse_lenient(text).is_some() {
        ClassifyError::BadDateFormat
    } else {
        ClassifyError::NoMatch
    };
    debug!("token '{text}' rejected: {err}");
    Err(err)
}

// ── Resolvers ───────────────────────────────────────────────────────────────

/// `YYYY-MM-DD` → that whole day.
fn try_full_date(s: &str, ctx: &Context<'_>) -> Option<Result<Period>> {
    let caps = FULL_DATE.captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    if !ctx.options.years.contains(year) {
        return None;
    }
    let period = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(day_period)
        .ok_or(ClassifyError::InvalidDate);
    Some(period)
}

/// `YYYY-MM` → that month, open-ended if it is the anchor's month.
fn try_year_month(s: &str, ctx: &Context<'_>) -> Option<Result<Period>> {
    let caps = YEAR_MONTH.captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    if !ctx.options.years.contains(year) {
        return None;
    }
    let month: u32 = caps[2].parse().ok()?;
    Some(month_period(year, month, ctx).ok_or(ClassifyError::InvalidDate))
}

/// `M` / `MM` → the most recent such month: this year's if it has started,
/// otherwise last year's.
fn try_month(s: &str, ctx: &Context<'_>) -> Option<Result<Period>> {
    if !MONTH.is_match(s) {
        return None;
    }
    let month: u32 = s.parse().ok()?;
    let year = if month > ctx.anchor.month() {
        ctx.anchor.year() - 1
    } else {
        ctx.anchor.year()
    };
    Some(month_period(year, month, ctx).ok_or(ClassifyError::InvalidDate))
}

/// `YYYY` → that year, open-ended if it is the anchor's year.
fn try_year(s: &str, ctx: &Context<'_>) -> Option<Result<Period>> {
    if !YEAR.is_match(s) {
        return None;
    }
    let year: i32 = s.parse().ok()?;
    if !ctx.options.years.contains(year) {
        return None;
    }
    Some(year_period(year, ctx).ok_or(ClassifyError::InvalidDate))
}

fn try_week(s: &str, ctx: &Context<'_>) -> Option<Result<Period>> {
    if s != "week" {
        return None;
    }
    Some(week_period(ctx).ok_or(ClassifyError::InvalidDate))
}

fn try_today(s: &str, ctx: &Context<'_>) -> Option<Result<Period>> {
    if s != "today" {
        return None;
    }
    Some(day_period(ctx.anchor.date_naive()).ok_or(ClassifyError::InvalidDate))
}

fn try_yesterday(s: &str, ctx: &Context<'_>) -> Option<Result<Period>> {
    if s != "yesterday" {
        return None;
    }
    let period = ctx.anchor.date_naive().pred_opt().and_then(day_period);
    Some(period.ok_or(ClassifyError::InvalidDate))
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// First instant of `year`-`month`; the end is the anchor when that month is
/// the anchor's own, otherwise the last millisecond of the month.
fn month_period(year: i32, month: u32, ctx: &Context<'_>) -> Option<Period> {
    let start = start_of_day(NaiveDate::from_ymd_opt(year, month, 1)?)?;
    let end = if format!("{year:04}-{month:02}") == ctx.current_month {
        ctx.anchor
    } else {
        let (y, m) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last_day = NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()?;
        end_of_day(last_day)?
    };
    Some(Period::new(start, end))
}

/// Jan 1 through Dec 31, or through the anchor in the anchor's own year.
fn year_period(year: i32, ctx: &Context<'_>) -> Option<Period> {
    let start = start_of_day(NaiveDate::from_ymd_opt(year, 1, 1)?)?;
    let end = if year == ctx.anchor.year() {
        ctx.anchor
    } else {
        end_of_day(NaiveDate::from_ymd_opt(year, 12, 31)?)?
    };
    Some(Period::new(start, end))
}

fn week_period(ctx: &Context<'_>) -> Option<Period> {
    let today = ctx.anchor.date_naive();
    let days_since_start = days_from_week_start(today.weekday(), ctx.options.week_start);
    let first = today - chrono::Duration::days(days_since_start);
    let last = first + chrono::Duration::days(6);
    Some(Period::new(start_of_day(first)?, end_of_day(last)?))
}

fn day_period(date: NaiveDate) -> Option<Period> {
    Some(Period::new(start_of_day(date)?, end_of_day(date)?))
}

pub(crate) fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

pub(crate) fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_milli_opt(23, 59, 59, 999)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Parse anything that looks like a date, the way a permissive date library
/// would: RFC 3339; ISO 8601 date-times without offset (taken as UTC) in
/// extended or basic form, down to hour precision; calendar, ordinal and
/// week dates; `YYYY-MM`; `YYYY`; and slash-separated `YYYY/MM/DD` or
/// `MM/DD/YYYY`.
///
/// Used both for range boundaries and to tell "date-like but unsupported"
/// tokens apart from noise.
pub fn parse_lenient(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| try_naive_datetime(s))
        .or_else(|| try_date_hour(s))
        .or_else(|| try_calendar_date(s).and_then(start_of_day))
        .or_else(|| try_week_date(s).and_then(start_of_day))
        .or_else(|| try_ordinal_date(s).and_then(start_of_day))
        .or_else(|| try_loose_year_month(s).and_then(start_of_day))
        .or_else(|| try_loose_year(s).and_then(start_of_day))
}

fn try_naive_datetime(s: &str) -> Option<DateTime<Utc>> {
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y%m%dT%H%M%S%.f",
        "%Y%m%dT%H%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ]
    .into_iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `YYYY-MM-DDTHH`: chrono will not parse a time without minutes.
fn try_date_hour(s: &str) -> Option<DateTime<Utc>> {
    let caps = DATE_HOUR.captures(s)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    let hour: u32 = caps[2].parse().ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0)?))
}

fn try_calendar_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d", "%m/%d/%Y"]
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `YYYY-Www[-D]`, extended or basic; a missing weekday means Monday.
fn try_week_date(s: &str) -> Option<NaiveDate> {
    let caps = WEEK_DATE.captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    let week: u32 = caps[2].parse().ok()?;
    let weekday = match caps.get(3).map(|m| m.as_str()) {
        None | Some("1") => Weekday::Mon,
        Some("2") => Weekday::Tue,
        Some("3") => Weekday::Wed,
        Some("4") => Weekday::Thu,
        Some("5") => Weekday::Fri,
        Some("6") => Weekday::Sat,
        Some("7") => Weekday::Sun,
        Some(_) => return None,
    };
    NaiveDate::from_isoywd_opt(year, week, weekday)
}

/// `YYYY-DDD` or `YYYYDDD`.
fn try_ordinal_date(s: &str) -> Option<NaiveDate> {
    let caps = ORDINAL_DATE.captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    let ordinal: u32 = caps[2].parse().ok()?;
    NaiveDate::from_yo_opt(year, ordinal)
}

fn try_loose_year_month(s: &str) -> Option<NaiveDate> {
    let caps = LOOSE_YEAR_MONTH.captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn try_loose_year(s: &str) -> Option<NaiveDate> {
    if !YEAR.is_match(s) {
        return None;
    }
    NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)
}
