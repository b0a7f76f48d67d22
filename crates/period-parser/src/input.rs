//! Default token synthesis.
//!
//! Runs before [`format_periods`](crate::format_periods): turns `--from` /
//! `--to` style boundaries, or an empty request, into an explicit range token.

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::TrackerConfig;
use crate::period::{end_of_day, Token};

/// Format of synthesized range boundaries (UTC, no offset suffix).
const RANGE_BOUNDARY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Explicit custom-range boundaries supplied alongside the tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOptions {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl InputOptions {
    fn explicit_from(&self) -> Option<&str> {
        self.from.as_deref().filter(|s| !s.is_empty())
    }

    fn explicit_to(&self) -> Option<&str> {
        self.to.as_deref().filter(|s| !s.is_empty())
    }
}

/// Append the range token implied by `options` and `config`, if any.
///
/// - With `from` and/or `to`: appends `{from or start_date, to or anchor}`.
/// - Otherwise, with no tokens: appends `{start_date, end of the anchor's day}`,
///   i.e. all tracked history.
/// - Otherwise the tokens are returned unchanged.
///
/// At most one token is appended; an explicit range takes precedence.
pub fn synthesize_input(
    mut tokens: Vec<Token>,
    options: &InputOptions,
    config: &TrackerConfig,
    anchor: DateTime<Utc>,
) -> Vec<Token> {
    if options.explicit_from().is_some() || options.explicit_to().is_some() {
        let from = options
            .explicit_from()
            .unwrap_or(config.start_date.as_str())
            .to_string();
        let to = options
            .explicit_to()
            .map(str::to_string)
            .unwrap_or_else(|| format_boundary(anchor));
        debug!("synthesized custom range {from}..{to}");
        tokens.push(Token::Range { from, to });
    } else if tokens.is_empty() {
        let end_of_today = end_of_day(anchor.date_naive()).unwrap_or(anchor);
        let token = Token::range(config.start_date.as_str(), format_boundary(end_of_today));
        debug!("no tokens given, synthesized full history {token:?}");
        tokens.push(token);
    }
    tokens
}

fn format_boundary(dt: DateTime<Utc>) -> String {
    dt.format(RANGE_BOUNDARY_FORMAT).to_string()
}
