//! Property tests for period resolution.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use period_parser::{
    format_periods, resolve_period, synthesize_input, ClassifyError, ClassifyOptions,
    InputOptions, Token, TrackerConfig,
};
use proptest::prelude::*;

/// Anchors inside the default 2010–2019 year bounds.
fn anchor_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (2010i32..=2019, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(y, mo, d, h, mi)| {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    })
}

fn full_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2010i32..=2019, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Tokens that always resolve, whatever the anchor.
fn valid_token_strategy() -> impl Strategy<Value = Token> {
    prop_oneof![
        full_date_strategy().prop_map(|d| Token::from(d.format("%Y-%m-%d").to_string())),
        (2010i32..=2019, 1u32..=12).prop_map(|(y, m)| Token::from(format!("{y}-{m:02}"))),
        (1u32..=12).prop_map(|m| Token::from(m.to_string())),
        (2010i32..=2019).prop_map(|y| Token::from(y.to_string())),
        Just(Token::from("week")),
        Just(Token::from("today")),
        Just(Token::from("yesterday")),
    ]
}

proptest! {
    #[test]
    fn full_date_covers_exactly_one_day(date in full_date_strategy(), now in anchor_strategy()) {
        let token = Token::from(date.format("%Y-%m-%d").to_string());
        let period = resolve_period(&token, now, &ClassifyOptions::default()).unwrap();

        let start = period.start.datetime().unwrap();
        let end = period.end.datetime().unwrap();
        prop_assert_eq!(start, Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()));
        prop_assert_eq!(end - start, Duration::days(1) - Duration::milliseconds(1));
    }

    #[test]
    fn valid_tokens_never_end_before_they_start(token in valid_token_strategy(), now in anchor_strategy()) {
        let period = resolve_period(&token, now, &ClassifyOptions::default()).unwrap();
        prop_assert!(period.start <= period.end);
    }

    #[test]
    fn year_month_is_open_only_for_the_anchor_month(
        year in 2010i32..=2019,
        month in 1u32..=12,
        now in anchor_strategy(),
    ) {
        let token = Token::from(format!("{year}-{month:02}"));
        let period = resolve_period(&token, now, &ClassifyOptions::default()).unwrap();
        let is_current = year == now.year() && month == now.month();

        prop_assert_eq!(period.end == now, is_current);
        if !is_current {
            let end = period.end.datetime().unwrap();
            prop_assert_eq!((end + Duration::milliseconds(1)).day(), 1);
        }
    }

    #[test]
    fn bare_month_rolls_back_a_year_once_past_the_anchor(month in 1u32..=12, now in anchor_strategy()) {
        let period = resolve_period(&Token::from(month.to_string()), now, &ClassifyOptions::default())
            .unwrap();
        let start = period.start.datetime().unwrap();
        let expected_year = if month > now.month() { now.year() - 1 } else { now.year() };

        prop_assert_eq!(start.year(), expected_year);
        prop_assert_eq!(start.month(), month);
    }

    #[test]
    fn resolution_is_repeatable(token in valid_token_strategy(), now in anchor_strategy()) {
        let options = ClassifyOptions::default();
        prop_assert_eq!(
            resolve_period(&token, now, &options),
            resolve_period(&token, now, &options)
        );
    }

    #[test]
    fn one_bad_token_fails_the_whole_batch(
        mut tokens in prop::collection::vec(valid_token_strategy(), 0..8),
        index in any::<prop::sample::Index>(),
        now in anchor_strategy(),
    ) {
        let at = index.index(tokens.len() + 1);
        tokens.insert(at, Token::from("foo"));
        prop_assert_eq!(
            format_periods(&tokens, now, &ClassifyOptions::default()),
            Err(ClassifyError::NoMatch)
        );
    }

    #[test]
    fn valid_batches_keep_one_period_per_token(
        tokens in prop::collection::vec(valid_token_strategy(), 0..8),
        now in anchor_strategy(),
    ) {
        let periods = format_periods(&tokens, now, &ClassifyOptions::default()).unwrap();
        prop_assert_eq!(periods.len(), tokens.len());
        for (token, period) in tokens.iter().zip(&periods) {
            prop_assert_eq!(
                Ok(*period),
                resolve_period(token, now, &ClassifyOptions::default())
            );
        }
    }
}

#[test]
fn empty_request_spans_all_tracked_history() {
    let now = Utc.with_ymd_and_hms(2023, 5, 10, 12, 0, 0).unwrap();
    let config = TrackerConfig::default();
    let tokens = synthesize_input(Vec::new(), &InputOptions::default(), &config, now);
    let periods = format_periods(&tokens, now, &config.classify_options()).unwrap();

    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].start.to_string(), "2014-01-01T00:00:00.000Z");
    assert_eq!(periods[0].end.to_string(), "2023-05-10T23:59:59.999Z");
}

#[test]
fn today_then_yesterday() {
    let now = Utc.with_ymd_and_hms(2023, 5, 10, 12, 0, 0).unwrap();
    let tokens = vec![Token::from("today"), Token::from("yesterday")];
    let periods = format_periods(&tokens, now, &ClassifyOptions::default()).unwrap();

    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].start.to_string(), "2023-05-10T00:00:00.000Z");
    assert_eq!(periods[0].end.to_string(), "2023-05-10T23:59:59.999Z");
    assert_eq!(periods[1].start.to_string(), "2023-05-09T00:00:00.000Z");
    assert_eq!(periods[1].end.to_string(), "2023-05-09T23:59:59.999Z");
}
