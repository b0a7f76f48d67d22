//! `periods` — resolve date tokens into UTC reporting periods.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::debug;

use period_parser::{format_periods, synthesize_input, InputOptions, Token, TrackerConfig};

#[derive(Parser)]
#[command(name = "periods")]
#[command(version, about = "Resolve date tokens into UTC reporting periods")]
struct Cli {
    /// Period tokens: YYYY-MM-DD, YYYY-MM, M, YYYY, week, today, yesterday
    tokens: Vec<String>,

    /// Start of a custom range (defaults to the tracking start date)
    #[arg(long)]
    from: Option<String>,

    /// End of a custom range (defaults to now)
    #[arg(long)]
    to: Option<String>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured tracking start date
    #[arg(long)]
    start_date: Option<String>,

    /// Reference instant (RFC 3339) used instead of the current time
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Print periods as a JSON array
    #[arg(long)]
    json: bool,
}

fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => TrackerConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TrackerConfig::default(),
    };
    if let Some(start_date) = cli.start_date {
        config = config.with_start_date(start_date)?;
    }

    let now = cli.now.unwrap_or_else(Utc::now);
    debug!("reference instant {now}");

    let options = InputOptions {
        from: cli.from,
        to: cli.to,
    };
    let tokens: Vec<Token> = cli.tokens.into_iter().map(Token::from).collect();
    let tokens = synthesize_input(tokens, &options, &config, now);

    let periods = format_periods(&tokens, now, &config.classify_options())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&periods)?);
    } else {
        for period in &periods {
            println!("{}\t{}", period.start, period.end);
        }
    }
    Ok(())
}
