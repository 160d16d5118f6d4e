//! CLI interface for ingestcheck
//!
//! This module defines the command-line interface using clap. Flags are
//! long options (`--month`, `--token`, ...); the single-dash spelling used by
//! older cron jobs (`-month 3`, `-token=...`) is accepted as well and
//! rewritten by [`normalize_legacy_flags`] before parsing.
//!
//! # Example
//!
//! ```bash
//! # Warn once the current month reaches 70% of a 7 TB entitlement
//! ingestcheck --token TOKEN --endpoint unit-tenant.instana.io --maxallowed 7TB --threshold 0.7
//!
//! # Inspect a past month day by day
//! ingestcheck --month 3 --year 2024 --maxallowed 7TB --verbose
//! ```

use crate::config::{DEFAULT_WARNING_FRACTION, RunParams};
use chrono::{Datelike, NaiveDate};
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;

const ABOUT: &str = "Check the amount of data ingested by an Instana tenant and produce a warning \
if it exceeds the specified threshold; exits 1 if the threshold is reached, 0 otherwise.";

const EXAMPLE: &str = "Example: check current month usage and produce a warning if the total \
ingested data is at 70% of the allowed ingested data.

    ingestcheck --token TOKEN --endpoint unit-tenant.instana.io --maxallowed 7TB --threshold 0.7";

/// Long option names that may also be written with a single dash
const LEGACY_FLAGS: &[&str] = &[
    "month",
    "year",
    "token",
    "endpoint",
    "maxallowed",
    "threshold",
    "verbose",
    "json",
    "timezone",
    "utc",
    "quiet",
    "help",
    "version",
];

/// Check ingested data volume against the entitled quota
#[derive(Parser, Debug, Clone)]
#[command(name = "ingestcheck")]
#[command(version, about = ABOUT, long_about = None, after_help = EXAMPLE)]
pub struct Cli {
    /// The month of the year to request data for (skip for current month)
    #[arg(long, allow_negative_numbers = true)]
    pub month: Option<i64>,

    /// The year (skip for current year)
    #[arg(long, allow_negative_numbers = true)]
    pub year: Option<i64>,

    /// The authentication token to use (required)
    #[arg(long, env = "INSTANA_API_TOKEN", hide_env_values = true, default_value = "")]
    pub token: String,

    /// The endpoint to connect to (e.g. unit-tenant.instana.io, required)
    #[arg(long, env = "INSTANA_ENDPOINT", default_value = "")]
    pub endpoint: String,

    /// The maximum entitled data usage in MB, GB or TB (e.g. 7TB, required)
    #[arg(long, default_value = "")]
    pub maxallowed: String,

    /// The fraction of the allowed usage at which to warn
    #[arg(long, default_value_t = DEFAULT_WARNING_FRACTION, allow_negative_numbers = true)]
    pub threshold: f64,

    /// Verbose output for each day
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub verbose: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Timezone for day timestamps (e.g. "Europe/Berlin", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z')]
    pub timezone: Option<String>,

    /// Use UTC for day timestamps (overrides --timezone)
    #[arg(long)]
    pub utc: bool,

    /// Only log errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }

    /// Fill in month and year from `today` where they were not given
    pub fn run_params(&self, today: NaiveDate) -> RunParams {
        RunParams {
            month: self.month.unwrap_or_else(|| i64::from(today.month())),
            year: self.year.unwrap_or_else(|| i64::from(today.year())),
            token: self.token.clone(),
            endpoint: self.endpoint.clone(),
            max_allowed: self.maxallowed.clone(),
            warning_fraction: self.threshold,
            verbose: self.verbose,
        }
    }
}

/// Usage text printed when a run is rejected
pub fn usage_text() -> String {
    Cli::command().render_long_help().to_string()
}

/// Rewrite `-name` and `-name=value` to their `--` form for known long flags
///
/// The first argument (the program name) and everything after a `--`
/// terminator are left untouched.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut terminated = false;

    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || terminated {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                terminated = true;
                return arg;
            }
            match s.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if LEGACY_FLAGS.iter().any(|flag| *flag == name) {
                        OsString::from(format!("-{s}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
