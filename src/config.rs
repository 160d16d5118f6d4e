//! Run configuration and validation
//!
//! [`RunParams`] holds the parameters as given on the command line, with
//! month and year already defaulted. [`RunParams::validate`] turns them into
//! an immutable [`RunConfig`] or rejects the run before any network call.

use crate::error::{IngestError, Result};
use chrono::{Datelike, NaiveDate};
use ingestcheck_core::size::parse_human_size;

/// Default fraction of the quota at which to warn
pub const DEFAULT_WARNING_FRACTION: f64 = 0.8;

/// Unvalidated run parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Month of the year, expected 1-12
    pub month: i64,
    /// Four-digit year, not in the future
    pub year: i64,
    /// API token
    pub token: String,
    /// Tenant host name without scheme
    pub endpoint: String,
    /// Quota as a size literal, e.g. `7TB`
    pub max_allowed: String,
    /// Fraction of the quota at which to warn
    pub warning_fraction: f64,
    /// Print the per-day trace
    pub verbose: bool,
}

/// Validated parameters for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Month of the year (1-12)
    pub month: u32,
    /// Year
    pub year: i32,
    /// API token
    pub token: String,
    /// Tenant host name without scheme
    pub endpoint: String,
    /// Entitled bytes for the month, never zero
    pub quota_bytes: u64,
    /// Fraction of the quota at which to warn
    pub warning_fraction: f64,
    /// Print the per-day trace
    pub verbose: bool,
}

impl RunParams {
    /// Check the parameters against `today`
    ///
    /// Rejects a month outside 1-12, a year after the current one, an empty
    /// token or endpoint, and a quota that parses to zero bytes.
    pub fn validate(self, today: NaiveDate) -> Result<RunConfig> {
        if !(1..=12).contains(&self.month) {
            return Err(IngestError::InvalidArgument(format!(
                "month must be between 1 and 12, got {}",
                self.month
            )));
        }

        if self.year > i64::from(today.year()) {
            return Err(IngestError::InvalidArgument(format!(
                "year {} is in the future",
                self.year
            )));
        }
        let year = i32::try_from(self.year).map_err(|_| {
            IngestError::InvalidArgument(format!("year {} is out of range", self.year))
        })?;

        if self.token.is_empty() {
            return Err(IngestError::InvalidArgument("token is required".into()));
        }
        if self.endpoint.is_empty() {
            return Err(IngestError::InvalidArgument("endpoint is required".into()));
        }

        let quota_bytes = parse_human_size(&self.max_allowed);
        if quota_bytes == 0 {
            return Err(IngestError::InvalidArgument(format!(
                "maxallowed '{}' is not a non-zero size such as 7TB",
                self.max_allowed
            )));
        }

        Ok(RunConfig {
            month: self.month as u32,
            year,
            token: self.token,
            endpoint: self.endpoint,
            quota_bytes,
            warning_fraction: self.warning_fraction,
            verbose: self.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn params() -> RunParams {
        RunParams {
            month: 6,
            year: 2024,
            token: "token".into(),
            endpoint: "unit-tenant.instana.io".into(),
            max_allowed: "7TB".into(),
            warning_fraction: DEFAULT_WARNING_FRACTION,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_params() {
        let config = params().validate(today()).unwrap();
        assert_eq!(config.month, 6);
        assert_eq!(config.year, 2024);
        assert_eq!(config.quota_bytes, 7 << 40);
        assert_eq!(config.warning_fraction, 0.8);
        assert!(!config.verbose);
    }

    #[test]
    fn test_month_bounds() {
        for month in [0, 13, -1] {
            let result = RunParams { month, ..params() }.validate(today());
            assert!(matches!(result, Err(IngestError::InvalidArgument(_))));
        }
        assert!(RunParams { month: 1, ..params() }.validate(today()).is_ok());
        assert!(RunParams { month: 12, ..params() }.validate(today()).is_ok());
    }

    #[test]
    fn test_month_after_current_is_allowed() {
        let config = RunParams { month: 9, ..params() }.validate(today()).unwrap();
        assert_eq!(config.month, 9);
    }

    #[test]
    fn test_future_year_rejected() {
        assert!(RunParams { year: 2025, ..params() }.validate(today()).is_err());
        assert!(RunParams { year: 2023, ..params() }.validate(today()).is_ok());
    }

    #[test]
    fn test_year_out_of_i32_range_rejected() {
        let result = RunParams {
            year: i64::MIN,
            ..params()
        }
        .validate(today());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_token_and_endpoint_rejected() {
        assert!(
            RunParams {
                token: String::new(),
                ..params()
            }
            .validate(today())
            .is_err()
        );
        assert!(
            RunParams {
                endpoint: String::new(),
                ..params()
            }
            .validate(today())
            .is_err()
        );
    }

    #[test]
    fn test_zero_quota_rejected() {
        for max_allowed in ["", "0TB", "lots", "7XB"] {
            let result = RunParams {
                max_allowed: max_allowed.into(),
                ..params()
            }
            .validate(today());
            assert!(result.is_err(), "{max_allowed} should be rejected");
        }
    }

    #[test]
    fn test_error_names_failing_rule() {
        let err = RunParams {
            token: String::new(),
            ..params()
        }
        .validate(today())
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: token is required");
    }
}
