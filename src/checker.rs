//! The check pipeline
//!
//! Fetches one month of usage from a provider, folds it into category
//! totals and evaluates the quota. Nothing here prints; the result is a
//! [`UsageReport`] that the output formatters render.

use crate::config::RunConfig;
use crate::error::Result;
use chrono_tz::Tz;
use indicatif::{ProgressBar, ProgressStyle};
use ingestcheck_core::aggregation::{CategoryTotals, DayTrace, UsageAggregation};
use ingestcheck_core::provider::UsageProvider;
use ingestcheck_core::quota::QuotaCheck;
use tracing::{debug, info};

/// Everything the report needs about one month
#[derive(Debug, Clone)]
pub struct UsageReport {
    /// Month of the year (1-12)
    pub month: u32,
    /// Year
    pub year: i32,
    /// Bytes per category
    pub totals: CategoryTotals,
    /// Per-day matched counters, in the order received
    pub trace: Vec<DayTrace>,
    /// Quota evaluation of the overall total
    pub quota: QuotaCheck,
    /// Counters skipped because their name was not recognized
    pub ignored_counters: usize,
}

impl UsageReport {
    /// Whether the warning threshold was reached
    pub fn threshold_exceeded(&self) -> bool {
        self.quota.exceeded
    }
}

/// Runs the fetch, aggregate and evaluate stages
pub struct Checker {
    trace_zone: Tz,
    show_progress: bool,
}

impl Checker {
    /// Create a checker rendering day timestamps in the given timezone
    pub fn new(trace_zone: Tz) -> Self {
        Self {
            trace_zone,
            show_progress: false,
        }
    }

    /// Show a spinner on stderr while waiting for the usage API
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Check one month of usage against the configured quota
    pub async fn run<P>(&self, config: &RunConfig, provider: &P) -> Result<UsageReport>
    where
        P: UsageProvider + ?Sized,
    {
        info!(
            "Checking usage for {}/{} against a quota of {} bytes",
            config.month, config.year, config.quota_bytes
        );

        let progress = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) =
                ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")
            {
                pb.set_style(style);
            }
            pb.set_message(format!(
                "Fetching usage for {}/{}",
                config.month, config.year
            ));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let fetched = provider.fetch_usage(config.month, config.year).await;
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        let days = fetched?;

        let mut aggregation = UsageAggregation::new(self.trace_zone);
        aggregation.fold_days(&days);
        let ignored_counters = aggregation.ignored_counters();
        let (totals, trace) = aggregation.into_parts();
        debug!(
            "Aggregated {} days, ignored {} counters",
            trace.len(),
            ignored_counters
        );

        let quota = QuotaCheck::evaluate(totals.total(), config.quota_bytes, config.warning_fraction);
        info!(
            "Usage {} bytes, limit {} bytes, exceeded: {}",
            quota.usage_total, quota.limit, quota.exceeded
        );

        Ok(UsageReport {
            month: config.month,
            year: config.year,
            totals,
            trace,
            quota,
            ignored_counters,
        })
    }
}
