//! Output formatting module for ingestcheck
//!
//! This module renders a [`UsageReport`] either as the plain-text report
//! operators read in cron mail, or as JSON for scripts and dashboards.
//!
//! # Examples
//!
//! ```no_run
//! use ingestcheck::checker::UsageReport;
//! use ingestcheck::output::get_formatter;
//!
//! fn print(report: &UsageReport) {
//!     let formatter = get_formatter(false, true);
//!     print!("{}", formatter.format_report(report));
//! }
//! ```

use crate::checker::UsageReport;
use crate::error::IngestError;
use chrono::Month;
use colored::Colorize;
use ingestcheck_core::aggregation::DayTrace;
use ingestcheck_core::size::{format_number, humanize_bytes};
use serde_json::json;
use std::io::{self, Write};

/// Width of the right-aligned labels in the totals block
const LABEL_WIDTH: usize = 14;

/// Width of the right-aligned tags in the day trace
const TAG_WIDTH: usize = 9;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a complete usage report
    fn format_report(&self, report: &UsageReport) -> String;
}

/// Plain-text formatter
pub struct TextFormatter {
    /// Include the per-day trace
    pub verbose: bool,
    /// Highlight the threshold warning
    pub colored_output: bool,
}

impl TextFormatter {
    /// Create a new TextFormatter
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            colored_output: false,
        }
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, colored_output: bool) -> Self {
        self.colored_output = colored_output;
        self
    }

    fn format_day(out: &mut String, day: &DayTrace) {
        match &day.timestamp {
            Some(ts) => out.push_str(&format!("{}\n", ts.format("%Y-%m-%d %H:%M:%S %z %Z"))),
            None => out.push_str(&format!("{} ms since epoch\n", day.timestamp_millis)),
        }
        for entry in &day.entries {
            out.push_str(&format!(
                "  {:>width$}, {}\n",
                entry.category.trace_tag(),
                humanize_bytes(entry.bytes),
                width = TAG_WIDTH
            ));
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_report(&self, report: &UsageReport) -> String {
        let mut out = String::new();

        if self.verbose {
            for day in &report.trace {
                Self::format_day(&mut out, day);
            }
            out.push('\n');
        }

        out.push_str("Totals:\n");
        for (category, bytes) in report.totals.iter() {
            out.push_str(&format!(
                "{:>width$}: {}\n",
                category.label(),
                humanize_bytes(bytes),
                width = LABEL_WIDTH
            ));
        }

        let quota = &report.quota;
        out.push_str(&format!(
            "\nTotal Usage for month {} {}: {} ({}) ({}%)\n",
            month_name(report.month),
            report.year,
            humanize_bytes(quota.usage_total),
            format_number(quota.usage_total),
            quota.percent
        ));

        if quota.exceeded {
            let warning = "Threshold warning!";
            if self.colored_output {
                out.push_str(&format!("\n{}\n", warning.red().bold()));
            } else {
                out.push_str(&format!("\n{warning}\n"));
            }
        }

        out
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Include the per-day trace
    pub verbose: bool,
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &UsageReport) -> String {
        let quota = &report.quota;
        let mut output = json!({
            "month": report.month,
            "year": report.year,
            "categories": report.totals,
            "total_bytes": quota.usage_total,
            "quota_bytes": quota.quota_bytes,
            "threshold": quota.warning_fraction,
            "limit_bytes": quota.limit,
            "percent": quota.percent,
            "exceeded": quota.exceeded,
            "ignored_counters": report.ignored_counters,
        });

        if self.verbose {
            output["days"] = json!(report.trace.iter().map(|day| json!({
                "time": day.timestamp_millis,
                "timestamp": day.timestamp.map(|ts| ts.to_rfc3339()),
                "entries": day.entries,
            })).collect::<Vec<_>>());
        }

        let mut rendered =
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string());
        rendered.push('\n');
        rendered
    }
}

/// Write the diagnostic for a failed check
///
/// A decode failure is followed by the response body that could not be
/// parsed, so an error page from the tenant can be read as is.
pub fn write_failure<W: Write>(out: &mut W, err: &IngestError) -> io::Result<()> {
    writeln!(out, "{err}")?;
    if let Some(body) = err.response_body() {
        writeln!(out, "Response received: {body}")?;
    }
    Ok(())
}

/// English month name, or the number if out of range
fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Get the formatter for the requested output mode
pub fn get_formatter(json: bool, verbose: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter { verbose })
    } else {
        let colored_output = std::env::var("NO_COLOR").is_err()
            && is_terminal::is_terminal(std::io::stdout());
        Box::new(TextFormatter::new(verbose).with_color(colored_output))
    }
}
