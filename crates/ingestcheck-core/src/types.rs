//! Core domain types for ingestcheck
//!
//! These types model one month of ingestion usage as reported by the
//! upstream usage API: a sequence of days, each holding named byte counters,
//! and the closed set of counter categories that count against the quota.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized ingestion counter categories
///
/// The variant order is the order used in reports. Counter names outside
/// this set are ignored so that new upstream counters do not break a run.
///
/// # Examples
/// ```
/// use ingestcheck_core::types::Category;
///
/// let category = Category::from_counter_name("bytes_ingested_traces_otlp_acceptor");
/// assert_eq!(category, Some(Category::OtlpTraces));
/// assert_eq!(Category::from_counter_name("bytes_ingested_logs_acceptor"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Infrastructure monitoring data
    Infrastructure,
    /// Traces received over OTLP
    OtlpTraces,
    /// Traces received from agents
    AgentTraces,
    /// Mobile end-user monitoring
    Mobile,
    /// End-user monitoring spans
    Spans,
    /// Website end-user monitoring
    Website,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 6;

    /// All categories in report order
    pub const ALL: [Category; Self::COUNT] = [
        Category::Infrastructure,
        Category::OtlpTraces,
        Category::AgentTraces,
        Category::Mobile,
        Category::Spans,
        Category::Website,
    ];

    /// Map an upstream counter name to its category
    pub fn from_counter_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.counter_name() == name)
    }

    /// Counter name used by the usage API
    pub fn counter_name(&self) -> &'static str {
        match self {
            Category::Infrastructure => "bytes_ingested_infrastructure_acceptor",
            Category::OtlpTraces => "bytes_ingested_traces_otlp_acceptor",
            Category::AgentTraces => "bytes_ingested_traces_acceptor",
            Category::Mobile => "bytes_ingested_eum_mobile_eum_acceptor",
            Category::Spans => "bytes_ingested_eum_spans_eum_acceptor",
            Category::Website => "bytes_ingested_eum_website_eum_acceptor",
        }
    }

    /// Label shown in the totals block
    pub fn label(&self) -> &'static str {
        match self {
            Category::Infrastructure => "infra",
            Category::OtlpTraces => "otlp traces",
            Category::AgentTraces => "agent traces",
            Category::Mobile => "mobile",
            Category::Spans => "spans",
            Category::Website => "website",
        }
    }

    /// Short tag shown in the verbose day trace
    ///
    /// Both trace categories share the `(trace)` tag.
    pub fn trace_tag(&self) -> &'static str {
        match self {
            Category::Infrastructure => "(infra)",
            Category::OtlpTraces | Category::AgentTraces => "(trace)",
            Category::Mobile => "(mobile)",
            Category::Spans => "(spans)",
            Category::Website => "(website)",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One named byte counter within a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounter {
    /// Upstream counter name
    pub name: String,
    /// Bytes counted for the day
    pub bytes: u64,
}

impl UsageCounter {
    /// Create a new UsageCounter
    pub fn new(name: impl Into<String>, bytes: u64) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Category of this counter, if it is recognized
    pub fn category(&self) -> Option<Category> {
        Category::from_counter_name(&self.name)
    }
}

/// Usage reported for a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDay {
    /// Start of the day as Unix epoch milliseconds
    pub timestamp_millis: i64,
    /// Counters in the order received
    pub counters: Vec<UsageCounter>,
}

impl UsageDay {
    /// Create a new UsageDay
    pub fn new(timestamp_millis: i64, counters: Vec<UsageCounter>) -> Self {
        Self {
            timestamp_millis,
            counters,
        }
    }
}
