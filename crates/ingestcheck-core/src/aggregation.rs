//! Aggregation of daily usage into category totals
//!
//! [`UsageAggregation`] is the single mutable context of a run: days are
//! folded into it in the order received, recognized counters are added to
//! their category total and recorded in a per-day trace, and everything else
//! is skipped.
//!
//! # Examples
//!
//! ```
//! use ingestcheck_core::aggregation::UsageAggregation;
//! use ingestcheck_core::types::{Category, UsageCounter, UsageDay};
//!
//! let days = vec![UsageDay::new(
//!     1_700_000_000_000,
//!     vec![
//!         UsageCounter::new("bytes_ingested_infrastructure_acceptor", 1024),
//!         UsageCounter::new("bytes_ingested_logs_acceptor", 4096),
//!     ],
//! )];
//!
//! let mut aggregation = UsageAggregation::new(chrono_tz::Tz::UTC);
//! aggregation.fold_days(&days);
//!
//! assert_eq!(aggregation.totals().get(Category::Infrastructure), 1024);
//! assert_eq!(aggregation.totals().total(), 1024);
//! assert_eq!(aggregation.ignored_counters(), 1);
//! ```

use crate::timezone::from_epoch_millis;
use crate::types::{Category, UsageDay};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

/// Accumulated bytes per category
///
/// Totals only ever grow; there is no way to subtract or reset an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    bytes: [u64; Category::COUNT],
}

impl CategoryTotals {
    /// Create zeroed totals
    pub fn new() -> Self {
        Self::default()
    }

    /// Add bytes to a category
    pub fn add(&mut self, category: Category, bytes: u64) {
        let slot = &mut self.bytes[category.index()];
        *slot = slot.saturating_add(bytes);
    }

    /// Bytes accumulated for a category
    pub fn get(&self, category: Category) -> u64 {
        self.bytes[category.index()]
    }

    /// Categories and their totals in report order
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Sum over all categories
    pub fn total(&self) -> u64 {
        self.bytes
            .iter()
            .fold(0u64, |acc, &bytes| acc.saturating_add(bytes))
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT))?;
        for (category, bytes) in self.iter() {
            map.serialize_entry(&category, &bytes)?;
        }
        map.end()
    }
}

/// A recognized counter recorded in the day trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Counter category
    pub category: Category,
    /// Bytes reported for the day
    pub bytes: u64,
}

/// Matched counters for one day
#[derive(Debug, Clone, PartialEq)]
pub struct DayTrace {
    /// Raw epoch milliseconds as received
    pub timestamp_millis: i64,
    /// Timestamp in the display timezone, `None` if out of range
    pub timestamp: Option<DateTime<Tz>>,
    /// Recognized counters in the order received
    pub entries: Vec<TraceEntry>,
}

/// Mutable aggregation context for one run
#[derive(Debug, Clone)]
pub struct UsageAggregation {
    tz: Tz,
    totals: CategoryTotals,
    trace: Vec<DayTrace>,
    ignored: usize,
}

impl UsageAggregation {
    /// Create an empty aggregation rendering timestamps in `tz`
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            totals: CategoryTotals::new(),
            trace: Vec::new(),
            ignored: 0,
        }
    }

    /// Fold one day into the totals and the trace
    pub fn fold_day(&mut self, day: &UsageDay) {
        let mut entries = Vec::with_capacity(day.counters.len());

        for counter in &day.counters {
            match counter.category() {
                Some(category) => {
                    self.totals.add(category, counter.bytes);
                    entries.push(TraceEntry {
                        category,
                        bytes: counter.bytes,
                    });
                }
                None => {
                    debug!("Ignoring unrecognized counter {}", counter.name);
                    self.ignored += 1;
                }
            }
        }

        self.trace.push(DayTrace {
            timestamp_millis: day.timestamp_millis,
            timestamp: from_epoch_millis(day.timestamp_millis, &self.tz),
            entries,
        });
    }

    /// Fold a sequence of days in order
    pub fn fold_days<'a>(&mut self, days: impl IntoIterator<Item = &'a UsageDay>) {
        for day in days {
            self.fold_day(day);
        }
    }

    /// Category totals so far
    pub fn totals(&self) -> &CategoryTotals {
        &self.totals
    }

    /// Per-day trace so far
    pub fn trace(&self) -> &[DayTrace] {
        &self.trace
    }

    /// Number of counters skipped because their name was not recognized
    pub fn ignored_counters(&self) -> usize {
        self.ignored
    }

    /// Consume the context, returning totals and trace
    pub fn into_parts(self) -> (CategoryTotals, Vec<DayTrace>) {
        (self.totals, self.trace)
    }
}
