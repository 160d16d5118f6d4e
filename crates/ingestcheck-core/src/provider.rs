//! Provider trait for usage sources
//!
//! A provider turns a month/year into the decoded list of usage days. The
//! check pipeline only talks to this trait, so it runs the same against the
//! live API and against in-memory data.

use crate::error::Result;
use crate::types::UsageDay;
use async_trait::async_trait;

/// Source of daily usage records for a billing month
#[async_trait]
pub trait UsageProvider: Send + Sync {
    /// Fetch and decode the usage days for `month` (1-12) of `year`
    async fn fetch_usage(&self, month: u32, year: i32) -> Result<Vec<UsageDay>>;
}
