//! Quota threshold evaluation

use serde::Serialize;

/// Outcome of comparing total usage against the quota
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotaCheck {
    /// Total bytes ingested
    pub usage_total: u64,
    /// Entitled bytes for the period
    pub quota_bytes: u64,
    /// Fraction of the quota at which to warn
    pub warning_fraction: f64,
    /// Warning limit in bytes, `floor(quota_bytes * warning_fraction)`
    pub limit: u64,
    /// Share of the quota consumed, truncated to a whole percent
    pub percent: u64,
    /// Whether usage reached the warning limit
    pub exceeded: bool,
}

impl QuotaCheck {
    /// Compare `usage_total` against `quota_bytes * warning_fraction`
    ///
    /// Float-to-integer conversions saturate, so a negative or NaN fraction
    /// gives a limit of zero and any usage exceeds it.
    ///
    /// # Examples
    /// ```
    /// use ingestcheck_core::quota::QuotaCheck;
    ///
    /// let check = QuotaCheck::evaluate(5_000_000_000, 10_000_000_000, 0.8);
    /// assert_eq!(check.percent, 50);
    /// assert_eq!(check.limit, 8_000_000_000);
    /// assert!(!check.exceeded);
    /// ```
    pub fn evaluate(usage_total: u64, quota_bytes: u64, warning_fraction: f64) -> Self {
        let limit = (quota_bytes as f64 * warning_fraction) as u64;
        let percent = if quota_bytes == 0 {
            0
        } else {
            (usage_total as f64 / quota_bytes as f64 * 100.0) as u64
        };

        Self {
            usage_total,
            quota_bytes,
            warning_fraction,
            limit,
            percent,
            exceeded: usage_total >= limit,
        }
    }
}
