//! Zone resolution for the day trace
//!
//! The usage API stamps each day with epoch milliseconds. The verbose trace
//! shows those instants in one zone: UTC when `--utc` is given, the zone
//! named by `--timezone`, or the system's local zone otherwise.

use crate::error::{IngestError, Result};
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Pick the zone day timestamps are rendered in
///
/// `utc` wins over an explicit zone name. An unknown name is an error rather
/// than a silent fallback, so a typo never shifts every day by some hours.
pub fn resolve_trace_zone(timezone: Option<&str>, utc: bool) -> Result<Tz> {
    if utc {
        return Ok(Tz::UTC);
    }

    match timezone {
        Some(name) => Tz::from_str(name).map_err(|_| {
            IngestError::InvalidTimezone(format!(
                "'{name}'. Use format like 'Europe/Berlin', 'America/Chicago', or 'UTC'"
            ))
        }),
        None => Ok(local_zone()),
    }
}

/// Detect the system's local zone
///
/// Checks the `TZ` environment variable, then the platform zone database,
/// and falls back to UTC.
pub fn local_zone() -> Tz {
    if let Some(tz) = std::env::var("TZ")
        .ok()
        .and_then(|name| Tz::from_str(&name).ok())
    {
        debug!("Trace zone from TZ: {}", tz.name());
        return tz;
    }

    match iana_time_zone::get_timezone() {
        Ok(name) => Tz::from_str(&name).unwrap_or_else(|_| {
            debug!("Unknown system zone '{}', using UTC", name);
            Tz::UTC
        }),
        Err(e) => {
            debug!("Could not detect local zone: {:?}, using UTC", e);
            Tz::UTC
        }
    }
}

/// Convert an epoch-millisecond day stamp into `zone`
///
/// Negative values count back from the epoch. Returns `None` when the value
/// is outside chrono's range.
pub fn from_epoch_millis<Z: TimeZone>(millis: i64, zone: &Z) -> Option<DateTime<Z>> {
    let secs = millis.div_euclid(1000);
    let nanos = millis.rem_euclid(1000) as u32 * 1_000_000;
    zone.timestamp_opt(secs, nanos).single()
}
