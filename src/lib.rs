//! ingestcheck - check Instana data ingestion against the contracted quota
//!
//! This library provides functionality to:
//! - Resolve and validate the parameters of a check run
//! - Fetch one month of per-day usage counters from the Instana usage API
//! - Fold recognized ingestion counters into per-category totals
//! - Compare the total against a warning fraction of the quota
//! - Render the result as a text or JSON report
//!
//! # Examples
//!
//! ```no_run
//! use ingestcheck::{
//!     checker::Checker,
//!     config::RunParams,
//!     timezone::local_zone,
//! };
//! use ingestcheck_instana::InstanaClient;
//!
//! #[tokio::main]
//! async fn main() -> ingestcheck::Result<()> {
//!     let today = chrono::Local::now().date_naive();
//!     let config = RunParams {
//!         month: 3,
//!         year: 2024,
//!         token: "TOKEN".into(),
//!         endpoint: "unit-tenant.instana.io".into(),
//!         max_allowed: "7TB".into(),
//!         warning_fraction: 0.8,
//!         verbose: false,
//!     }
//!     .validate(today)?;
//!
//!     let client = InstanaClient::new(&config.endpoint, config.token.clone())?;
//!     let report = Checker::new(local_zone())
//!         .run(&config, &client)
//!         .await?;
//!     println!("threshold exceeded: {}", report.threshold_exceeded());
//!     Ok(())
//! }
//! ```

pub mod checker;
pub mod cli;
pub mod config;
pub mod output;

pub use ingestcheck_core::{aggregation, error, provider, quota, size, timezone, types};

// Re-export commonly used types
pub use error::{IngestError, Result};
pub use types::{Category, UsageCounter, UsageDay};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
