//! Core types, aggregation, and size utilities for ingestcheck
//!
//! This crate provides the domain types, error handling, aggregation
//! context, quota evaluation, and byte-size helpers shared by the
//! ingestcheck binary and its usage providers.

pub mod aggregation;
pub mod error;
pub mod provider;
pub mod quota;
pub mod size;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{IngestError, Result};
pub use types::{Category, UsageCounter, UsageDay};
