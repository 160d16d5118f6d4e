//! Instana provider for ingestcheck
//!
//! This crate implements the usage provider trait for the Instana usage API,
//! fetching one month of per-day ingestion counters.

pub mod client;

pub use client::{InstanaClient, decode_usage};
