//! Error types for ingestcheck
//!
//! This module defines the error type shared by every ingestcheck crate.
//! Variants map onto the stages of a check run so the binary can decide
//! how to report each failure and which exit status to use.
//!
//! # Example
//!
//! ```
//! use ingestcheck_core::error::{IngestError, Result};
//!
//! fn require_token(token: &str) -> Result<()> {
//!     if token.is_empty() {
//!         return Err(IngestError::InvalidArgument("token is required".into()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_token("").is_err());
//! ```

use thiserror::Error;

/// Main error type for ingestcheck operations
#[derive(Error, Debug)]
pub enum IngestError {
    /// A run parameter is missing or out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The HTTP request could not be built (bad host, bad header value)
    #[error("Error creating request: {0}")]
    Request(#[source] reqwest::Error),

    /// Connection or transport failure while sending the request
    #[error("Error fetching data: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be read
    #[error("Error reading response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The response body is not a usage array
    #[error("Error parsing JSON: {source}")]
    Decode {
        /// The underlying JSON error
        source: serde_json::Error,
        /// The raw response, kept for diagnosis
        body: String,
    },
}

impl IngestError {
    /// Raw response body attached to a decode failure
    pub fn response_body(&self) -> Option<&str> {
        match self {
            IngestError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Convenience type alias for Results in ingestcheck
pub type Result<T> = std::result::Result<T, IngestError>;
