//! Common test utilities and helpers for ingestcheck tests
//!
//! This module provides a builder for usage days, a canned usage API
//! server, and guards for tests that touch environment variables.

#![allow(dead_code)]

use ingestcheck::config::RunConfig;
use ingestcheck::types::{UsageCounter, UsageDay};
use once_cell::sync::Lazy;
use std::env;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// Global mutex to serialize environment variable modifications in tests
pub static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

/// 2023-11-14T22:13:20Z
pub const NOV_14_2023_MILLIS: i64 = 1_700_000_000_000;

/// One day in milliseconds
pub const DAY_MILLIS: i64 = 86_400_000;

/// Builder for creating test UsageDay instances
pub struct UsageDayBuilder {
    timestamp_millis: i64,
    counters: Vec<UsageCounter>,
}

impl UsageDayBuilder {
    /// Create a builder for the given day offset from Nov 14 2023
    pub fn new(day_offset: i64) -> Self {
        Self {
            timestamp_millis: NOV_14_2023_MILLIS + day_offset * DAY_MILLIS,
            counters: Vec::new(),
        }
    }

    pub fn counter(mut self, name: &str, bytes: u64) -> Self {
        self.counters.push(UsageCounter::new(name, bytes));
        self
    }

    pub fn infra(self, bytes: u64) -> Self {
        self.counter("bytes_ingested_infrastructure_acceptor", bytes)
    }

    pub fn otlp_traces(self, bytes: u64) -> Self {
        self.counter("bytes_ingested_traces_otlp_acceptor", bytes)
    }

    pub fn website(self, bytes: u64) -> Self {
        self.counter("bytes_ingested_eum_website_eum_acceptor", bytes)
    }

    pub fn build(self) -> UsageDay {
        UsageDay::new(self.timestamp_millis, self.counters)
    }

    /// Render as the usage API's JSON object
    pub fn to_json(&self) -> String {
        let items: Vec<String> = self
            .counters
            .iter()
            .map(|c| format!(r#"{{"name":"{}","sims":{}}}"#, c.name, c.bytes))
            .collect();
        format!(
            r#"{{"time":{},"items":[{}]}}"#,
            self.timestamp_millis,
            items.join(",")
        )
    }
}

/// Render several days as a usage API response body
pub fn usage_body(days: &[UsageDayBuilder]) -> String {
    let days: Vec<String> = days.iter().map(UsageDayBuilder::to_json).collect();
    format!("[{}]", days.join(","))
}

/// A validated config for November 2023
pub fn run_config(quota_bytes: u64, warning_fraction: f64, verbose: bool) -> RunConfig {
    RunConfig {
        month: 11,
        year: 2023,
        token: "test-token".into(),
        endpoint: "unit-tenant.instana.io".into(),
        quota_bytes,
        warning_fraction,
        verbose,
    }
}

/// Serve one canned HTTP response, returning the base URL and the raw request
pub async fn serve_once(status_line: &str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let status_line = status_line.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}

/// RAII guard for environment variable manipulation in tests
///
/// Restores every touched variable on drop, even if the test panics.
pub struct EnvVarGuard {
    vars: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        let original = env::var(key).ok();
        self.vars.push((key.to_string(), original));
        // Note: env::set_var is unsafe in Rust 1.82+ due to thread-safety concerns
        unsafe {
            env::set_var(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        let original = env::var(key).ok();
        self.vars.push((key.to_string(), original));
        unsafe {
            env::remove_var(key);
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.vars.iter().rev() {
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

impl Default for EnvVarGuard {
    fn default() -> Self {
        Self::new()
    }
}
