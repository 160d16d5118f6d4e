//! Instana usage API client
//!
//! Fetches `GET https://{endpoint}/api/instana/usage/api/{month}/{year}` with
//! an `apiToken` authorization header and decodes the response, a JSON array
//! of `{time, items: [{name, sims}]}` records, into core usage days.

use async_trait::async_trait;
use ingestcheck_core::error::{IngestError, Result};
use ingestcheck_core::provider::UsageProvider;
use ingestcheck_core::types::{UsageCounter, UsageDay};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Path of the monthly usage resource, relative to the endpoint root
const USAGE_PATH: &str = "/api/instana/usage/api";

/// One day as returned by the usage API
///
/// Every level may be missing or `null`; both read as zero or empty.
#[derive(Debug, Default, Deserialize)]
struct WireDay {
    time: Option<i64>,
    items: Option<Vec<Option<WireItem>>>,
}

#[derive(Debug, Default, Deserialize)]
struct WireItem {
    name: Option<String>,
    sims: Option<u64>,
}

impl From<WireDay> for UsageDay {
    fn from(day: WireDay) -> Self {
        let counters = day
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                let item = item.unwrap_or_default();
                UsageCounter::new(item.name.unwrap_or_default(), item.sims.unwrap_or_default())
            })
            .collect();
        UsageDay::new(day.time.unwrap_or_default(), counters)
    }
}

/// Decode a usage API response body
///
/// A `null` body is an empty month. On failure the body is kept, lossily
/// converted to UTF-8, in the returned [`IngestError::Decode`].
pub fn decode_usage(body: &[u8]) -> Result<Vec<UsageDay>> {
    match serde_json::from_slice::<Option<Vec<Option<WireDay>>>>(body) {
        Ok(days) => Ok(days
            .unwrap_or_default()
            .into_iter()
            .map(|day| UsageDay::from(day.unwrap_or_default()))
            .collect()),
        Err(source) => Err(IngestError::Decode {
            source,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

/// Client for one Instana tenant
pub struct InstanaClient {
    /// HTTP client
    client: reqwest::Client,
    /// Scheme and host, without trailing slash
    base_url: String,
    /// API token sent as `Authorization: apiToken <token>`
    token: String,
}

impl InstanaClient {
    /// Create a client for `endpoint` (a host name without scheme)
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ingestcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(IngestError::Request)?;

        Ok(Self {
            client,
            base_url: format!("https://{endpoint}"),
            token: token.into(),
        })
    }

    /// Replace the scheme and host the client talks to
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the usage resource for a month
    pub fn usage_url(&self, month: u32, year: i32) -> String {
        format!("{}{USAGE_PATH}/{month}/{year}", self.base_url)
    }

    /// Fetch the raw response body for a month
    ///
    /// The response status is not treated as an error: an error page fails
    /// decoding and is reported together with its body.
    pub async fn fetch_raw(&self, month: u32, year: i32) -> Result<Vec<u8>> {
        let url = self.usage_url(month, year);
        debug!("Requesting {}", url);

        let request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("apiToken {}", self.token))
            .build()
            .map_err(IngestError::Request)?;

        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            debug!("Usage API answered {}", status);
        } else {
            warn!("Usage API answered {} for {}", status, url);
        }

        let body = response.bytes().await.map_err(IngestError::Body)?;
        info!("Received {} bytes of usage data", body.len());
        Ok(body.to_vec())
    }
}

#[async_trait]
impl UsageProvider for InstanaClient {
    async fn fetch_usage(&self, month: u32, year: i32) -> Result<Vec<UsageDay>> {
        let body = self.fetch_raw(month, year).await?;
        let days = decode_usage(&body)?;
        debug!("Decoded {} usage days", days.len());
        Ok(days)
    }
}
