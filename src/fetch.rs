use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

// The data endpoints refuse default client agents.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/122.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Fetches one JSON document per URL.
#[async_trait]
pub trait Fetch {
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// reqwest-backed fetcher used by the CLI.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<HttpFetcher> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("Request failed: {}", url))?;

        let value = response
            .json::<Value>()
            .await
            .with_context(|| format!("Invalid JSON from {}", url))?;
        Ok(value)
    }
}

/// In-memory fetcher for tests: serves a fixed URL→document map and
/// reports anything else as not found.
#[cfg(test)]
pub struct StaticFetcher {
    pub pages: std::collections::HashMap<String, Value>,
}

#[cfg(test)]
#[async_trait]
impl Fetch for StaticFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("404 Not Found: {}", url))
    }
}
