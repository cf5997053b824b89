//! HTTP client for the vault's search API.
//!
//! The vault owns storage, OCR, embeddings, and its own keyword + vector
//! fusion; this client is a thin `POST /api/search` wrapper. One request per
//! search invocation — retries and rate limiting are the vault's concern,
//! and the caller treats any failure here as "zero results" with a logged
//! diagnostic.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use docket_core::models::VaultHit;
use docket_core::vault::{VaultSearch, VaultSearchOptions};

use crate::config::VaultConfig;

/// Client for the vault search endpoint.
pub struct VaultClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl VaultClient {
    /// Build a client from the `[vault]` configuration section.
    ///
    /// The API key is read from the configured environment variable; a
    /// missing key is allowed (some deployments front the vault with a
    /// network boundary instead).
    pub fn new(config: &VaultConfig) -> Result<Self> {
        let base_url = config
            .url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("[vault] url is not configured"))?;
        let api_key = std::env::var(&config.api_key_env).ok();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<VaultHit>,
}

#[async_trait]
impl VaultSearch for VaultClient {
    async fn search(&self, query: &str, opts: &VaultSearchOptions) -> Result<Vec<VaultHit>> {
        let body = serde_json::json!({
            "query": query,
            "method": opts.method.as_str(),
            "limit": opts.limit,
            "min_score": opts.min_score,
        });

        let mut request = self
            .http
            .post(format!("{}/api/search", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.context("vault search request failed")?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("vault search error {}: {}", status, text);
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .context("invalid vault search response")?;
        Ok(parsed.results)
    }
}
