// src/fetch/client.rs

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

use super::JsonSource;
use crate::config::{ApiConfig, RetryConfig};
use crate::error::FetchError;

/// HTTP client bound to one API root.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base: Url,
    retry: RetryConfig,
}

impl Fetcher {
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout())
            .build()
            .context("building HTTP client")?;

        // a base without a trailing slash would have its last segment replaced by join()
        let mut base = cfg.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).with_context(|| format!("parsing base URL {}", base))?;

        Ok(Self {
            client,
            base,
            retry: cfg.retry.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        self.base.join(path).map_err(|source| FetchError::InvalidUrl {
            url: format!("{}{}", self.base, path),
            source,
        })
    }

    async fn get_once(&self, url: &Url) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|source| FetchError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

fn is_retryable(err: &FetchError) -> bool {
    match err {
        FetchError::Transport { .. } => true,
        FetchError::Status { status, .. } => status.is_server_error(),
        _ => false,
    }
}

impl JsonSource for Fetcher {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url_for(path)?;
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(url = %url, attempt, "GET");
            match self.get_once(&url).await {
                Ok(body) => {
                    info!(url = %url, "data fetched");
                    return Ok(body);
                }
                Err(e) if attempt < max_attempts && is_retryable(&e) => {
                    warn!(url = %url, attempt, "retrying after: {}", e);
                    sleep(self.retry.delay()).await;
                }
                Err(e) => {
                    error!(url = %url, attempt, "fetch failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
