// src/fetch/mod.rs

use serde_json::Value;

use crate::error::FetchError;

pub mod client;
pub mod endpoints;

pub use client::Fetcher;
pub use endpoints::{event_live_path, fetch_bootstrap, fetch_week, BOOTSTRAP_STATIC};

/// Anything that can answer a GET for a path under the API root with JSON.
#[allow(async_fn_in_trait)]
pub trait JsonSource {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError>;
}
