//! HTTP client for the restaurant listing service.
//!
//! The service is a plain JSON REST API with no authentication. Errors are
//! classified so callers can tell "the network is down, use the cache"
//! apart from "the service answered and said no".

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{RecordId, Restaurant, Review};

use super::{ApiError, RemoteApi};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough to fall back to
/// the cache within a reasonable wait.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the listing service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(url, "requesting");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Rejected { status });
        }

        response.json().await.map_err(|err| {
            if err.is_decode() {
                ApiError::Malformed(err)
            } else {
                // The body transfer itself failed mid-read.
                ApiError::Unreachable(err)
            }
        })
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        let url = format!("{}/restaurants", self.base_url);
        self.get_json(&url).await
    }

    async fn restaurant(&self, id: RecordId) -> Result<Restaurant, ApiError> {
        let url = format!("{}/restaurants/{}", self.base_url, id);
        self.get_json(&url).await
    }

    async fn reviews_for_restaurant(
        &self,
        restaurant_id: RecordId,
    ) -> Result<Vec<Review>, ApiError> {
        let url = format!("{}/reviews/?restaurant_id={}", self.base_url, restaurant_id);
        self.get_json(&url).await
    }
}
