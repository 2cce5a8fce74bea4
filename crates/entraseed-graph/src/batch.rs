//! JSON batching for the Graph `$batch` endpoint.
//!
//! Graph accepts up to 20 sub-requests per batch call. Each sub-request
//! carries its own id, and the response envelope echoes those ids back so
//! callers can reconcile per-item outcomes regardless of response order.

use std::collections::HashMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{Directory, GraphClient, GraphResult};

/// One sub-request inside a `$batch` envelope.
#[derive(Debug, Serialize)]
pub struct BatchRequest {
    pub id: String,
    pub method: String,
    pub url: String,
    pub body: serde_json::Value,
    pub headers: HashMap<String, String>,
}

impl BatchRequest {
    /// Builds a POST sub-request with a JSON body.
    ///
    /// Ids are 1-based within an envelope; Graph rejects duplicates.
    #[must_use]
    pub fn post_json(id: usize, url: &str, body: serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            id: id.to_string(),
            method: "POST".to_string(),
            url: url.to_string(),
            body,
            headers,
        }
    }
}

/// Request envelope for a `$batch` call.
#[derive(Debug, Serialize)]
pub struct BatchEnvelope {
    pub requests: Vec<BatchRequest>,
}

/// One sub-response inside a `$batch` response envelope.
#[derive(Debug, Deserialize)]
pub struct BatchItemResponse {
    pub id: String,
    pub status: u16,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

impl BatchItemResponse {
    /// Reads a sub-response header, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }
}

/// Response envelope from a `$batch` call.
#[derive(Debug, Deserialize)]
pub struct BatchResponseEnvelope {
    pub responses: Vec<BatchItemResponse>,
}

impl Directory {
    /// Submits a batch of sub-requests in one `$batch` call.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch call itself fails; per-item statuses
    /// are reported through the returned envelope, not as errors.
    #[instrument(skip(self, requests), fields(count = requests.len()))]
    pub async fn submit_batch(
        &self,
        requests: Vec<BatchRequest>,
    ) -> GraphResult<BatchResponseEnvelope> {
        let url = format!("{}/$batch", self.config().base_url());
        let envelope = serde_json::to_value(BatchEnvelope { requests })?;

        let response = self
            .client()
            .execute(Method::POST, &url, Some(&envelope))
            .await?;
        GraphClient::read_json(response).await
    }
}
