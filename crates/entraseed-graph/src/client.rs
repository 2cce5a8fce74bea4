//! Resilient HTTP execution against the Microsoft Graph API.
//!
//! Every outbound call goes through [`GraphClient::execute`], which layers
//! two retry policies: a transport loop that retries transient statuses
//! with exponential backoff, and a manual layer that reacts once each to a
//! fully-exhausted throttle (429) and to an expired credential (401). The
//! caller always gets the final response back and decides what its status
//! means; only connection-level failures surface as errors.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{GraphConfig, GraphError, GraphResult, ThrottleGate, TokenCache};

/// Error envelope Graph wraps around non-success responses.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// Code and human-readable message inside an [`ODataError`].
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
}

/// One page of a paginated Graph listing.
#[derive(Debug, Deserialize)]
pub struct ODataPage<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph API client with throttle-aware retry handling.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    token_cache: TokenCache,
    throttle: ThrottleGate,
    config: Arc<GraphConfig>,
}

impl GraphClient {
    /// Builds a client with a 30 second request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: Arc<GraphConfig>) -> GraphResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GraphError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            token_cache: TokenCache::new(Arc::clone(&config)),
            throttle: ThrottleGate::new(config.throttle_fallback),
            config,
        })
    }

    /// Returns the shared throttle gate.
    #[must_use]
    pub fn throttle(&self) -> &ThrottleGate {
        &self.throttle
    }

    /// Performs one Graph API call, surviving throttling and token expiry.
    ///
    /// Never fails for an HTTP status: the final response is returned even
    /// when it still carries an error status, and callers inspect it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Auth`] if a token cannot be acquired and
    /// [`GraphError::Http`] for connection failures that survive the
    /// transport retries.
    #[instrument(skip(self, body), fields(method = %method, url = %url))]
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> GraphResult<reqwest::Response> {
        self.throttle.wait_if_paused().await;

        let mut response = self.send_with_transport_retry(&method, url, body).await?;

        // The transport layer gave up on throttling; record the signal so
        // every other caller pauses too, then retry this call once more.
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            self.throttle.record_throttle(retry_after.as_deref()).await;
            self.throttle.wait_if_paused().await;
            response = self.send_with_transport_retry(&method, url, body).await?;
        }

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Got 401, refreshing access token");
            self.token_cache.invalidate().await;
            response = self.send_with_transport_retry(&method, url, body).await?;
        }

        Ok(response)
    }

    /// Sends one request, retrying transient statuses and connection errors
    /// with exponential backoff.
    ///
    /// A `Retry-After` header on a transient response takes the place of
    /// the computed delay for that attempt.
    async fn send_with_transport_retry(
        &self,
        method: &Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> GraphResult<reqwest::Response> {
        let mut attempts = 0u32;
        let mut delay = self.config.transport_retry_base;

        loop {
            let token = self.token_cache.get_token().await?;
            let builder = self.http_client.request(method.clone(), url).bearer_auth(&token);
            let request = match body {
                Some(b) => builder.json(b),
                None => builder,
            };

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    if (e.is_connect() || e.is_timeout()) && attempts < self.config.max_transport_retries {
                        attempts += 1;
                        warn!(
                            "Connection error ({}), retry {}/{} after {:?}",
                            e, attempts, self.config.max_transport_retries, delay
                        );
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                        continue;
                    }
                    return Err(GraphError::Http(e));
                }
            };

            let status = response.status();
            if matches!(
                status,
                StatusCode::TOO_MANY_REQUESTS
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ) && attempts < self.config.max_transport_retries
            {
                let wait = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(ThrottleGate::parse_retry_after)
                    .map_or(delay, Duration::from_secs);

                attempts += 1;
                warn!(
                    "Transient status {}, retry {}/{} after {:?}",
                    status, attempts, self.config.max_transport_retries, wait
                );
                tokio::time::sleep(wait).await;
                delay *= 2;
                continue;
            }

            return Ok(response);
        }
    }

    /// Fetches all pages of a paginated listing, handing each page to the
    /// callback until the continuation link runs out.
    #[instrument(skip(self, callback))]
    pub async fn get_paginated<T, F>(&self, initial_url: &str, mut callback: F) -> GraphResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>) -> GraphResult<()>,
    {
        let mut url = initial_url.to_string();

        loop {
            debug!("Requesting page {url}");
            let response = self.execute(Method::GET, &url, None).await?;
            let page: ODataPage<T> = Self::read_json(response).await?;

            callback(page.value)?;

            match page.next_link {
                Some(next) => url = next,
                None => return Ok(()),
            }
        }
    }

    /// Parses a response body as JSON, converting error statuses into
    /// [`GraphError::GraphApi`].
    pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> GraphResult<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(GraphError::from);
        }
        Err(Self::response_error(status, response).await)
    }

    /// Converts a non-success response into a [`GraphError::GraphApi`],
    /// preserving the `OData` error code and message when the body parses.
    pub async fn response_error(status: StatusCode, response: reqwest::Response) -> GraphError {
        let error_body = response.text().await.unwrap_or_default();
        if let Ok(odata_error) = serde_json::from_str::<ODataError>(&error_body) {
            return GraphError::GraphApi {
                code: odata_error.error.code,
                message: odata_error.error.message,
            };
        }
        GraphError::GraphApi {
            code: status.to_string(),
            message: error_body,
        }
    }
}
