//! Client-credential token acquisition and caching.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{GraphConfig, GraphError, GraphResult};

/// How long before expiry a cached token stops being handed out.
const EXPIRY_GRACE_MINUTES: i64 = 5;

/// OAuth2 token response from the login endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    bearer: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn usable(&self, grace: Duration) -> bool {
        Utc::now() + grace < self.expires_at
    }
}

/// Caches one tenant's client-credential bearer token.
///
/// Refresh happens proactively when a read lands inside the grace window
/// and reactively through [`TokenCache::invalidate`] after a caller sees
/// an authorization failure.
#[derive(Debug)]
pub struct TokenCache {
    config: Arc<GraphConfig>,
    http_client: reqwest::Client,
    current: RwLock<Option<CachedToken>>,
    grace: Duration,
}

impl TokenCache {
    #[must_use]
    pub fn new(config: Arc<GraphConfig>) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            current: RwLock::new(None),
            grace: Duration::minutes(EXPIRY_GRACE_MINUTES),
        }
    }

    /// Returns a bearer token, acquiring a fresh one when the cache is
    /// empty or about to expire.
    #[instrument(skip(self), fields(tenant_id = %self.config.tenant_id))]
    pub async fn get_token(&self) -> GraphResult<String> {
        if let Some(token) = self.current.read().await.as_ref() {
            if token.usable(self.grace) {
                debug!("Cached token still valid");
                return Ok(token.bearer.clone());
            }
        }

        let fresh = self.acquire().await?;
        let bearer = fresh.bearer.clone();
        *self.current.write().await = Some(fresh);
        Ok(bearer)
    }

    /// Drops the cached token so the next call re-acquires.
    pub async fn invalidate(&self) {
        debug!("Dropping cached token");
        *self.current.write().await = None;
    }

    async fn acquire(&self) -> GraphResult<CachedToken> {
        debug!("Requesting access token");
        let scope = self.config.token_scope();
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.config.client_id),
            ("client_secret", self.config.client_secret.expose_secret()),
            ("scope", &scope),
        ];

        let response = self
            .http_client
            .post(self.config.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| GraphError::Auth(format!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Auth(format!(
                "Token endpoint returned {status}: {body}"
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| GraphError::Auth(format!("Malformed token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(parsed.expires_in);
        debug!("Token acquired, expires at {expires_at}");

        Ok(CachedToken {
            bearer: parsed.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usable_until_grace_window() {
        let token = CachedToken {
            bearer: "t".to_string(),
            expires_at: Utc::now() + Duration::minutes(10),
        };

        assert!(token.usable(Duration::minutes(5)));
        assert!(!token.usable(Duration::minutes(15)));
    }

    #[test]
    fn test_expired_token_is_not_usable() {
        let token = CachedToken {
            bearer: "t".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        };

        assert!(!token.usable(Duration::zero()));
    }
}
