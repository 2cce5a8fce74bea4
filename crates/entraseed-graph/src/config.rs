//! Connection configuration for the Graph seeding client.

use std::time::Duration;

use secrecy::SecretString;

use crate::{GraphError, GraphResult};

/// Default Microsoft login endpoint.
pub const DEFAULT_LOGIN_BASE: &str = "https://login.microsoftonline.com";

/// Default Microsoft Graph endpoint.
pub const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com";

/// Connection settings for one Entra ID tenant.
///
/// The endpoint bases are overridable so tests can point the client at a
/// local mock server.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Entra tenant (directory) ID.
    pub tenant_id: String,
    /// Application (client) ID.
    pub client_id: String,
    /// Client secret for the application.
    pub client_secret: SecretString,
    /// Verified tenant domain used to build user principal names.
    pub tenant_domain: Option<String>,
    /// Base URL of the OAuth2 login endpoint.
    pub login_base: String,
    /// Base URL of the Graph API.
    pub graph_base: String,
    /// Transport-level retry attempts for transient statuses and
    /// connection errors.
    pub max_transport_retries: u32,
    /// Initial transport backoff delay; doubles per attempt.
    pub transport_retry_base: Duration,
    /// Pause applied when a throttle response carries no usable
    /// `Retry-After` header.
    pub throttle_fallback: Duration,
}

impl GraphConfig {
    /// Creates a configuration with production endpoints and retry defaults.
    #[must_use]
    pub fn new(tenant_id: String, client_id: String, client_secret: SecretString) -> Self {
        Self {
            tenant_id,
            client_id,
            client_secret,
            tenant_domain: None,
            login_base: DEFAULT_LOGIN_BASE.to_string(),
            graph_base: DEFAULT_GRAPH_BASE.to_string(),
            max_transport_retries: 5,
            transport_retry_base: Duration::from_secs(1),
            throttle_fallback: Duration::from_secs(150),
        }
    }

    /// Creates a configuration pointed at a local mock server, with retry
    /// delays short enough for tests.
    #[must_use]
    pub fn for_testing(tenant_id: &str, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            tenant_domain: Some("test.onmicrosoft.com".to_string()),
            login_base: base.clone(),
            graph_base: base,
            max_transport_retries: 2,
            transport_retry_base: Duration::from_millis(10),
            throttle_fallback: Duration::from_millis(200),
            ..Self::new(
                tenant_id.to_string(),
                "test-client-id".to_string(),
                "test-client-secret".to_string().into(),
            )
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> GraphResult<()> {
        if self.tenant_id.trim().is_empty() {
            return Err(GraphError::Config("tenant_id must not be empty".to_string()));
        }
        if self.client_id.trim().is_empty() {
            return Err(GraphError::Config("client_id must not be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the OAuth2 token endpoint URL for this tenant.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.login_base, self.tenant_id)
    }

    /// Returns the OAuth2 scope requested for client-credential tokens.
    #[must_use]
    pub fn token_scope(&self) -> String {
        format!("{}/.default", self.graph_base)
    }

    /// Returns the versioned base URL for Graph API requests.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}/v1.0", self.graph_base)
    }
}
