//! Entry point for directory operations.

use std::sync::Arc;

use crate::{GraphClient, GraphConfig, GraphResult};

/// Handle for user, group, and batch operations against one tenant.
///
/// Cheap to share by reference; all internal state is behind the client's
/// own synchronization.
#[derive(Debug)]
pub struct Directory {
    client: GraphClient,
    config: Arc<GraphConfig>,
}

impl Directory {
    /// Creates a directory handle for the given tenant configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: GraphConfig) -> GraphResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let client = GraphClient::new(Arc::clone(&config))?;

        Ok(Self { client, config })
    }

    /// Returns the underlying Graph client.
    #[must_use]
    pub fn client(&self) -> &GraphClient {
        &self.client
    }

    /// Returns the tenant configuration.
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }
}
