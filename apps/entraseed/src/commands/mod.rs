//! Command implementations.

pub mod cleanup;
pub mod generate;
pub mod tags;

use clap::Args;
use entraseed_graph::GraphConfig;

/// Connection flags shared by every command.
#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Entra tenant (directory) ID.
    #[arg(long)]
    pub tenant_id: String,

    /// Application (client) ID with directory write permissions.
    #[arg(long)]
    pub client_id: String,

    /// Client secret for the application.
    #[arg(long)]
    pub client_secret: String,

    /// Verified tenant domain for user principal names, e.g. contoso.onmicrosoft.com.
    #[arg(long)]
    pub tenant_domain: Option<String>,

    /// Override the Graph API base URL, e.g. for national cloud tenants.
    #[arg(long)]
    pub graph_url: Option<String>,

    /// Override the login (token) base URL.
    #[arg(long)]
    pub login_url: Option<String>,
}

impl ConnectionArgs {
    pub fn to_graph_config(&self) -> GraphConfig {
        let mut config = GraphConfig::new(
            self.tenant_id.clone(),
            self.client_id.clone(),
            self.client_secret.clone().into(),
        );
        config.tenant_domain = self.tenant_domain.clone();
        if let Some(url) = &self.graph_url {
            config.graph_base = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = &self.login_url {
            config.login_base = url.trim_end_matches('/').to_string();
        }
        config
    }
}
