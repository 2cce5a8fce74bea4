//! Rate-limit-aware Microsoft Graph client for seeding Entra ID load-test
//! data.
//!
//! The crate provisions synthetic users and security groups in a tenant,
//! batching user creation through `$batch` and steering every request
//! through a shared throttle gate so one 429 pauses the whole run instead
//! of one task. [`Directory`] is the entry point; configuration comes from
//! [`GraphConfig`] and errors surface as [`GraphError`].
//!
//! # Example
//!
//! ```no_run
//! use entraseed_graph::{Directory, GraphConfig};
//!
//! # async fn run() -> entraseed_graph::GraphResult<()> {
//! let mut config = GraphConfig::new(
//!     "tenant-id".to_string(),
//!     "client-id".to_string(),
//!     "client-secret".to_string().into(),
//! );
//! config.tenant_domain = Some("contoso.onmicrosoft.com".to_string());
//! let directory = Directory::new(config)?;
//! let users = directory.find_users_by_tag("LT123456781234").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod batch;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod groups;
pub mod throttle;
pub mod users;

pub use auth::TokenCache;
pub use batch::{BatchEnvelope, BatchItemResponse, BatchRequest, BatchResponseEnvelope};
pub use client::{GraphClient, ODataError, ODataErrorBody, ODataPage};
pub use config::GraphConfig;
pub use directory::Directory;
pub use error::{GraphError, GraphResult};
pub use groups::{DirectoryGroup, NewGroup};
pub use throttle::ThrottleGate;
pub use users::{DirectoryUser, NewUser, PasswordProfile};
