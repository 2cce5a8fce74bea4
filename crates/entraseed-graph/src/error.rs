//! Error types for the Graph seeding client.

use thiserror::Error;

/// Result type alias using `GraphError`.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur when talking to Microsoft Graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `OAuth2` token acquisition error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Microsoft Graph API error surfaced from an error response body.
    #[error("Graph API error: {code} - {message}")]
    GraphApi { code: String, message: String },

    /// Connection-level HTTP failure that survived transport retries.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A whole batch chunk was throttled with zero successes.
    ///
    /// The shared rate-limit deadline has already been advanced and waited
    /// out by the time this is returned; the caller decides whether to
    /// resubmit the chunk.
    #[error("Batch chunk fully throttled ({items} requests)")]
    ThrottledExhausted { items: usize },
}
