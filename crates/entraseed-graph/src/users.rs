//! User provisioning, search, and deletion.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{BatchRequest, Directory, GraphClient, GraphError, GraphResult};

/// Graph caps `$batch` envelopes at 20 sub-requests.
const GRAPH_BATCH_LIMIT: usize = 20;

/// Attempts per chunk before a fully-throttled batch is abandoned.
const CHUNK_ATTEMPTS: u32 = 3;

/// Failures logged in detail per batch before collapsing to a count.
const FAILURE_DETAIL_LIMIT: usize = 3;

/// Payload for creating one user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub account_enabled: bool,
    pub display_name: String,
    pub given_name: String,
    pub surname: String,
    pub mail_nickname: String,
    pub user_principal_name: String,
    pub password_profile: PasswordProfile,
    pub job_title: String,
    pub department: String,
    pub office_location: String,
    /// Run tag, used to find the user again during cleanup.
    pub employee_id: String,
}

/// Password settings for a new user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
    pub password: String,
    pub force_change_password_next_sign_in: bool,
}

/// A user as returned by Graph searches and creations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub id: String,
    pub display_name: String,
    pub user_principal_name: String,
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl Directory {
    /// Creates users in `$batch` chunks, tolerating partial failures.
    ///
    /// Users that Graph rejects are logged and skipped. A chunk whose
    /// sub-requests are all throttled is retried up to [`CHUNK_ATTEMPTS`]
    /// times after the shared pause elapses, then abandoned; creation
    /// continues with the remaining chunks either way.
    ///
    /// # Errors
    ///
    /// Returns an error only when the batch call itself fails, for example
    /// on credential or connection problems.
    #[instrument(skip(self, specs), fields(total = specs.len()))]
    pub async fn create_users(
        &self,
        specs: &[NewUser],
        batch_size: usize,
    ) -> GraphResult<Vec<DirectoryUser>> {
        let chunk_size = batch_size.clamp(1, GRAPH_BATCH_LIMIT);
        let total_chunks = specs.len().div_ceil(chunk_size);
        let mut created = Vec::with_capacity(specs.len());

        for (chunk_index, chunk) in specs.chunks(chunk_size).enumerate() {
            info!(
                "Creating user batch {}/{} ({} users)",
                chunk_index + 1,
                total_chunks,
                chunk.len()
            );

            let mut attempt = 1u32;
            loop {
                match self.create_users_chunk(chunk).await {
                    Ok(users) => {
                        created.extend(users);
                        break;
                    }
                    Err(GraphError::ThrottledExhausted { items }) if attempt < CHUNK_ATTEMPTS => {
                        attempt += 1;
                        info!(
                            "Retrying throttled batch {}/{} (attempt {}/{}, {} requests)",
                            chunk_index + 1,
                            total_chunks,
                            attempt,
                            CHUNK_ATTEMPTS,
                            items
                        );
                    }
                    Err(GraphError::ThrottledExhausted { items }) => {
                        warn!(
                            "Abandoning batch {}/{} after {} throttled attempts ({} users not created)",
                            chunk_index + 1,
                            total_chunks,
                            CHUNK_ATTEMPTS,
                            items
                        );
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!("Created {} of {} users", created.len(), specs.len());
        Ok(created)
    }

    /// Submits one chunk and reconciles the per-item outcomes.
    ///
    /// Returns [`GraphError::ThrottledExhausted`] when every sub-request
    /// came back 429 and nothing was created; the shared throttle deadline
    /// has already been advanced and waited out by then, so the caller can
    /// resubmit immediately.
    async fn create_users_chunk(&self, chunk: &[NewUser]) -> GraphResult<Vec<DirectoryUser>> {
        let requests = chunk
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                Ok(BatchRequest::post_json(
                    i + 1,
                    "/users",
                    serde_json::to_value(spec)?,
                ))
            })
            .collect::<GraphResult<Vec<_>>>()?;

        let envelope = self.submit_batch(requests).await?;

        let mut created = Vec::new();
        let mut throttled = 0usize;
        let mut failed = 0usize;

        for item in envelope.responses {
            match item.status {
                201 => match item.body.map(serde_json::from_value::<DirectoryUser>) {
                    Some(Ok(user)) => created.push(user),
                    _ => {
                        failed += 1;
                        warn!("Created user had an unreadable body (sub-request {})", item.id);
                    }
                },
                429 => {
                    if throttled == 0 {
                        warn!(
                            "User creation throttled (sub-request {}, Retry-After: {})",
                            item.id,
                            item.header("Retry-After").unwrap_or("none")
                        );
                    }
                    throttled += 1;
                }
                status => {
                    failed += 1;
                    if failed <= FAILURE_DETAIL_LIMIT {
                        warn!(
                            "User creation failed (sub-request {}, status {}): {}",
                            item.id,
                            status,
                            item.body
                                .as_ref()
                                .and_then(|b| b["error"]["message"].as_str())
                                .unwrap_or("no detail")
                        );
                    }
                }
            }
        }

        if throttled > 0 && created.is_empty() {
            warn!(
                "All {} requests in the batch were throttled, backing off",
                throttled
            );
            let throttle = self.client().throttle();
            throttle.pause_for(throttle.fallback()).await;
            throttle.wait_if_paused().await;
            return Err(GraphError::ThrottledExhausted { items: throttled });
        }
        if throttled > 0 {
            warn!(
                "{} user creations throttled in a partially successful batch",
                throttled
            );
        }
        if failed > FAILURE_DETAIL_LIMIT {
            warn!(
                "... and {} more failed user creations in this batch",
                failed - FAILURE_DETAIL_LIMIT
            );
        }

        Ok(created)
    }

    /// Finds all users carrying exactly this run tag in `employeeId`.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request fails.
    #[instrument(skip(self))]
    pub async fn find_users_by_tag(&self, tag: &str) -> GraphResult<Vec<DirectoryUser>> {
        self.search_users(&format!("employeeId eq '{tag}'")).await
    }

    /// Finds all users whose `employeeId` starts with the given prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request fails.
    #[instrument(skip(self))]
    pub async fn find_users_by_tag_prefix(&self, prefix: &str) -> GraphResult<Vec<DirectoryUser>> {
        self.search_users(&format!("startswith(employeeId, '{prefix}')"))
            .await
    }

    async fn search_users(&self, filter: &str) -> GraphResult<Vec<DirectoryUser>> {
        let url = format!(
            "{}/users?$filter={}&$select=id,displayName,userPrincipalName,employeeId",
            self.config().base_url(),
            urlencoding::encode(filter)
        );

        let mut users = Vec::new();
        self.client()
            .get_paginated(&url, |page: Vec<DirectoryUser>| {
                users.extend(page);
                Ok(())
            })
            .await?;
        Ok(users)
    }

    /// Deletes one user by id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::GraphApi`] if Graph rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str) -> GraphResult<()> {
        let url = format!("{}/users/{}", self.config().base_url(), user_id);
        let response = self.client().execute(Method::DELETE, &url, None).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(GraphClient::response_error(status, response).await)
    }
}
