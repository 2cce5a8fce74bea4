//! Group provisioning, membership, search, and deletion.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::{Directory, GraphClient, GraphError, GraphResult};

/// Payload for creating one security group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub display_name: String,
    pub mail_nickname: String,
    pub description: String,
    pub group_types: Vec<String>,
    pub security_enabled: bool,
    pub mail_enabled: bool,
}

/// A group as returned by Graph searches and creations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroup {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mail_nickname: Option<String>,
}

impl Directory {
    /// Creates one group.
    ///
    /// Groups are created individually rather than batched; nesting them
    /// needs each parent's id before its children can reference it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::GraphApi`] if Graph rejects the creation.
    #[instrument(skip(self, spec), fields(display_name = %spec.display_name))]
    pub async fn create_group(&self, spec: &NewGroup) -> GraphResult<DirectoryGroup> {
        let url = format!("{}/groups", self.config().base_url());
        let body = serde_json::to_value(spec)?;

        let response = self.client().execute(Method::POST, &url, Some(&body)).await?;
        GraphClient::read_json(response).await
    }

    /// Adds a directory object (user or group) as a member of a group.
    ///
    /// Adding a member that is already present counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::GraphApi`] for any other rejection.
    #[instrument(skip(self))]
    pub async fn add_member(&self, group_id: &str, member_id: &str) -> GraphResult<()> {
        let url = format!("{}/groups/{}/members/$ref", self.config().base_url(), group_id);
        let body = json!({
            "@odata.id": format!("{}/directoryObjects/{}", self.config().base_url(), member_id),
        });

        let response = self.client().execute(Method::POST, &url, Some(&body)).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error = GraphClient::response_error(status, response).await;
        if let GraphError::GraphApi { message, .. } = &error {
            if message.to_lowercase().contains("already exist") {
                debug!("Member {} already in group {}", member_id, group_id);
                return Ok(());
            }
        }
        Err(error)
    }

    /// Finds all groups whose display name starts with the given prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request fails.
    #[instrument(skip(self))]
    pub async fn find_groups_by_name_prefix(
        &self,
        prefix: &str,
    ) -> GraphResult<Vec<DirectoryGroup>> {
        let filter = format!("startswith(displayName, '{prefix}')");
        let url = format!(
            "{}/groups?$filter={}&$select=id,displayName,description,mailNickname",
            self.config().base_url(),
            urlencoding::encode(&filter)
        );

        let mut groups = Vec::new();
        self.client()
            .get_paginated(&url, |page: Vec<DirectoryGroup>| {
                groups.extend(page);
                Ok(())
            })
            .await?;
        Ok(groups)
    }

    /// Deletes one group by id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::GraphApi`] if Graph rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, group_id: &str) -> GraphResult<()> {
        let url = format!("{}/groups/{}", self.config().base_url(), group_id);
        let response = self.client().execute(Method::DELETE, &url, None).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(GraphClient::response_error(status, response).await)
    }
}
