//! Common test utilities for entraseed-graph integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use entraseed_graph::{Directory, GraphConfig, NewUser, PasswordProfile};

pub const TEST_TENANT: &str = "test-tenant-id";

/// Builds a directory pointed at the mock server, with short retry delays.
pub fn test_directory(server: &MockServer) -> Directory {
    Directory::new(GraphConfig::for_testing(TEST_TENANT, &server.uri())).unwrap()
}

/// Builds a directory whose transport layer never retries, so every
/// transient status reaches the shared throttle gate directly.
pub fn test_directory_no_transport_retries(server: &MockServer) -> Directory {
    let mut config = GraphConfig::for_testing(TEST_TENANT, &server.uri());
    config.max_transport_retries = 0;
    Directory::new(config).unwrap()
}

/// Mounts the OAuth token endpoint with a long-lived token.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{TEST_TENANT}/oauth2/v2.0/token")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_response("test-access-token", 3600)),
        )
        .mount(server)
        .await;
}

/// Creates a mock OAuth token response.
pub fn token_response(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

/// Creates an OData error response body.
pub fn odata_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Wraps items in an OData page, optionally with a continuation link.
pub fn odata_page(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut page = json!({ "value": items });
    if let Some(link) = next_link {
        page["@odata.nextLink"] = json!(link);
    }
    page
}

/// Test data factory for a user as Graph returns it.
pub fn directory_user(id: &str, display_name: &str, upn: &str, tag: &str) -> Value {
    json!({
        "id": id,
        "displayName": display_name,
        "userPrincipalName": upn,
        "employeeId": tag
    })
}

/// Test data factory for a group as Graph returns it.
pub fn directory_group(id: &str, display_name: &str) -> Value {
    json!({
        "id": id,
        "displayName": display_name,
        "description": "Test group for load testing - seeded",
        "mailNickname": format!("g{}", id)
    })
}

/// A successful sub-response inside a `$batch` envelope.
pub fn batch_created(id: usize, body: Value) -> Value {
    json!({
        "id": id.to_string(),
        "status": 201,
        "body": body
    })
}

/// A throttled sub-response inside a `$batch` envelope.
pub fn batch_throttled(id: usize, retry_after: &str) -> Value {
    json!({
        "id": id.to_string(),
        "status": 429,
        "headers": { "Retry-After": retry_after },
        "body": odata_error("TooManyRequests", "Too many requests.")
    })
}

/// A failed sub-response inside a `$batch` envelope.
pub fn batch_failed(id: usize, status: u16, code: &str, message: &str) -> Value {
    json!({
        "id": id.to_string(),
        "status": status,
        "body": odata_error(code, message)
    })
}

/// Wraps sub-responses in a `$batch` response envelope.
pub fn batch_envelope(responses: Vec<Value>) -> Value {
    json!({ "responses": responses })
}

/// Builds user creation payloads the way the generator does.
pub fn user_specs(count: usize, tag: &str) -> Vec<NewUser> {
    (1..=count)
        .map(|i| NewUser {
            account_enabled: true,
            display_name: format!("Test User{i}"),
            given_name: "Test".to_string(),
            surname: format!("User{i}"),
            mail_nickname: format!("u{tag}{i:06}"),
            user_principal_name: format!("u{tag}{i:06}@test.onmicrosoft.com"),
            password_profile: PasswordProfile {
                password: "TempPassword123!".to_string(),
                force_change_password_next_sign_in: false,
            },
            job_title: "Engineer".to_string(),
            department: "Engineering".to_string(),
            office_location: "Building 1".to_string(),
            employee_id: tag.to_string(),
        })
        .collect()
}

/// Responds with each template in turn, repeating the last one once the
/// sequence runs out.
pub struct SequenceResponder {
    templates: Vec<ResponseTemplate>,
    hits: AtomicUsize,
}

impl SequenceResponder {
    pub fn new(templates: Vec<ResponseTemplate>) -> Self {
        assert!(!templates.is_empty(), "sequence needs at least one template");
        Self {
            templates,
            hits: AtomicUsize::new(0),
        }
    }
}

impl Respond for SequenceResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.hits.fetch_add(1, Ordering::SeqCst);
        self.templates[n.min(self.templates.len() - 1)].clone()
    }
}
