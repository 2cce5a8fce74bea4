//! Common test utilities for entraseed CLI integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use entraseed_graph::{Directory, GraphConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TEST_TENANT: &str = "test-tenant-id";

/// Builds a directory pointed at the mock server, with short retry delays.
pub fn test_directory(server: &MockServer) -> Directory {
    Directory::new(GraphConfig::for_testing(TEST_TENANT, &server.uri())).unwrap()
}

/// Mounts the OAuth token endpoint with a long-lived token.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{TEST_TENANT}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
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
pub fn directory_user(id: &str, display_name: &str, tag: &str) -> Value {
    json!({
        "id": id,
        "displayName": display_name,
        "userPrincipalName": format!("{id}@test.onmicrosoft.com"),
        "employeeId": tag
    })
}

/// Test data factory for a group as Graph returns it.
pub fn directory_group(id: &str, display_name: &str) -> Value {
    json!({
        "id": id,
        "displayName": display_name,
        "description": "Test group for load testing - seeded"
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

/// Wraps sub-responses in a `$batch` response envelope.
pub fn batch_envelope(responses: Vec<Value>) -> Value {
    json!({ "responses": responses })
}

/// Responds to each group creation with a fresh id, echoing the requested
/// display name back like Graph does.
pub struct GroupCreateResponder {
    counter: AtomicUsize,
}

impl GroupCreateResponder {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }
}

impl Respond for GroupCreateResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let spec: Value = serde_json::from_slice(&request.body).unwrap();

        ResponseTemplate::new(201).set_body_json(json!({
            "id": format!("g-{n}"),
            "displayName": spec["displayName"],
            "description": spec["description"],
            "mailNickname": spec["mailNickname"],
        }))
    }
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
