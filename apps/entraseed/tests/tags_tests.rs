//! Tag scanning against a mock Graph tenant.

mod common;

use common::*;
use entraseed::commands::tags;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Two leftover runs, counted from one user listing and one group listing.
#[tokio::test]
async fn test_scan_buckets_objects_per_tag() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("$filter", "startswith(employeeId, 'LT')"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![
                directory_user("u1", "Test User1", "LT1"),
                directory_user("u2", "Test User2", "LT1"),
                directory_user("u3", "Test User3", "LT2"),
            ],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .and(query_param("$filter", "startswith(displayName, 'TEST-LT')"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![
                directory_group("g1", "TEST-LT1-TestGroup0001 Engineering"),
                directory_group("g2", "TEST-LT2-TestGroup0001 Sales"),
                directory_group("g3", "TEST-LT2-TestGroup0002 Senior Engineer"),
            ],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let directory = test_directory(&server);
    let summary = tags::scan(&directory).await.unwrap();

    assert_eq!(summary.len(), 2);
    assert_eq!(summary["LT1"].users, 2);
    assert_eq!(summary["LT1"].groups, 1);
    assert_eq!(summary["LT2"].users, 1);
    assert_eq!(summary["LT2"].groups, 2);

    let tags: Vec<&str> = summary.keys().map(String::as_str).collect();
    assert_eq!(tags, ["LT1", "LT2"]);
}

/// A tenant with no tagged objects yields an empty summary.
#[tokio::test]
async fn test_scan_empty_tenant() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(Vec::new(), None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(Vec::new(), None)))
        .expect(1)
        .mount(&server)
        .await;

    let directory = test_directory(&server);
    let summary = tags::scan(&directory).await.unwrap();

    assert!(summary.is_empty());
}
