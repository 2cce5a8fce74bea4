//! Cleanup runs against a mock Graph tenant.

mod common;

use common::*;
use entraseed::commands::cleanup::{self, CleanupArgs};
use entraseed::commands::ConnectionArgs;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TAG: &str = "LT123456781234";

fn cleanup_args(confirm: bool) -> CleanupArgs {
    CleanupArgs {
        connection: ConnectionArgs {
            tenant_id: TEST_TENANT.to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            tenant_domain: None,
            graph_url: None,
            login_url: None,
        },
        tag: TAG.to_string(),
        confirm,
        users_only: false,
        groups_only: false,
    }
}

async fn mount_tagged_users(server: &MockServer, count: usize) {
    let users = (1..=count)
        .map(|i| directory_user(&format!("u{i}"), &format!("Test User{i}"), TAG))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("$filter", format!("employeeId eq '{TAG}'")))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(users, None)))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_tagged_groups(server: &MockServer, count: usize) {
    let groups = (1..=count)
        .map(|i| {
            directory_group(
                &format!("g{i}"),
                &format!("TEST-{TAG}-TestGroup{i:04} Engineering"),
            )
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .and(query_param(
            "$filter",
            format!("startswith(displayName, 'TEST-{TAG}-')"),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(groups, None)))
        .expect(1)
        .mount(server)
        .await;
}

/// Without --confirm the command lists what it found and deletes nothing.
#[tokio::test]
async fn test_cleanup_dry_run_deletes_nothing() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_tagged_users(&server, 12).await;
    mount_tagged_groups(&server, 2).await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/v1\.0/(users|groups)/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let directory = test_directory(&server);
    let report = cleanup::run(&directory, &cleanup_args(false)).await.unwrap();

    assert!(report.dry_run);
    assert_eq!(report.users_found, 12);
    assert_eq!(report.groups_found, 2);
    assert_eq!(report.users_deleted, 0);
    assert_eq!(report.groups_deleted, 0);
}

/// A rejected deletion is counted and skipped; the rest still go through.
#[tokio::test]
async fn test_cleanup_confirmed_counts_failures() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_tagged_users(&server, 12).await;
    mount_tagged_groups(&server, 1).await;

    // Mounted before the catch-all so u7 hits the 404.
    Mock::given(method("DELETE"))
        .and(path("/v1.0/users/u7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(odata_error(
            "Request_ResourceNotFound",
            "Resource 'u7' does not exist.",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/v1\.0/users/u\d+$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(11)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1.0/groups/g1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let directory = test_directory(&server);
    let report = cleanup::run(&directory, &cleanup_args(true)).await.unwrap();

    assert!(!report.dry_run);
    assert_eq!(report.users_found, 12);
    assert_eq!(report.users_deleted, 11);
    assert_eq!(report.users_failed, 1);
    assert_eq!(report.groups_deleted, 1);
    assert_eq!(report.groups_failed, 0);
}

/// --users-only never touches the groups listing.
#[tokio::test]
async fn test_cleanup_users_only_skips_groups() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_tagged_users(&server, 3).await;

    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(Vec::new(), None)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/v1\.0/users/u\d+$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let directory = test_directory(&server);
    let mut args = cleanup_args(true);
    args.users_only = true;
    let report = cleanup::run(&directory, &args).await.unwrap();

    assert_eq!(report.users_deleted, 3);
    assert_eq!(report.groups_found, 0);
    assert_eq!(report.groups_deleted, 0);
}
