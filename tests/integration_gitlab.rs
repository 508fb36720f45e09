// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for catalog resolution using wiremock.
//!
//! Covers:
//! - Pagination termination
//! - Group expansion over descendant groups
//! - Empty-repository and exclusion filtering
//! - Non-200 and transport failures
//! - Credential handling

use gitlab_mirror::audit::MemoryAuditSink;
use gitlab_mirror::config::types::GitlabConfig;
use gitlab_mirror::gitlab::auth;
use gitlab_mirror::gitlab::{CatalogResolver, Credential, ExcludeFilter, GitlabClient, Selector};
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitlabClient {
    let config = GitlabConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    GitlabClient::new(&config).expect("client")
}

fn project(id: u64, path_with_namespace: &str, empty: bool) -> Value {
    let name = path_with_namespace.rsplit('/').next().unwrap_or_default();
    json!({
        "id": id,
        "name": name,
        "path_with_namespace": path_with_namespace,
        "default_branch": if empty { Value::Null } else { json!("main") },
        "ssh_url_to_repo": format!("git@gitlab.example.com:{path_with_namespace}.git"),
        "http_url_to_repo": format!("https://gitlab.example.com/{path_with_namespace}.git"),
        "web_url": format!("https://gitlab.example.com/{path_with_namespace}"),
        "readme_url": null,
        "_links": {"self": format!("https://gitlab.example.com/api/v4/projects/{id}")},
        "empty_repo": empty,
        "created_at": "2022-05-01T12:00:00.000Z",
        "last_activity_at": "2025-01-10T09:15:00.000Z",
        "star_count": 0
    })
}

fn page(body: Value, page: u32, total: u32) -> ResponseTemplate {
    let next = if page < total {
        (page + 1).to_string()
    } else {
        String::new()
    };
    ResponseTemplate::new(200)
        .set_body_json(body)
        .insert_header("x-total-pages", total.to_string().as_str())
        .insert_header("x-page", page.to_string().as_str())
        .insert_header("x-next-page", next.as_str())
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_all_projects_issues_one_request_per_page() {
    let server = MockServer::start().await;
    for n in 1..=3u32 {
        Mock::given(method("GET"))
            .and(path("/api/v4/projects"))
            .and(query_param("page", n.to_string().as_str()))
            .and(query_param("order_by", "id"))
            .and(query_param("per_page", "100"))
            .respond_with(page(
                json!([project(u64::from(n) * 10, &format!("team/p{n}"), false)]),
                n,
                3,
            ))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .resolve(&Selector::All, &mut audit)
        .await
        .unwrap();

    let ids: Vec<_> = descriptors.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    assert_eq!(audit.snapshots().len(), 1);
}

#[tokio::test]
async fn test_zero_total_pages_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .insert_header("x-total-pages", "0")
                .insert_header("x-page", "1")
                .insert_header("x-next-page", "2"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .resolve(&Selector::All, &mut audit)
        .await
        .unwrap();
    assert!(descriptors.is_empty());
}

#[tokio::test]
async fn test_error_page_keeps_earlier_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("page", "1"))
        .respond_with(page(json!([project(1, "team/a", false)]), 1, 2))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .resolve(&Selector::All, &mut audit)
        .await
        .unwrap();
    assert_eq!(descriptors.len(), 1);
}

// =============================================================================
// Group expansion
// =============================================================================

#[tokio::test]
async fn test_group_with_descendants_skips_empty_repositories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/42/descendant_groups"))
        .respond_with(page(json!([{"id": 43}, {"id": 44}]), 1, 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/42/projects"))
        .respond_with(page(json!([project(100, "root/top", false)]), 1, 1))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/43/projects"))
        .and(query_param("order_by", "updated_at"))
        .respond_with(page(
            json!([
                project(101, "root/sub-a/api", false),
                project(102, "root/sub-a/web", false)
            ]),
            1,
            1,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/44/projects"))
        .respond_with(page(json!([project(103, "root/sub-b/void", true)]), 1, 1))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .resolve(&Selector::Group("42".to_string()), &mut audit)
        .await
        .unwrap();

    let paths: Vec<_> = descriptors
        .iter()
        .map(|d| d.path_with_namespace.as_str())
        .collect();
    assert_eq!(paths, vec!["root/sub-a/api", "root/sub-a/web"]);
    assert!(descriptors.iter().all(|d| !d.empty_repo));

    let snapshot: Vec<Value> = serde_json::from_str(&audit.snapshots()[0]).unwrap();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot[0].get("_links").is_none());
    assert!(snapshot[0].get("star_count").is_none());
}

#[tokio::test]
async fn test_group_duplicates_exclusions_and_unsafe_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/7/descendant_groups"))
        .respond_with(page(json!([{"id": 8}, {"id": 9}]), 1, 1))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/8/projects"))
        .respond_with(page(
            json!([project(1, "ops/tools", false), project(2, "ops/sandbox-x", false)]),
            1,
            1,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/9/projects"))
        .respond_with(page(
            json!([
                project(1, "ops/tools", false),
                project(3, "ops/infra/dns", false),
                project(4, "ops/../../outside", false)
            ]),
            1,
            1,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let exclude = ExcludeFilter::new(&["ops/sandbox-*".to_string()]).unwrap();
    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .with_exclude(exclude)
        .resolve(&Selector::Group("7".to_string()), &mut audit)
        .await
        .unwrap();

    let ids: Vec<_> = descriptors.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

// =============================================================================
// Single project
// =============================================================================

#[tokio::test]
async fn test_project_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/platform%2Fapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project(12, "platform/api", false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .resolve(&Selector::Project("platform/api".to_string()), &mut audit)
        .await
        .unwrap();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].default_branch(), Some("main"));
}

#[tokio::test]
async fn test_project_not_found_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "404 Project Not Found"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .resolve(&Selector::Project("999".to_string()), &mut audit)
        .await
        .unwrap();
    assert!(descriptors.is_empty());
    assert_eq!(audit.snapshots(), ["[]".to_string()]);
}

#[tokio::test]
async fn test_transport_failure_is_an_error() {
    let config = GitlabConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 5,
        ..Default::default()
    };
    let client = GitlabClient::new(&config).unwrap();
    let mut audit = MemoryAuditSink::new();
    let result = CatalogResolver::new(&client)
        .resolve(&Selector::All, &mut audit)
        .await;
    assert!(result.is_err());
    assert!(audit.snapshots().is_empty());
}

// =============================================================================
// Credentials
// =============================================================================

#[tokio::test]
async fn test_anonymous_requests_send_none_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(header("Authorization", "none none"))
        .respond_with(page(json!([project(5, "pub/lib", false)]), 1, 1))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let credential = auth::acquire(&client, &GitlabConfig::default()).await;
    assert!(credential.is_none());

    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .resolve(&Selector::All, &mut audit)
        .await
        .unwrap();
    assert_eq!(descriptors.len(), 1);
}

#[tokio::test]
async fn test_password_grant_token_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=backup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "token_type": "Bearer",
            "refresh_token": "r",
            "created_at": 1_700_000_000
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project(1, "team/app", false)))
        .expect(1)
        .mount(&server)
        .await;

    let config = GitlabConfig {
        base_url: server.uri(),
        username: "backup".to_string(),
        password: "s3cret".to_string(),
        ..Default::default()
    };
    let client = GitlabClient::new(&config).unwrap();
    let credential = auth::acquire(&client, &config).await;
    assert_eq!(credential, Some(Credential::new("Bearer", "abc123")));

    let client = client.with_credential(credential.as_ref());
    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .resolve(&Selector::Project("1".to_string()), &mut audit)
        .await
        .unwrap();
    assert_eq!(descriptors.len(), 1);
}

#[tokio::test]
async fn test_rejected_password_grant_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let config = GitlabConfig {
        base_url: server.uri(),
        username: "backup".to_string(),
        password: "wrong".to_string(),
        ..Default::default()
    };
    let client = GitlabClient::new(&config).unwrap();

    let err = auth::password_grant(&client, "backup", "wrong")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("http error 401"));
    assert!(auth::acquire(&client, &config).await.is_none());
}

#[tokio::test]
async fn test_configured_token_skips_password_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = GitlabConfig {
        base_url: server.uri(),
        username: "backup".to_string(),
        password: "s3cret".to_string(),
        token: "glpat-xyz".to_string(),
        token_type: "Bearer".to_string(),
        ..Default::default()
    };
    let client = GitlabClient::new(&config).unwrap();
    let credential = auth::acquire(&client, &config).await;
    assert_eq!(credential, Some(Credential::new("Bearer", "glpat-xyz")));
}
