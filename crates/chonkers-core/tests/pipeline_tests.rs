//! End-to-end tests for the repository and file pipelines against a mocked
//! GitHub API.

use chonkers_core::models::EntryDetails;
use chonkers_core::{Chonkers, ChonkersConfig, ChonkersError, OutputDocument, RepoScope};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, site: &TempDir) -> ChonkersConfig {
    ChonkersConfig::new()
        .with_api_base(server.uri())
        .with_raw_base(format!("{}/raw", server.uri()))
        .with_search_delay(Duration::ZERO)
        .with_site_root(site.path())
}

fn repo_json(name: &str, size: u64) -> Value {
    json!({
        "id": 1,
        "html_url": format!("https://github.com/octo/{}", name),
        "full_name": format!("octo/{}", name),
        "owner": { "login": "octo", "avatar_url": "https://avatars.example/octo" },
        "size": size,
        "stargazers_count": 7,
        "watchers_count": 7,
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "homepage": null,
        "language": "Rust",
        "open_issues_count": 2,
        "forks": 1,
        "default_branch": "main"
    })
}

fn code_item(file: &str) -> Value {
    json!({
        "name": file,
        "path": format!("data/{}", file),
        "sha": "abc",
        "url": format!("https://api.github.com/repositories/1/contents/data/{}?ref=abc", file),
        "html_url": format!("https://github.com/octo/big/blob/abc/data/{}", file),
        "repository": {
            "full_name": "octo/big",
            "html_url": "https://github.com/octo/big",
            "owner": { "login": "octo", "avatar_url": "https://avatars.example/octo" }
        },
        "score": 1.0
    })
}

fn code_page(files: &[&str]) -> Value {
    json!({
        "total_count": files.len(),
        "incomplete_results": false,
        "items": files.iter().map(|f| code_item(f)).collect::<Vec<_>>()
    })
}

async fn mount_raw_size(server: &MockServer, file: &str, size: usize) {
    Mock::given(method("HEAD"))
        .and(path(format!("/raw/octo/big/abc/data/{}", file)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", size.to_string().as_str())
                .set_body_bytes(vec![b'x'; size]),
        )
        .mount(server)
        .await;
}

fn read_document(path: &std::path::Path) -> OutputDocument {
    let contents = std::fs::read_to_string(path).unwrap();
    serde_yaml::from_str(&contents).unwrap()
}

#[tokio::test]
async fn test_user_repositories_paginate_until_empty_page() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([repo_json("small", 10), repo_json("huge", 5000)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("mid", 300)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let chonkers = Chonkers::new(test_config(&server, &site)).unwrap();
    let outcome = chonkers
        .run_repositories(&RepoScope::User("octo".into()), false)
        .await
        .unwrap();

    assert!(outcome.written);
    assert_eq!(outcome.path, site.path().join("_data").join("repos.yml"));

    let names: Vec<&str> = outcome.document.chonkers.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["octo/huge", "octo/mid", "octo/small"]);
    let tiers: Vec<u8> = outcome.document.chonkers.iter().map(|e| e.tier).collect();
    assert_eq!(tiers, vec![6, 5, 4]);

    let written = read_document(&outcome.path);
    assert_eq!(written, outcome.document);
    assert_eq!(written.chonkers[0].label, "OH LAWD HE COMIN");
    assert_eq!(written.chonkers[0].size, "4.88 KB");
    assert_eq!(written.chonkers[0].image, "/assets/images/sizes/6.png");
}

#[tokio::test]
async fn test_global_search_keeps_every_repository() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "size:>1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "incomplete_results": false,
            "items": [repo_json("a", 500), repo_json("b", 2000), repo_json("c", 500)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, &site).with_repo_min_size(1000);
    let chonkers = Chonkers::new(config).unwrap();
    let document = chonkers.rank_repositories(&RepoScope::Global).await.unwrap();

    assert_eq!(document.len(), 3);
    assert_eq!(document.chonkers[0].name, "octo/b");
    assert_eq!(document.chonkers[0].rawsize, 2000);
    assert!(document.chonkers[1..].iter().all(|e| e.rawsize == 500));
    match &document.chonkers[0].details {
        EntryDetails::Repository(details) => {
            assert_eq!(details.stargazers_count, Some(7));
            assert_eq!(details.default_branch.as_deref(), Some("main"));
        }
        other => panic!("unexpected details: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_failure_aborts_without_writing() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "rate limited" })),
        )
        .mount(&server)
        .await;

    let chonkers = Chonkers::new(test_config(&server, &site)).unwrap();
    let err = chonkers
        .run_repositories(&RepoScope::User("octo".into()), false)
        .await
        .unwrap_err();

    match &err {
        ChonkersError::GitHubApi { status, reason, body } => {
            assert_eq!(*status, 403);
            assert_eq!(reason, "Forbidden");
            assert_eq!(body, r#"{"message":"rate limited"}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("rate limited"));
    assert!(!site.path().join("_data").join("repos.yml").exists());
    assert!(!site.path().join("_data").exists());
}

#[tokio::test]
async fn test_failure_leaves_previous_output_untouched() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();
    let data_dir = site.path().join("_data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("files.yml"), "chonkers: []\n").unwrap();

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let chonkers = Chonkers::new(test_config(&server, &site)).unwrap();
    let err = chonkers.run_files("octo", false).await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(
        std::fs::read_to_string(data_dir.join("files.yml")).unwrap(),
        "chonkers: []\n"
    );
}

#[tokio::test]
async fn test_file_search_dedups_and_ranks_by_resolved_size() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "user:octo size:>380000"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(code_page(&["a.bin", "b.bin"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "user:octo size:>360000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(code_page(&["b.bin", "c.bin"])))
        .expect(1)
        .mount(&server)
        .await;

    mount_raw_size(&server, "a.bin", 100).await;
    mount_raw_size(&server, "b.bin", 3000).await;
    mount_raw_size(&server, "c.bin", 1500).await;

    let config = test_config(&server, &site).with_file_quota(3);
    let chonkers = Chonkers::new(config).unwrap();
    let outcome = chonkers.run_files("octo", false).await.unwrap();

    let document = read_document(&site.path().join("_data").join("files.yml"));
    assert_eq!(document, outcome.document);
    assert_eq!(document.len(), 3);

    let names: Vec<&str> = document.chonkers.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["octo/big/data/b.bin", "octo/big/data/c.bin", "octo/big/data/a.bin"]
    );
    let sizes: Vec<u64> = document.chonkers.iter().map(|e| e.rawsize).collect();
    assert_eq!(sizes, vec![3000, 1500, 100]);
    assert_eq!(document.chonkers[0].size, "2.93 KB");
    assert_eq!(document.chonkers[0].tier, 6);
    assert_eq!(
        document.chonkers[0].url,
        "https://github.com/octo/big/blob/abc/data/b.bin"
    );
    match &document.chonkers[0].details {
        EntryDetails::File(details) => {
            assert_eq!(details.filename, "b.bin");
            assert_eq!(details.path, "data/b.bin");
            assert_eq!(details.repository, "octo/big");
        }
        other => panic!("unexpected details: {other:?}"),
    }
}

#[tokio::test]
async fn test_file_search_stops_at_round_limit() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(code_page(&["a.bin"])))
        .expect(3)
        .mount(&server)
        .await;
    mount_raw_size(&server, "a.bin", 42).await;

    let config = test_config(&server, &site).with_file_max_rounds(3);
    let chonkers = Chonkers::new(config).unwrap();
    let items = chonkers.github().search_user_files("octo").await.unwrap();

    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_file_search_stops_after_zero_threshold() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    for threshold in ["20", "5", "0"] {
        Mock::given(method("GET"))
            .and(path("/search/code"))
            .and(query_param("q", format!("user:octo size:>{}", threshold)))
            .respond_with(ResponseTemplate::new(200).set_body_json(code_page(&[])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = test_config(&server, &site)
        .with_file_min_size(20)
        .with_file_size_step(15);
    let chonkers = Chonkers::new(config).unwrap();
    let outcome = chonkers.run_files("octo", true).await.unwrap();

    assert!(outcome.document.is_empty());
    assert!(!outcome.written);
    assert!(!site.path().join("_data").exists());
}

#[tokio::test]
async fn test_raw_lookup_failure_is_fatal() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(code_page(&["a.bin"])))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/raw/octo/big/abc/data/a.bin"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config(&server, &site).with_file_quota(1);
    let chonkers = Chonkers::new(config).unwrap();
    let err = chonkers.run_files("octo", false).await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(!site.path().join("_data").join("files.yml").exists());
}

#[tokio::test]
async fn test_requests_carry_github_headers() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .and(header("authorization", "token s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, &site).with_token(Some("s3cret".into()));
    let chonkers = Chonkers::new(config).unwrap();
    let repos = chonkers.github().list_user_repositories("octo").await.unwrap();

    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_rate_limit_headers_are_tracked() {
    let server = MockServer::start().await;
    let site = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-RateLimit-Remaining", "42")
                .insert_header("X-RateLimit-Limit", "60")
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let chonkers = Chonkers::new(test_config(&server, &site)).unwrap();
    chonkers.github().list_user_repositories("octo").await.unwrap();

    let state = chonkers.github().http().rate_limit_state();
    assert_eq!(state.remaining, Some(42));
    assert_eq!(state.limit, Some(60));
    assert!(!state.should_throttle());
}
