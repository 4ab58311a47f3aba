//! HTTP API tests: the real router on an ephemeral port, driven with reqwest.

mod common;

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

use common::{make_git_repo, test_config, workspace_entries, ScriptedGateway};
use repodoc::config::Config;
use repodoc::ollama::ModelGateway;
use repodoc::pipeline::Pipeline;
use repodoc::server::build_router;

async fn spawn_app(config: Config, gateway: Arc<dyn ModelGateway>) -> String {
    let pipeline = Arc::new(Pipeline::new(Arc::new(config), gateway));
    let app = build_router(pipeline).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_app(test_config(&tmp), Arc::new(ScriptedGateway::answering(""))).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_generate_readme_returns_model_text() {
    let tmp = TempDir::new().unwrap();
    let repo = make_git_repo(tmp.path(), "svc", &[("main.go", "package main\n")]);
    let config = test_config(&tmp);
    let base = spawn_app(
        config.clone(),
        Arc::new(ScriptedGateway::answering("# svc\n\nA service.")),
    )
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{}/generate-readme", base))
        .json(&json!({ "repo_url": repo.to_str().unwrap() }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "readme": "# svc\n\nA service." }));
    assert!(workspace_entries(&config).is_empty());
}

#[tokio::test]
async fn test_generate_readme_failure_is_structured_500() {
    let tmp = TempDir::new().unwrap();
    let repo = make_git_repo(tmp.path(), "svc", &[("main.go", "package main\n")]);
    let config = test_config(&tmp);
    let base = spawn_app(
        config.clone(),
        Arc::new(ScriptedGateway::failing("Ollama API error 500")),
    )
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{}/generate-readme", base))
        .json(&json!({ "repo_url": repo.to_str().unwrap() }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Ollama API error 500"));
    assert!(workspace_entries(&config).is_empty());
}

#[tokio::test]
async fn test_generate_vitepress_success_body() {
    let tmp = TempDir::new().unwrap();
    let repo = make_git_repo(tmp.path(), "docs-me.git", &[("readme.txt", "hello")]);
    let config = test_config(&tmp);
    let base = spawn_app(config.clone(), Arc::new(ScriptedGateway::answering(""))).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/generate-vitepress", base))
        .json(&json!({ "repo_url": repo.to_str().unwrap() }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "VitePress project generated successfully.");
    assert!(body["output_directory"].as_str().unwrap().ends_with("site"));
    assert_eq!(
        body["instructions"],
        json!([
            format!("cd {}", config.workspace.site_output_dir.display()),
            "npm install",
            "npm run docs:dev"
        ])
    );

    let index =
        std::fs::read_to_string(config.workspace.site_output_dir.join("docs/index.md")).unwrap();
    assert!(index.ends_with("hello"));
    assert!(workspace_entries(&config).is_empty());
}

#[tokio::test]
async fn test_generate_vitepress_failure_is_structured_500() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let base = spawn_app(config.clone(), Arc::new(ScriptedGateway::answering(""))).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/generate-vitepress", base))
        .json(&json!({ "repo_url": tmp.path().join("missing").to_str().unwrap() }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("git clone failed"));
    assert!(workspace_entries(&config).is_empty());
}

#[tokio::test]
async fn test_missing_repo_url_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_app(test_config(&tmp), Arc::new(ScriptedGateway::answering(""))).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/generate-readme", base))
        .json(&json!({ "url": "https://example.com/x.git" }))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_cors_allows_only_configured_origin() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_app(test_config(&tmp), Arc::new(ScriptedGateway::answering(""))).await;
    let client = reqwest::Client::new();

    let allowed = client
        .request(reqwest::Method::OPTIONS, format!("{}/generate-readme", base))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );

    let denied = client
        .request(reqwest::Method::OPTIONS, format!("{}/generate-readme", base))
        .header("Origin", "http://evil.example")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}
