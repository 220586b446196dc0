//! End-to-end tests for the `postlens` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A `postlens` invocation isolated from the user's config and environment.
fn postlens(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("postlens").unwrap();
    cmd.current_dir(home.path())
        .env("POSTLENS_CONFIG", home.path().join("config.toml"))
        .env_remove("POSTLENS_API_URL")
        .env_remove("POSTLENS_TIMEOUT")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

async fn mount_extract(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/extract"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_analyze(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn extracted() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "filename": "post.pdf",
        "extracted_text": "Hello world",
        "file_type": "application/pdf",
        "status": "success"
    }))
}

fn analyzed() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "summary": "A greeting",
        "sentiment": "Neutral",
        "improvement_suggestions": ["Add a call to action"]
    }))
}

// ==================== analyze ====================

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_prints_summary_sentiment_and_suggestions() {
    let server = MockServer::start().await;
    mount_extract(&server, extracted()).await;
    mount_analyze(&server, analyzed()).await;

    let home = TempDir::new().unwrap();
    let file = write_file(&home, "post.pdf", b"%PDF-1.7");

    postlens(&home)
        .args(["--api-url", server.uri().as_str(), "analyze", arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("A greeting"))
        .stdout(predicate::str::contains("Sentiment: Neutral"))
        .stdout(predicate::str::contains("1. Add a call to action"))
        .stdout(predicate::str::contains("Hello world").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_json_output() {
    let server = MockServer::start().await;
    mount_extract(&server, extracted()).await;
    mount_analyze(&server, analyzed()).await;

    let home = TempDir::new().unwrap();
    let file = write_file(&home, "post.pdf", b"%PDF-1.7");

    let output = postlens(&home)
        .args(["--api-url", server.uri().as_str(), "--format", "json"])
        .args(["analyze", "--show-text", arg(&file)])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "success");
    assert_eq!(report["file"], "post.pdf");
    assert_eq!(report["summary"], "A greeting");
    assert_eq!(report["improvement_suggestions"], json!(["Add a call to action"]));
    assert_eq!(report["extracted_text"], "Hello world");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_surfaces_extraction_detail() {
    let server = MockServer::start().await;
    mount_extract(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({ "detail": "Unsupported file" })),
    )
    .await;

    let home = TempDir::new().unwrap();
    let file = write_file(&home, "post.pdf", b"%PDF-1.7");

    postlens(&home)
        .args(["--api-url", server.uri().as_str(), "analyze", arg(&file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_failure_can_still_reveal_extracted_text() {
    let server = MockServer::start().await;
    mount_extract(&server, extracted()).await;
    mount_analyze(&server, ResponseTemplate::new(500).set_body_string("oops")).await;

    let home = TempDir::new().unwrap();
    let file = write_file(&home, "post.pdf", b"%PDF-1.7");

    let output = postlens(&home)
        .args(["--api-url", server.uri().as_str(), "--format", "json"])
        .args(["analyze", "--show-text", arg(&file)])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "error");
    assert_eq!(report["message"], "AI Analysis failed.");
    assert_eq!(report["extracted_text"], "Hello world");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_uses_first_file_and_warns_on_unexpected_type() {
    let server = MockServer::start().await;
    mount_extract(&server, extracted()).await;
    mount_analyze(&server, analyzed()).await;

    let home = TempDir::new().unwrap();
    let first = write_file(&home, "notes.txt", b"plain text");
    let second = write_file(&home, "post.pdf", b"%PDF-1.7");

    postlens(&home)
        .args(["--api-url", server.uri().as_str(), "analyze", arg(&first), arg(&second)])
        .assert()
        .success()
        .stderr(predicate::str::contains("Using notes.txt; ignoring 1 more file(s)"))
        .stderr(predicate::str::contains("the service may reject it"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_ignores_extra_files_without_reading_them() {
    let server = MockServer::start().await;
    mount_extract(&server, extracted()).await;
    mount_analyze(&server, analyzed()).await;

    let home = TempDir::new().unwrap();
    let file = write_file(&home, "post.pdf", b"%PDF-1.7");
    let missing = home.path().join("missing-extra.pdf");

    postlens(&home)
        .args(["--api-url", server.uri().as_str(), "analyze", arg(&file), arg(&missing)])
        .assert()
        .success()
        .stdout(predicate::str::contains("A greeting"))
        .stderr(predicate::str::contains("Using post.pdf; ignoring 1 more file(s)"))
        .stderr(predicate::str::contains("Could not read").not());
}

#[test]
fn test_analyze_missing_file() {
    let home = TempDir::new().unwrap();

    postlens(&home)
        .args(["analyze", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read"));
}

#[test]
fn test_analyze_unreachable_service() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let home = TempDir::new().unwrap();
    let file = write_file(&home, "post.png", b"\x89PNG");

    postlens(&home)
        .args(["--api-url", format!("http://127.0.0.1:{}", port).as_str()])
        .args(["analyze", arg(&file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to extract text from the file."));
}

// ==================== extract ====================

#[tokio::test(flavor = "multi_thread")]
async fn test_extract_prints_text() {
    let server = MockServer::start().await;
    mount_extract(&server, extracted()).await;

    let home = TempDir::new().unwrap();
    let file = write_file(&home, "post.pdf", b"%PDF-1.7");

    postlens(&home)
        .args(["--api-url", server.uri().as_str(), "extract", arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello world"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_url_from_config_file() {
    let server = MockServer::start().await;
    mount_extract(&server, extracted()).await;

    let home = TempDir::new().unwrap();
    let file = write_file(&home, "post.pdf", b"%PDF-1.7");

    postlens(&home)
        .args(["config", "set", "api_url", server.uri().as_str()])
        .assert()
        .success();

    postlens(&home)
        .args(["extract", arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello world"));
}

// ==================== config ====================

#[test]
fn test_config_set_get_reset() {
    let home = TempDir::new().unwrap();

    postlens(&home)
        .args(["config", "set", "timeout_seconds", "30"])
        .assert()
        .success();

    postlens(&home)
        .args(["config", "get", "timeout_seconds"])
        .assert()
        .success()
        .stdout(predicate::str::diff("30\n"));

    postlens(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_seconds: 30"))
        .stdout(predicate::str::contains("api_url: (not set)"));

    postlens(&home)
        .args(["config", "reset", "--force"])
        .assert()
        .success();

    assert!(!home.path().join("config.toml").exists());
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = TempDir::new().unwrap();

    postlens(&home)
        .args(["config", "set", "api_key", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_path_honours_override() {
    let home = TempDir::new().unwrap();

    postlens(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ==================== misc ====================

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();

    postlens(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("postlens"));

    postlens(&home)
        .args(["--format", "json", "version", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"accepted_types\": \".pdf,image/png,image/jpeg\""));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();

    postlens(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("postlens"));
}
