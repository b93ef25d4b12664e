//! Integration tests for the `mistly` CLI binary.
//!
//! Argument parsing, help and completions run offline. Cloud-bound commands
//! run against a wiremock server injected through `MISTLY_BASE_URL`.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `mistly` binary with env isolation.
///
/// Clears all `MISTLY_*` / `MIST_*` env vars and points config directories
/// at a nonexistent path so tests never touch a real deployment document.
fn mistly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mistly");
    cmd.env("HOME", "/tmp/mistly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/mistly-cli-test-nonexistent")
        .env_remove("MISTLY_CONFIG")
        .env_remove("MISTLY_CLOUD")
        .env_remove("MISTLY_BASE_URL")
        .env_remove("MISTLY_TIMEOUT")
        .env_remove("MIST_TOKEN")
        .env_remove("MIST_ORG")
        .env_remove("RUST_LOG");
    cmd
}

/// A `mistly` command bound to `server` with credentials in the environment.
fn cloud_cmd(server: &MockServer, doc: &NamedTempFile) -> assert_cmd::Command {
    let mut cmd = mistly_cmd();
    cmd.env("MISTLY_BASE_URL", server.uri())
        .env("MIST_TOKEN", "master")
        .env("MIST_ORG", "o1")
        .arg("--config")
        .arg(doc.path());
    cmd
}

fn document(value: &Value) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file
}

/// Token mint plus a revocation that must happen exactly once.
async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/self/apitokens"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "tok1", "key": "eph" })),
        )
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/v1/self/apitokens/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(server)
        .await;
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = mistly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    mistly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Mist cloud")
            .and(predicate::str::contains("apply"))
            .and(predicate::str::contains("wlan"))
            .and(predicate::str::contains("ap")),
    );
}

#[test]
fn test_version_flag() {
    mistly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mistly"));
}

#[test]
fn test_unknown_cloud_is_a_usage_error() {
    mistly_cmd()
        .args(["--cloud", "mars", "site", "create"])
        .assert()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    mistly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    mistly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mistly"));
}

// ── Offline failures ────────────────────────────────────────────────

#[test]
fn test_missing_credentials_exit_code() {
    let doc = document(&json!({ "site": { "name": "HQ" } }));
    let output = mistly_cmd()
        .env("MISTLY_BASE_URL", "http://127.0.0.1:9")
        .arg("--config")
        .arg(doc.path())
        .args(["site", "create"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("MIST_TOKEN"), "Expected env hint in output:\n{text}");
}

#[test]
fn test_missing_document_exit_code() {
    mistly_cmd()
        .env("MIST_TOKEN", "master")
        .env("MIST_ORG", "o1")
        .args(["--config", "/tmp/mistly-cli-test-nonexistent/deploy.json", "site", "create"])
        .assert()
        .code(5);
}

// ── Against a mocked cloud ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_site_create_succeeds_and_revokes_token() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orgs/o1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orgs/o1/sites"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "s-new", "name": "HQ" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let doc = document(&json!({ "site": { "name": "HQ", "timezone": "EST" } }));
    cloud_cmd(&server, &doc)
        .args(["site", "create"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Site 'HQ' created (s-new)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_create_fails_but_still_revokes_token() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orgs/o1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orgs/o1/sites"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "bad timezone" })))
        .mount(&server)
        .await;

    let doc = document(&json!({ "site": { "name": "HQ", "timezone": "Nowhere" } }));
    cloud_cmd(&server, &doc)
        .args(["site", "create"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not create Site 'HQ'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refused_site_listing_creates_nothing() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orgs/o1/sites"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orgs/o1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "s-dup" })))
        .expect(0)
        .mount(&server)
        .await;

    let doc = document(&json!({ "site": { "name": "HQ" } }));
    cloud_cmd(&server, &doc)
        .args(["site", "create"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("listing refused"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_site_name_is_config_error() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    let doc = document(&json!({ "site": { "timezone": "EST" } }));
    cloud_cmd(&server, &doc)
        .args(["site", "create"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("site.name"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_radios_on_unassigned_ap_is_not_found() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orgs/o1/sites"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": "s1", "name": "HQ" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/installer/orgs/o1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "mac": "5c5b35000001" }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sites/s1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let doc = document(&json!({
        "site": { "name": "HQ" },
        "ap": {
            "name": "AP-Lobby",
            "24": { "power": 10, "channel": 6 },
            "5": { "power": 17, "channel": 36, "bandwidth": 40 }
        }
    }));
    cloud_cmd(&server, &doc)
        .args(["ap", "radios", "5c:5b:35:00:00:01"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("does not belong to a site"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_token_rejection_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/self/apitokens"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .mount(&server)
        .await;

    let doc = document(&json!({ "site": { "name": "HQ" } }));
    cloud_cmd(&server, &doc)
        .args(["site", "create"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Authentication failed"));
}
