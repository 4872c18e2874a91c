//! Integration tests for the `innkeep` CLI binary.
//!
//! Argument parsing, help output, shell completions and local commands run
//! without a backend; session-bound commands talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// The `innkeep` binary with env isolation: config and data directories
/// point into `home`, and every `INNKEEP_*` variable is cleared.
fn innkeep_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("innkeep");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("INNKEEP_PROFILE")
        .env_remove("INNKEEP_API_URL")
        .env_remove("INNKEEP_WS_URL")
        .env_remove("INNKEEP_TOKEN")
        .env_remove("INNKEEP_PROPERTY")
        .env_remove("INNKEEP_OUTPUT")
        .env_remove("INNKEEP_INSECURE")
        .env_remove("INNKEEP_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same, pointed at `server` with a bearer token so no keyring is needed.
fn session_cmd(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = innkeep_cmd(home);
    cmd.args(["--api-url", &server.uri(), "--token", "test-token", "--color", "never"]);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

async fn mock_verify(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ok(json!({
            "user": { "id": 1, "email": "ops@example.com", "role": "admin" }
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = innkeep_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_resource_commands() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("guests")
            .and(predicate::str::contains("activities"))
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("kiosk"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("innkeep"));
}

#[test]
fn test_subcommand_help_shows_operations() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["guests", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("check-in")
                .and(predicate::str::contains("check-out"))
                .and(predicate::str::contains("status")),
        );
    innkeep_cmd(&home)
        .args(["kiosk", "enable", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--return-after"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Parse errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = innkeep_cmd(&home).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("foobar"));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = innkeep_cmd(&home)
        .args(["--output", "xml", "guests", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("xml"));
}

#[test]
fn test_image_flags_are_exclusive() {
    let home = TempDir::new().unwrap();
    let output = innkeep_cmd(&home)
        .args([
            "activities",
            "create",
            "--title",
            "Hiking",
            "--image-url",
            "https://example.com/a.jpg",
            "--image-search",
            "alps",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("cannot be used with"));
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_config_path_prints_toml_location() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_without_file() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_use_unknown_profile_fails() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["config", "use", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_unknown_profile_flag_fails_before_network() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["--profile", "nope", "guests", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_streaming_presets_need_no_session() {
    let home = TempDir::new().unwrap();
    innkeep_cmd(&home)
        .args(["streaming", "presets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Netflix").and(predicate::str::contains("nflx://")));
}

// ── Session-bound commands ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "message": "Token expired" })),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = session_cmd(&home, &server)
        .args(["guests", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("innkeep login"));
}

#[test]
fn test_unreachable_backend_is_a_connection_error() {
    let home = TempDir::new().unwrap();
    let output = innkeep_cmd(&home)
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "--token",
            "t",
            "--timeout",
            "2",
            "guests",
            "list",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_guest_list_as_json() {
    let server = MockServer::start().await;
    mock_verify(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/guests"))
        .and(query_param("property_id", "3"))
        .respond_with(ok(json!([
            { "id": 10, "property_id": 3, "name": "Anna Berg", "status": "checked_in", "check_in_date": "2024-06-02" },
            { "id": 11, "property_id": 3, "name": "Ben Cole", "status": "reserved", "check_in_date": "2024-06-01" }
        ])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = session_cmd(&home, &server)
        .args(["-P", "3", "-o", "json", "guests", "list", "--status", "checked_in"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], 10);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_activity_toggle_reports_once() {
    let server = MockServer::start().await;
    mock_verify(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .respond_with(ok(json!([
            { "id": 5, "property_id": 3, "title": "Hiking", "activity_type": "outdoor", "is_active": true, "display_order": 0 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/activities/5/toggle"))
        .and(body_json(json!({ "is_active": false })))
        .respond_with(ok(json!(
            { "id": 5, "property_id": 3, "title": "Hiking", "activity_type": "outdoor", "is_active": false, "display_order": 0 }
        )))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = session_cmd(&home, &server)
        .args(["-P", "3", "activities", "toggle", "5"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Activity Hiking deactivated").count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_backend_message_is_shown_verbatim() {
    let server = MockServer::start().await;
    mock_verify(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/guests"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "Room 12 is already occupied"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    session_cmd(&home, &server)
        .args(["-P", "3", "guests", "create", "--first-name", "Anna", "--room", "12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Room 12 is already occupied"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_is_refused_when_piped() {
    let server = MockServer::start().await;
    mock_verify(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/guests/10"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = session_cmd(&home, &server)
        .args(["guests", "delete", "10"])
        .write_stdin("")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_images_fetch_writes_proxied_bytes() {
    let server = MockServer::start().await;
    mock_verify(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/proxy/image"))
        .and(query_param("url", "https://cdn.example.com/a.gif"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/gif")
                .set_body_bytes(b"GIF89a".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let out = home.path().join("a.gif");
    let output = session_cmd(&home, &server)
        .args(["images", "fetch", "https://cdn.example.com/a.gif", "-O"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(std::fs::read(&out).unwrap(), b"GIF89a");
}
