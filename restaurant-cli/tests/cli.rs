//! Restaurant CLI commands against a throwaway store file, with a mock API
//! for the commands that need one.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cli(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("restaurant-cli").expect("binary should build");
    cmd.env("RESTAURANT_STORE", store)
        .env("RESTAURANT_API_URL", "http://127.0.0.1:9")
        .env_remove("RUST_LOG");
    cmd
}

fn stored(store: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(store).expect("store file should exist");
    serde_json::from_str(&raw).expect("store file should be JSON")
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().expect("tempdir");
    cli(&dir.path().join("s.json"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("restaurants"))
        .stdout(predicate::str::contains("favorite"));
}

#[test]
fn status_without_session_reports_logged_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    cli(&dir.path().join("s.json"))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"))
        .stdout(predicate::str::contains("Favorites: 0"));
}

#[test]
fn favorite_toggles_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("s.json");

    cli(&store)
        .args(["favorite", "--id", "r-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added r-1"));
    assert_eq!(stored(&store)["favorites"], r#"["r-1"]"#);

    cli(&store)
        .args(["favorite", "--id", "r-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed r-1"));
    assert_eq!(stored(&store)["favorites"], "[]");
}

#[test]
fn logout_clears_session_but_keeps_favorites_and_avatar() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("s.json");
    fs::write(
        &store,
        serde_json::json!({
            "token": "jwt-token",
            "user": r#"{"_id":"u-1","username":"matti","email":"matti@student.metropolia.fi"}"#,
            "favorites": r#"["r-1","r-2"]"#,
            "user-avatar": "data:image/png;base64,AAAA",
        })
        .to_string(),
    )
    .expect("seed store");

    cli(&store)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as matti"));

    cli(&store)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("You have logged out."));

    let after = stored(&store);
    assert!(after.get("token").is_none());
    assert!(after.get("user").is_none());
    assert_eq!(after["favorites"], r#"["r-1","r-2"]"#);
    assert_eq!(after["user-avatar"], "data:image/png;base64,AAAA");

    cli(&store)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"))
        .stdout(predicate::str::contains("Favorites: 2"));
}

#[test]
fn favorites_without_any_skip_the_network() {
    let dir = tempfile::tempdir().expect("tempdir");
    cli(&dir.path().join("s.json"))
        .arg("favorites")
        .assert()
        .success()
        .stdout(predicate::str::contains("No favorites yet."));
}

#[test]
fn unreachable_api_fails_restaurant_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    cli(&dir.path().join("s.json"))
        .arg("restaurants")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load restaurants"));
}

/// Runs the CLI off the async runtime so the mock server keeps serving.
async fn run_against(
    server: &MockServer,
    store: PathBuf,
    args: &'static [&'static str],
) -> assert_cmd::assert::Assert {
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        cli(&store)
            .env("RESTAURANT_API_URL", uri)
            .args(args)
            .assert()
    })
    .await
    .expect("cli task")
}

#[tokio::test(flavor = "multi_thread")]
async fn register_stores_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({
            "username": "matti",
            "password": "pw",
            "email": "matti@student.metropolia.fi",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "user created" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("s.json");

    run_against(&server, store.clone(), &["register", "-u", "matti", "-p", "pw"])
        .await
        .success()
        .stdout(predicate::str::contains("Registration successful! Please login."));

    if store.exists() {
        let after = stored(&store);
        assert!(after.get("token").is_none());
        assert!(after.get("user").is_none());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn login_stores_token_and_fallback_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt-token" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("s.json");

    run_against(&server, store.clone(), &["login", "-u", "matti", "-p", "pw"])
        .await
        .success()
        .stdout(predicate::str::contains("Login successful!"));

    let after = stored(&store);
    assert_eq!(after["token"], "jwt-token");
    let raw_user = after["user"].as_str().expect("user is stored as a string");
    let user: serde_json::Value = serde_json::from_str(raw_user).expect("user JSON");
    assert_eq!(user["_id"], "1");
    assert_eq!(user["email"], "matti@metropolia.fi");
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_login_reports_server_message_and_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Incorrect username/password" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("s.json");

    run_against(&server, store.clone(), &["login", "-u", "matti", "-p", "nope"])
        .await
        .failure()
        .stderr(predicate::str::contains("Error: Incorrect username/password"));

    assert!(!store.exists());
}

