//! Integration tests for the pushsync binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pushsync(key: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pushsync"))
        .env_remove("PUSHSYNC_SERVER_URL")
        .env_remove("PUSHSYNC_PRIVATE_KEY")
        .env_remove("PUSHSYNC_STATIC_DIR")
        .env_remove("PUSHSYNC_GH_CLIENT_ID")
        .arg("--key")
        .arg(key)
        .args(args)
        .output()
        .expect("Failed to execute pushsync")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Keygen writes a key whose public half `pubkey` prints again.
#[test]
fn test_keygen_then_pubkey() {
    let temp_dir = TempDir::new().unwrap();
    let key = temp_dir.path().join("private.pem");

    let output = pushsync(&key, &["keygen"]);
    assert!(output.status.success(), "keygen should succeed");
    assert!(key.exists());
    let generated = stdout(&output).lines().last().unwrap().to_string();

    let output = pushsync(&key, &["pubkey"]);
    assert!(output.status.success(), "pubkey should succeed");
    assert_eq!(stdout(&output).trim(), generated);
    assert_eq!(generated.len(), 88);
}

/// A second keygen must not clobber the first key.
#[test]
fn test_keygen_refuses_existing_key() {
    let temp_dir = TempDir::new().unwrap();
    let key = temp_dir.path().join("private.pem");

    assert!(pushsync(&key, &["keygen"]).status.success());
    let before = std::fs::read_to_string(&key).unwrap();

    let output = pushsync(&key, &["keygen"]);
    assert!(!output.status.success(), "second keygen should fail");
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(std::fs::read_to_string(&key).unwrap(), before);
}

/// Check passes when the server serves the local key and fails otherwise.
#[tokio::test]
async fn test_check_against_server() {
    let temp_dir = TempDir::new().unwrap();
    let key = temp_dir.path().join("private.pem");
    assert!(pushsync(&key, &["keygen"]).status.success());
    let local = stdout(&pushsync(&key, &["pubkey"])).trim().to_string();

    let good = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pubkey"))
        .respond_with(ResponseTemplate::new(200).set_body_string(local.clone()))
        .mount(&good)
        .await;
    let output = pushsync(&key, &["--server", &good.uri(), "check"]);
    assert!(output.status.success(), "served key matches");

    let stale = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pubkey"))
        .respond_with(ResponseTemplate::new(200).set_body_string("XYZ999"))
        .mount(&stale)
        .await;
    let output = pushsync(&key, &["--server", &stale.uri(), "check"]);
    assert!(!output.status.success(), "served key differs");
    assert!(String::from_utf8_lossy(&output.stderr).contains("XYZ999"));
}

/// Register sends the endpoint and reports server failures.
#[tokio::test]
async fn test_register_command() {
    let temp_dir = TempDir::new().unwrap();
    let key = temp_dir.path().join("unused.pem");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let output = pushsync(
        &key,
        &["--server", &server.uri(), "register", "https://push.example.com/abc"],
    );
    assert!(output.status.success());

    let output = pushsync(&key, &["--server", &server.uri(), "register", ""]);
    assert!(!output.status.success(), "empty endpoint is rejected");
}
