//! End-to-end smoke tests for the `askbot` binary.

use std::net::TcpListener;

use assert_cmd::Command;
use predicates::prelude::*;

fn askbot(prefs: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("askbot").expect("askbot binary");
    cmd.env_remove("RUST_LOG")
        .env_remove("ASKBOT_SERVER_URL")
        .arg("--prefs")
        .arg(prefs)
        .arg("--no-color");
    cmd
}

/// A local URL nothing is listening on.
fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/chat")
}

#[test]
fn version_prints_name_and_version() {
    let dir = tempfile::tempdir().unwrap();
    askbot(&dir.path().join("prefs.json"))
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("askbot_cli "));
}

#[test]
fn theme_defaults_to_dark_and_toggle_persists() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = dir.path().join("prefs.json");

    askbot(&prefs)
        .arg("theme")
        .assert()
        .success()
        .stdout("dark\n");

    askbot(&prefs)
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout("light\n");

    // A fresh process reads the stored preference back.
    askbot(&prefs)
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout("light\n");

    askbot(&prefs)
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout("dark\n");
}

#[test]
fn blank_question_makes_no_request() {
    let dir = tempfile::tempdir().unwrap();
    askbot(&dir.path().join("prefs.json"))
        .args(["ask", "   ", "--server", &dead_endpoint()])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn unreachable_relay_is_reported_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    askbot(&dir.path().join("prefs.json"))
        .args(["ask", "2+2?", "--server", &dead_endpoint()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not get an answer"));
}

#[test]
fn chat_session_survives_failed_question() {
    let dir = tempfile::tempdir().unwrap();
    askbot(&dir.path().join("prefs.json"))
        .args(["chat", "--server", &dead_endpoint()])
        .write_stdin("   \nhello\n/theme\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Continuing without logging in."))
        .stdout(predicate::str::contains("AskBot: Yow, what can I help you with today?"))
        .stdout(predicate::str::contains("Thinking..."))
        .stdout(predicate::str::contains("Theme: light"))
        .stderr(predicate::str::contains("Could not get an answer"));
}

#[test]
fn corrupt_preferences_do_not_block_commands() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = dir.path().join("prefs.json");
    std::fs::write(&prefs, r#"{"theme": 42}"#).unwrap();

    askbot(&prefs)
        .arg("theme")
        .assert()
        .success()
        .stdout("dark\n")
        .stderr(predicate::str::contains("preferences will not be saved"));

    askbot(&prefs)
        .args(["ask", "2+2?", "--server", &dead_endpoint()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not get an answer"))
        .stderr(predicate::str::contains("Preferences:").not());
}
