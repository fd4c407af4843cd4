//! # UnitXchange CLI Chat Integration Tests
//!
//! File: cli/tests/chat.rs
//!
//! ## Overview
//!
//! Integration tests for `unitxchange chat` and `unitxchange ask`. Prompts are
//! sent at temperature 0 with non-conversion text, which is answered locally,
//! so no API key or network access is needed.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;

fn new_chat(sandbox: &Sandbox) -> String {
    let output = sandbox
        .cmd()
        .args(["chat", "new"])
        .output()
        .expect("Failed to run chat new");
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn test_chat_list_empty() {
    Sandbox::new()
        .cmd()
        .args(["chat", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No chats yet."));
}

#[test]
fn test_chat_new_show_delete() {
    let sandbox = Sandbox::new();
    let id = new_chat(&sandbox);
    assert!(predicate::str::is_match(r"^\d{8}_\d{6}(_\d+)?$")
        .unwrap()
        .eval(&id));

    sandbox
        .cmd()
        .args(["chat", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()).and(predicate::str::contains("New Chat")));

    sandbox
        .cmd()
        .args(["chat", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("💬 New Chat ({})", id)));

    sandbox
        .cmd()
        .args(["chat", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted chat {}", id)));

    sandbox
        .cmd()
        .args(["chat", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown chat id"));
}

#[test]
fn test_strict_ask_rejection_is_not_recorded() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["ask", "tell me a joke!", "--temperature", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid format. Use:"));

    let stored = fs::read_to_string(sandbox.history_file()).unwrap();
    let chats: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let chats = chats.as_object().unwrap();
    assert_eq!(chats.len(), 1);
    let chat = chats.values().next().unwrap();
    assert_eq!(chat["name"], "tell me a joke");
    assert_eq!(chat["history"].as_array().unwrap().len(), 0);

    let id = chats.keys().next().unwrap();
    sandbox
        .cmd()
        .args(["chat", "show", id])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("💬 tell me a joke")
                .and(predicate::str::contains("Invalid format.").not()),
        );
}

#[test]
fn test_ask_into_unknown_chat_fails() {
    Sandbox::new()
        .cmd()
        .args(["ask", "hello", "-t", "0", "--chat", "19990101_000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown chat id"));
}

#[test]
fn test_ask_without_api_key_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["ask", "convert 5 kilometers to miles", "-t", "0.7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_API_KEY is not set"));

    // The chat is titled, but the failed prompt is not recorded.
    let stored = fs::read_to_string(sandbox.history_file()).unwrap();
    let chats: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let chat = chats.as_object().unwrap().values().next().unwrap();
    assert_eq!(chat["name"], "convert 5 kilometers to miles");
    assert_eq!(chat["history"].as_array().unwrap().len(), 0);
}

#[test]
fn test_ask_rejects_out_of_range_temperature() {
    Sandbox::new()
        .cmd()
        .args(["ask", "hello", "--temperature", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the range"));
}

#[test]
fn test_talk_until_bye() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["chat", "talk", "-t", "0"])
        .write_stdin("what's up\n\nbye\nnever sent\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("assistant> Invalid format.")
                .and(predicate::str::contains("Goodbye!"))
                .and(predicate::str::contains("never sent").not()),
        );
}
