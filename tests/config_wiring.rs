//! Integration tests for config and session wiring
//!
//! These tests verify that the pieces sharing the config directory agree
//! with each other: the config file, the saved session, and the CLI
//! helpers that pick a server URL and an authenticated client from them.

use serial_test::serial;
use taskdeck::auth::{Session, SessionStore};
use taskdeck::cli;
use taskdeck::config::{app_dir, save_config, Config};
use taskdeck::task::User;

fn setup_temp_config() -> tempfile::TempDir {
    let temp = tempfile::TempDir::new().unwrap();
    std::env::set_var("TASKDECK_CONFIG_DIR", temp.path());
    temp
}

fn sample_user() -> User {
    User {
        id: 1,
        username: "maria".to_string(),
        email: "maria@example.com".to_string(),
        full_name: "Maria Petrova".to_string(),
        created_at: None,
    }
}

#[test]
#[serial]
fn test_config_dir_override_isolates_state() {
    let temp = setup_temp_config();
    assert_eq!(
        app_dir().unwrap(),
        temp.path(),
        "TASKDECK_CONFIG_DIR should decide where state lives"
    );
}

#[test]
fn test_default_config_confirms_deletes() {
    let config = Config::default();
    assert!(
        config.ui.confirm_delete,
        "Deleting a task should prompt unless the user opted out"
    );
    assert!(config.server_url().is_none(), "No server is configured out of the box");
}

#[test]
#[serial]
fn test_config_roundtrip_preserves_settings() {
    let _temp = setup_temp_config();

    let mut config = Config::default();
    config.server.url = "http://tasks.internal:5000".to_string();
    config.ui.confirm_delete = false;
    save_config(&config).unwrap();

    let loaded = Config::load().unwrap();
    assert_eq!(loaded.server_url(), Some("http://tasks.internal:5000"));
    assert!(!loaded.ui.confirm_delete, "confirm_delete should persist as false");
}

#[test]
#[serial]
fn test_resolve_server_prefers_flag_over_config() {
    let _temp = setup_temp_config();

    let mut config = Config::default();
    config.server.url = "http://from-config:5000".to_string();
    save_config(&config).unwrap();

    let url = cli::resolve_server(Some("http://from-flag:5000")).unwrap();
    assert_eq!(url, "http://from-flag:5000", "--server should win over the config file");
}

#[test]
#[serial]
fn test_resolve_server_falls_back_to_config() {
    let _temp = setup_temp_config();

    let mut config = Config::default();
    config.server.url = "http://from-config:5000".to_string();
    save_config(&config).unwrap();

    let url = cli::resolve_server(None).unwrap();
    assert_eq!(url, "http://from-config:5000");
}

#[test]
#[serial]
fn test_resolve_server_without_any_source_fails_with_hint() {
    let _temp = setup_temp_config();

    let err = cli::resolve_server(None).unwrap_err();
    assert!(
        err.to_string().contains("--server"),
        "The error should tell the user how to point at a server: {err}"
    );
}

#[test]
#[serial]
fn test_session_store_roundtrip_in_config_dir() {
    let temp = setup_temp_config();

    let store = SessionStore::new().unwrap();
    let session = Session {
        token: "token-abc".to_string(),
        user: sample_user(),
    };
    store.save(&session).unwrap();

    assert!(
        temp.path().join("session.json").exists(),
        "The session should be stored next to config.toml"
    );

    let loaded = store.load().expect("saved session should load back");
    assert_eq!(loaded.token, "token-abc");
    assert_eq!(loaded.user.username, "maria");

    store.clear().unwrap();
    assert!(store.load().is_none(), "a cleared session should stay gone");
}

#[test]
#[serial]
fn test_authed_client_requires_login() {
    let _temp = setup_temp_config();

    let err = cli::authed_client(Some("http://localhost:5000")).unwrap_err();
    assert!(
        err.to_string().contains("td login"),
        "Task commands without a session should point at the login command: {err}"
    );
}

#[test]
#[serial]
fn test_authed_client_uses_stored_session() {
    let _temp = setup_temp_config();

    let store = SessionStore::new().unwrap();
    let session = Session {
        token: "token-abc".to_string(),
        user: sample_user(),
    };
    store.save(&session).unwrap();

    cli::authed_client(Some("http://localhost:5000"))
        .expect("a stored session should produce an authenticated client");
}
