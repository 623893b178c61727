use inkbridge_core::{load_config, ConfigError, DateSource};
use std::fs;

fn write_config(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("inkbridge.json");
    fs::write(&path, body).expect("config write should succeed");
    path
}

#[test]
fn loads_full_config_file() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = write_config(
        dir.path(),
        r#"{
            "vault_server": {
                "command": "vault-remote-server",
                "args": ["--vault", "/vaults/personal"]
            },
            "template_path": "Admin/Templates/Daily Note Template.md",
            "export_folder": "/exports/device",
            "daily_notes_folder": "Daily Notes",
            "note_section_heading": "Captured",
            "valid_extensions": [".txt", ".text"],
            "processed_suffix": ".done",
            "note_date": "file_modified"
        }"#,
    );

    let config = load_config(&path).expect("config should load");
    assert_eq!(config.vault_server.command, "vault-remote-server");
    assert_eq!(config.vault_server.args.len(), 2);
    assert_eq!(config.note_section_heading, "Captured");
    assert_eq!(config.valid_extensions.len(), 2);
    assert_eq!(config.processed_suffix, ".done");
    assert_eq!(config.note_date, DateSource::FileModified);
}

#[test]
fn applies_defaults_for_optional_fields() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = write_config(
        dir.path(),
        r#"{
            "vault_server": { "command": "vault-remote-server" },
            "template_path": "Templates/Daily.md",
            "export_folder": "/exports",
            "daily_notes_folder": "Daily Notes"
        }"#,
    );

    let config = load_config(&path).expect("config should load");
    assert_eq!(config.note_section_heading, "Notes");
    assert_eq!(config.valid_extensions, vec![".txt".to_string()]);
    assert_eq!(config.processed_suffix, ".processed");
    assert_eq!(config.note_date, DateSource::CurrentTime);
}

#[test]
fn rejects_blank_required_field() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = write_config(
        dir.path(),
        r#"{
            "vault_server": { "command": "  " },
            "template_path": "Templates/Daily.md",
            "export_folder": "/exports",
            "daily_notes_folder": "Daily Notes"
        }"#,
    );

    let err = load_config(&path).expect_err("blank command should fail");
    assert!(matches!(err, ConfigError::EmptyField("vault_server.command")));
}

#[test]
fn rejects_invalid_json() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = write_config(dir.path(), "{ not json");
    let err = load_config(&path).expect_err("broken JSON should fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn rejects_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let err =
        load_config(&dir.path().join("absent.json")).expect_err("missing file should fail");
    assert!(matches!(err, ConfigError::Io { .. }));
}
