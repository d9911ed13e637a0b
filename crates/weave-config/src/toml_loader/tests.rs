//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_weave_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, weave_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[webview]
initial_url = "https://example.com"

[refresh]
interval_ms = 100
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.webview.initial_url, "https://example.com");
    assert_eq!(config.refresh.interval_ms, 100);
    // Defaults preserved
    assert_eq!(config.bridge.object_name, "weaveBridge");
    assert_eq!(config.assets.scheme, "weave");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, weave_common::ConfigError::ParseError(_)));
}

#[test]
fn load_out_of_range_values_returns_parsed_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[refresh]\ninterval_ms = 1\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.refresh.interval_ms, 1);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weave").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.webview.initial_url, "about:blank");
    assert_eq!(config.refresh.interval_ms, 250);
}

#[test]
fn default_template_is_valid_toml() {
    let content = template::default_config_toml();
    let config: crate::schema::WeaveConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.bridge.native_interface, "ipc");
}

#[test]
fn default_config_path_ends_with_weave() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("weave/config.toml"));
    }
}
