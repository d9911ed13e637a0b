//! Full configuration validation.
//!
//! Each check pushes a message onto a shared list; the orchestrator folds
//! them into a single `ConfigError`.

mod helpers;


use weave_common::ConfigError;

use crate::schema::WeaveConfig;

use helpers::{validate_js_identifier, validate_range, validate_scheme};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WeaveConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_js_identifier(&mut errors, "bridge.object_name", &config.bridge.object_name);
    validate_js_identifier(
        &mut errors,
        "bridge.native_interface",
        &config.bridge.native_interface,
    );
    if config.bridge.object_name == config.bridge.native_interface {
        errors.push(format!(
            "bridge.object_name and bridge.native_interface must differ (both {:?})",
            config.bridge.object_name
        ));
    }

    validate_range(
        &mut errors,
        "refresh.interval_ms",
        config.refresh.interval_ms,
        16,
        5000,
    );

    validate_scheme(&mut errors, "assets.scheme", &config.assets.scheme);

    if config.webview.initial_url.trim().is_empty() {
        errors.push("webview.initial_url must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
