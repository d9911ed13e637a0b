//! Weave configuration.
//!
//! TOML-based settings for the webview layer and the demo shell. Every
//! section uses serde defaults so a partial (or missing) file works.
//!
//! ```rust,no_run
//! use weave_config::{config_to_json, load_config};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{WeaveConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{load_default, load_from_path};

use weave_common::ConfigError;

/// Load `config.toml` from the OS config directory, creating a commented
/// default when none exists, and validate the result.
pub fn load_config() -> Result<WeaveConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WeaveConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
