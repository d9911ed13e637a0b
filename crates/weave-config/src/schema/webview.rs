//! Webview construction settings and local asset roots.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options applied when a webview is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewSettings {
    /// Page opened when nothing else is requested.
    pub initial_url: String,
    pub user_agent: Option<String>,
    /// Dev tools are always available in debug builds.
    pub devtools: bool,
    pub transparent: bool,
    pub autoplay: bool,
    pub clipboard: bool,
}

impl Default for WebViewSettings {
    fn default() -> Self {
        Self {
            initial_url: "about:blank".to_string(),
            user_agent: None,
            devtools: cfg!(debug_assertions),
            transparent: false,
            autoplay: true,
            clipboard: true,
        }
    }
}

/// Where `load_local_file` looks for content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Custom URL scheme the asset protocol is registered under.
    pub scheme: String,
    /// Root for bundled resource files.
    pub resources_dir: PathBuf,
    /// Root for legacy platform assets.
    pub assets_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            scheme: "weave".to_string(),
            resources_dir: PathBuf::from("resources"),
            assets_dir: PathBuf::from("assets"),
        }
    }
}
