//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod system;
mod webview;

pub use bridge::*;
pub use system::*;
pub use webview::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    pub webview: WebViewSettings,
    pub bridge: BridgeConfig,
    pub refresh: RefreshConfig,
    pub assets: AssetsConfig,
    pub logging: LoggingConfig,
}
