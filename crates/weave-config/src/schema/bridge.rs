//! JS bridge naming and refresh cadence.

use serde::{Deserialize, Serialize};

/// Names the page-side bridge object and the native channel it posts to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Global the bootstrap script defines on `window`.
    pub object_name: String,
    /// Named interface object used as the native channel on mobile.
    pub native_interface: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            object_name: "weaveBridge".to_string(),
            native_interface: "ipc".to_string(),
        }
    }
}

/// How often the state holder polls its adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Poll period in milliseconds (valid range: 16-5000).
    pub interval_ms: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_ms: 250 }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_interval_duration() {
        let config = RefreshConfig { interval_ms: 100 };
        assert_eq!(config.interval(), std::time::Duration::from_millis(100));
    }
}
