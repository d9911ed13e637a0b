//! Build-target detection and the JSON platform descriptor handed to pages.

use serde::{Deserialize, Serialize};

/// The webview family this binary drives, fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPlatform {
    /// WebKitGTK on Linux, WKWebView on macOS.
    Desktop,
    /// WebView2 on Windows, which rewrites custom schemes to `http://<scheme>.localhost`.
    DesktopWebView2,
    /// The Android system WebView.
    Android,
    /// WKWebView on iOS.
    Ios,
}

impl TargetPlatform {
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "windows") {
            Self::DesktopWebView2
        } else {
            Self::Desktop
        }
    }

    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Android | Self::Ios)
    }

    /// Value of the descriptor's `platform` key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Desktop | Self::DesktopWebView2 => "desktop",
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }

    /// Engine name reported as the desktop descriptor's `runtime`.
    pub const fn engine_name(self) -> &'static str {
        match self {
            Self::Desktop if cfg!(target_os = "macos") => "WKWebView",
            Self::Desktop => "WebKitGTK",
            Self::DesktopWebView2 => "WebView2",
            Self::Android => "Android System WebView",
            Self::Ios => "WKWebView",
        }
    }
}

/// Platform descriptor exposed to page script as JSON.
///
/// Only `platform` is always present. Desktop fills `os`/`arch`/`runtime`/
/// `runtimeVersion`, Android `brand`/`device`/`sdk`/`osVersion`, iOS
/// `os`/`osVersion`/`device`. Readers must treat missing keys as unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformInfo {
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
}

impl PlatformInfo {
    pub fn desktop(runtime: impl Into<String>, runtime_version: Option<String>) -> Self {
        Self {
            platform: TargetPlatform::Desktop.name().to_string(),
            os: Some(std::env::consts::OS.to_string()),
            arch: Some(std::env::consts::ARCH.to_string()),
            runtime: Some(runtime.into()),
            runtime_version,
            ..Default::default()
        }
    }

    pub fn android(
        brand: Option<String>,
        device: Option<String>,
        sdk: Option<u32>,
        os_version: Option<String>,
    ) -> Self {
        Self {
            platform: TargetPlatform::Android.name().to_string(),
            brand,
            device,
            sdk,
            os_version,
            ..Default::default()
        }
    }

    pub fn ios(os_version: Option<String>, device: Option<String>) -> Self {
        Self {
            platform: TargetPlatform::Ios.name().to_string(),
            os: Some("iOS".to_string()),
            os_version,
            device,
            ..Default::default()
        }
    }

    /// Descriptor for the running build. Fields the process cannot learn
    /// without the OS widget's help are left absent.
    pub fn current(runtime_version: Option<String>) -> Self {
        let target = TargetPlatform::current();
        match target {
            TargetPlatform::Android => Self::android(None, None, None, None),
            TargetPlatform::Ios => Self::ios(None, None),
            TargetPlatform::Desktop | TargetPlatform::DesktopWebView2 => {
                Self::desktop(target.engine_name(), runtime_version)
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"platform":"unknown"}"#.to_string())
    }

    /// Lenient decode: unknown keys are ignored, missing keys stay `None`.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
