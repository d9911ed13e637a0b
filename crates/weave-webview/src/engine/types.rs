use std::sync::Arc;

use weave_common::TargetPlatform;

use crate::content::ContentProvider;

/// Configuration for creating an [`EngineWebView`](super::EngineWebView).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Initial URL to load (mutually exclusive with `html`).
    pub url: Option<String>,
    /// Initial HTML content to render (mutually exclusive with `url`).
    pub html: Option<String>,
    /// Whether the webview background should be transparent.
    pub transparent: bool,
    pub devtools: bool,
    pub user_agent: Option<String>,
    pub clipboard: bool,
    pub autoplay: bool,
    /// Custom protocol the content provider is served under.
    pub scheme: String,
    pub content: Option<Arc<ContentProvider>>,
    /// Decides the native channel and asset URL form.
    pub platform: TargetPlatform,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: None,
            html: None,
            transparent: false,
            devtools: cfg!(debug_assertions),
            user_agent: None,
            clipboard: true,
            autoplay: true,
            scheme: "weave".to_string(),
            content: None,
            platform: TargetPlatform::current(),
        }
    }
}

impl EngineConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Default::default()
        }
    }
}
