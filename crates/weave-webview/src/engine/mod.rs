//! The wry-backed [`WebViewAdapter`].
//!
//! wry drives WebKitGTK, WKWebView, WebView2 and the Android system webview
//! behind one API, so a single adapter covers every target. Engine callbacks
//! only write to shared atomics and mutexes; the UI thread reads them back
//! during refresh.

mod handlers;
mod protocol;
mod types;

pub use types::EngineConfig;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use base64::Engine as _;
use tracing::{debug, warn};
use weave_common::{TargetPlatform, WebViewError};
use wry::http::{HeaderMap, HeaderName, HeaderValue};
use wry::raw_window_handle;
use wry::{WebView, WebViewBuilder};

use crate::adapter::{asset_url, HtmlContent, LocalFileSource, WebViewAdapter};
use crate::bridge::{BridgeInjection, JsBridge};
use crate::history::HistoryStep;

use handlers::{poisoned, EngineShared};

pub struct EngineWebView {
    webview: WebView,
    shared: Arc<EngineShared>,
    platform: TargetPlatform,
    scheme: String,
    bridge: RefCell<Option<Rc<JsBridge>>>,
    injection: RefCell<BridgeInjection>,
}

impl EngineWebView {
    /// Create a webview as a child of `window`, positioned at `bounds`.
    pub fn build_as_child<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        bounds: wry::Rect,
        config: EngineConfig,
    ) -> Result<Self, WebViewError> {
        let shared = Arc::new(EngineShared::default());
        let webview = Self::builder(&config, &shared)
            .with_bounds(bounds)
            .build_as_child(window)
            .map_err(engine_error)?;
        Ok(Self::from_parts(webview, shared, config))
    }

    /// Create a webview filling `window`; the only form mobile targets support.
    pub fn build<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        config: EngineConfig,
    ) -> Result<Self, WebViewError> {
        let shared = Arc::new(EngineShared::default());
        let webview = Self::builder(&config, &shared)
            .build(window)
            .map_err(engine_error)?;
        Ok(Self::from_parts(webview, shared, config))
    }

    fn builder<'a>(config: &'a EngineConfig, shared: &Arc<EngineShared>) -> WebViewBuilder<'a> {
        let mut builder = WebViewBuilder::new()
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_clipboard(config.clipboard)
            .with_autoplay(config.autoplay)
            .with_focused(false);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua.as_str());
        }

        builder = handlers::attach_ipc_handler(builder, Arc::clone(shared));
        builder = handlers::attach_page_load_handler(builder, Arc::clone(shared));
        builder = handlers::attach_navigation_handler(builder, Arc::clone(shared));

        if let Some(provider) = &config.content {
            builder = protocol::attach_custom_protocol(builder, &config.scheme, Arc::clone(provider));
        }

        if let Some(url) = &config.url {
            shared.set_url(url);
            builder = builder.with_url(url.as_str());
        } else if let Some(html) = &config.html {
            builder = builder.with_html(html.as_str());
        }
        builder
    }

    fn from_parts(webview: WebView, shared: Arc<EngineShared>, config: EngineConfig) -> Self {
        debug!(platform = config.platform.name(), scheme = %config.scheme, "engine webview created");
        Self {
            webview,
            shared,
            platform: config.platform,
            scheme: config.scheme,
            bridge: RefCell::new(None),
            injection: RefCell::new(BridgeInjection::new()),
        }
    }

    pub fn platform(&self) -> TargetPlatform {
        self.platform
    }

    /// Set the webview bounds (position + size) within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), WebViewError> {
        self.webview.set_bounds(bounds).map_err(engine_error)
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), WebViewError> {
        self.webview.set_visible(visible).map_err(engine_error)
    }

    pub fn focus(&self) -> Result<(), WebViewError> {
        self.webview.focus().map_err(engine_error)
    }

    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }

    pub fn inner(&self) -> &WebView {
        &self.webview
    }

    fn step(&self, step: HistoryStep, js: &str) -> Result<(), WebViewError> {
        {
            let mut history = self.shared.history.lock().map_err(poisoned)?;
            let possible = match step {
                HistoryStep::Back => history.can_go_back(),
                HistoryStep::Forward => history.can_go_forward(),
                HistoryStep::Reload => true,
            };
            if possible {
                history.expect(step);
            }
        }
        self.shared.is_loading.store(true, Ordering::SeqCst);
        self.evaluate_script(js)
    }
}

impl WebViewAdapter for EngineWebView {
    fn load_url(&self, url: &str, extra_headers: &[(String, String)]) -> Result<(), WebViewError> {
        debug!(url = %url, headers = extra_headers.len(), "load_url");
        self.shared.is_loading.store(true, Ordering::SeqCst);
        if extra_headers.is_empty() {
            return self.webview.load_url(url).map_err(engine_error);
        }
        self.webview
            .load_url_with_headers(url, header_map(extra_headers))
            .map_err(engine_error)
    }

    fn load_html(&self, html: &HtmlContent) -> Result<(), WebViewError> {
        if html.history_url.is_some() {
            debug!("history_url is not supported by this engine; ignored");
        }
        self.shared.is_loading.store(true, Ordering::SeqCst);
        if html.is_html() {
            return self.webview.load_html(&html.document()).map_err(engine_error);
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(html.content.as_bytes());
        let url = format!(
            "data:{};charset={};base64,{encoded}",
            html.mime_type, html.encoding
        );
        self.webview.load_url(&url).map_err(engine_error)
    }

    fn load_local_file(&self, name: &str, source: LocalFileSource) -> Result<(), WebViewError> {
        let url = asset_url(self.platform, &self.scheme, name, source);
        self.load_url(&url, &[])
    }

    fn go_back(&self) -> Result<(), WebViewError> {
        self.step(HistoryStep::Back, "history.back();")
    }

    fn go_forward(&self) -> Result<(), WebViewError> {
        self.step(HistoryStep::Forward, "history.forward();")
    }

    fn reload(&self) -> Result<(), WebViewError> {
        self.step(HistoryStep::Reload, "location.reload();")
    }

    fn stop_loading(&self) -> Result<(), WebViewError> {
        self.shared.is_loading.store(false, Ordering::SeqCst);
        self.evaluate_script("window.stop();")
    }

    fn can_go_back(&self) -> bool {
        self.shared
            .history
            .lock()
            .map(|history| history.can_go_back())
            .unwrap_or(false)
    }

    fn can_go_forward(&self) -> bool {
        self.shared
            .history
            .lock()
            .map(|history| history.can_go_forward())
            .unwrap_or(false)
    }

    fn evaluate_script(&self, js: &str) -> Result<(), WebViewError> {
        self.webview
            .evaluate_script(js)
            .map_err(|e| WebViewError::Script(e.to_string()))
    }

    fn inject_js_bridge(&self) -> Result<(), WebViewError> {
        let Some(bridge) = self.bridge.borrow().clone() else {
            return Ok(());
        };
        let generation = self.shared.finished_loads.load(Ordering::SeqCst);
        if !self.injection.borrow_mut().claim(generation) {
            return Ok(());
        }
        debug!(generation, "injecting bridge bootstrap");
        self.evaluate_script(&bridge.bootstrap_script())
    }

    fn init_js_bridge(&self, bridge: Rc<JsBridge>) {
        *self.bridge.borrow_mut() = Some(bridge);
        self.injection.borrow_mut().reset();
    }

    fn pump_bridge(&self) -> Result<(), WebViewError> {
        let Some(bridge) = self.bridge.borrow().clone() else {
            return Ok(());
        };
        let inbox = self.shared.drain_inbox()?;
        bridge.pump(inbox, |reply| self.evaluate_script(reply))
    }

    fn current_url(&self) -> String {
        self.shared
            .current_url
            .lock()
            .map(|url| url.clone())
            .unwrap_or_default()
    }

    fn is_loading(&self) -> bool {
        self.shared.is_loading.load(Ordering::SeqCst)
    }

    fn is_ready(&self) -> bool {
        true
    }
}

fn header_map(extra_headers: &[(String, String)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in extra_headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => warn!(header = %name, "invalid request header skipped"),
        }
    }
    headers
}

fn engine_error(e: wry::Error) -> WebViewError {
    WebViewError::Engine(e.to_string())
}
