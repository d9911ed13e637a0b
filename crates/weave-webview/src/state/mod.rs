//! Observable navigation state for one webview.
//!
//! [`WebViewState`] owns the adapter handle and publishes a
//! [`NavigationState`] through a `tokio::sync::watch` cell. Navigation calls
//! mark the view as loading and forward to the adapter; only
//! [`WebViewState::refresh`] reads completion back, since the engines report
//! it asynchronously. Everything here lives on the UI thread.

mod refresh;


pub use refresh::{refresh_loop, spawn_refresh_loop, RefreshTimer};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tokio::sync::watch;
use tracing::{debug, warn};
use weave_common::{is_placeholder_url, WebViewError};

use crate::adapter::{HtmlContent, LocalFileSource, WebViewAdapter};
use crate::bridge::JsBridge;

/// What the UI renders: where the caller wants to be and what the adapter
/// last reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    /// Set by callers.
    pub desired_url: String,
    /// The rest is only written by refresh.
    pub current_url: String,
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

pub struct WebViewState<A: WebViewAdapter> {
    adapter: RefCell<Option<A>>,
    /// Attached while `adapter` was borrowed; installed by the next refresh.
    deferred_attach: RefCell<Option<A>>,
    bridge: Option<Rc<JsBridge>>,
    state: watch::Sender<NavigationState>,
    /// Whether refresh has ever seen a non-placeholder URL.
    seen_real_url: Cell<bool>,
    disposed: Cell<bool>,
}

impl<A: WebViewAdapter> WebViewState<A> {
    /// A detached holder that will load `initial_url` once attached.
    pub fn new(initial_url: impl Into<String>) -> Self {
        let initial = NavigationState {
            desired_url: initial_url.into(),
            is_loading: true,
            ..NavigationState::default()
        };
        Self {
            adapter: RefCell::new(None),
            deferred_attach: RefCell::new(None),
            bridge: None,
            state: watch::channel(initial).0,
            seen_real_url: Cell::new(false),
            disposed: Cell::new(false),
        }
    }

    /// Bind `bridge` to every adapter this holder is attached to.
    pub fn with_bridge(mut self, bridge: Rc<JsBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn bridge(&self) -> Option<&Rc<JsBridge>> {
        self.bridge.as_ref()
    }

    /// Take ownership of `adapter`, replacing any previous one, and load the
    /// desired URL into it. Called from a bridge handler during refresh, the
    /// swap happens once that refresh is done with the old adapter.
    pub fn attach(&self, adapter: A) {
        if self.disposed.get() {
            debug!("attach ignored: state disposed");
            return;
        }
        if let Some(bridge) = &self.bridge {
            adapter.init_js_bridge(Rc::clone(bridge));
        }

        let desired = self.state.borrow().desired_url.clone();
        if !is_placeholder_url(&desired) {
            log_failure("load_url", adapter.load_url(&desired, &[]));
            self.state.send_if_modified(|s| !std::mem::replace(&mut s.is_loading, true));
        }

        self.seen_real_url.set(false);
        match self.adapter.try_borrow_mut() {
            Ok(mut slot) => {
                *slot = Some(adapter);
                debug!(url = %desired, "adapter attached");
            }
            Err(_) => {
                *self.deferred_attach.borrow_mut() = Some(adapter);
                debug!(url = %desired, "adapter attach deferred: previous adapter in use");
            }
        }
    }

    /// Release the adapter. Later navigation calls are no-ops and the
    /// refresh loop stops on its next tick.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        // A bridge handler may be running under a shared borrow; refresh
        // drops the handle once that borrow ends.
        if let Ok(mut adapter) = self.adapter.try_borrow_mut() {
            adapter.take();
        }
        self.deferred_attach.borrow_mut().take();
        if let Some(bridge) = &self.bridge {
            bridge.reset();
        }
        debug!("webview state disposed");
    }

    pub fn is_live(&self) -> bool {
        !self.disposed.get()
    }

    pub fn is_attached(&self) -> bool {
        self.adapter
            .try_borrow()
            .map(|adapter| adapter.is_some())
            .unwrap_or(true)
    }

    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    /// Run `f` against the attached adapter, if any.
    pub fn with_adapter<R>(&self, f: impl FnOnce(&A) -> R) -> Option<R> {
        if self.disposed.get() {
            return None;
        }
        self.adapter.borrow().as_ref().map(f)
    }

    // -----------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------

    pub fn load_url(&self, url: &str) {
        self.load_url_with_headers(url, &[]);
    }

    pub fn load_url_with_headers(&self, url: &str, extra_headers: &[(String, String)]) {
        if self.disposed.get() {
            debug!(url = %url, "load_url ignored: state disposed");
            return;
        }
        self.state.send_if_modified(|s| {
            let changed = s.desired_url != url;
            s.desired_url = url.to_string();
            changed
        });
        self.navigate("load_url", |adapter| adapter.load_url(url, extra_headers));
    }

    pub fn load_html(&self, html: &HtmlContent) {
        self.navigate("load_html", |adapter| adapter.load_html(html));
    }

    pub fn load_local_file(&self, name: &str, source: LocalFileSource) {
        self.navigate("load_local_file", |adapter| {
            adapter.load_local_file(name, source)
        });
    }

    pub fn go_back(&self) {
        self.navigate("go_back", |adapter| adapter.go_back());
    }

    pub fn go_forward(&self) {
        self.navigate("go_forward", |adapter| adapter.go_forward());
    }

    pub fn reload(&self) {
        self.navigate("reload", |adapter| adapter.reload());
    }

    pub fn stop_loading(&self) {
        self.forward("stop_loading", |adapter| adapter.stop_loading());
    }

    pub fn evaluate_script(&self, js: &str) {
        self.forward("evaluate_script", |adapter| adapter.evaluate_script(js));
    }

    /// Invoke a page handler without waiting for an answer.
    pub fn emit(&self, method_name: &str, payload: &str) {
        let Some(bridge) = &self.bridge else {
            debug!(method = %method_name, "emit ignored: no bridge");
            return;
        };
        if let Some(js) = bridge.emit(method_name, payload) {
            self.evaluate_script(&js);
        }
    }

    /// Invoke a page handler; `on_reply` runs when the page answers.
    /// Returns false when the call could not be issued.
    pub fn call<F>(&self, method_name: &str, payload: &str, on_reply: F) -> bool
    where
        F: FnOnce(String) + 'static,
    {
        let Some(bridge) = &self.bridge else {
            debug!(method = %method_name, "call ignored: no bridge");
            return false;
        };
        if self.disposed.get() || !self.is_attached() {
            debug!(method = %method_name, "call ignored: no adapter");
            return false;
        }
        let Some(js) = bridge.call(method_name, payload, on_reply) else {
            return false;
        };
        self.evaluate_script(&js);
        true
    }

    /// Forward a navigation and mark the view as loading.
    fn navigate(&self, op: &str, f: impl FnOnce(&A) -> Result<(), WebViewError>) {
        if self.forward(op, f) {
            self.state.send_if_modified(|s| !std::mem::replace(&mut s.is_loading, true));
        }
    }

    /// Returns whether an adapter took the call.
    fn forward(&self, op: &str, f: impl FnOnce(&A) -> Result<(), WebViewError>) -> bool {
        if self.disposed.get() {
            debug!(op, "ignored: state disposed");
            return false;
        }
        let adapter = self.adapter.borrow();
        let Some(adapter) = adapter.as_ref() else {
            debug!(op, "ignored: no adapter attached");
            return false;
        };
        log_failure(op, f(adapter));
        true
    }

    // -----------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------

    /// Read the adapter back into the published state.
    ///
    /// No-op while detached or while the adapter is not ready. Queued bridge
    /// traffic is routed first and the bootstrap injected if a new page has
    /// finished. A real URL that is new (or the first ever seen) settles the
    /// view; after that, the adapter reporting not-loading settles it too.
    pub fn refresh(&self) {
        if self.disposed.get() {
            self.release_deferred();
            return;
        }

        let observed = {
            let adapter = self.adapter.borrow();
            let Some(adapter) = adapter.as_ref() else {
                return;
            };
            if !adapter.is_ready() {
                return;
            }
            log_failure("pump_bridge", adapter.pump_bridge());
            log_failure("inject_js_bridge", adapter.inject_js_bridge());
            Observed {
                url: adapter.current_url(),
                is_loading: adapter.is_loading(),
                can_go_back: adapter.can_go_back(),
                can_go_forward: adapter.can_go_forward(),
            }
        };

        // A bridge handler may have disposed us while the adapter was borrowed.
        if self.disposed.get() {
            self.release_deferred();
            return;
        }
        // Or attached a new adapter; what the old one reported is stale.
        if self.install_deferred() {
            return;
        }

        let seen_real_url = &self.seen_real_url;
        self.state.send_if_modified(|s| {
            let before = s.clone();

            if !is_placeholder_url(&observed.url)
                && (observed.url != s.current_url || !seen_real_url.get())
            {
                debug!(url = %observed.url, "navigation observed");
                s.current_url = observed.url;
                s.is_loading = false;
                seen_real_url.set(true);
            }
            if seen_real_url.get() && !observed.is_loading {
                s.is_loading = false;
            }
            s.can_go_back = observed.can_go_back;
            s.can_go_forward = observed.can_go_forward;

            *s != before
        });
    }

    fn install_deferred(&self) -> bool {
        let Some(adapter) = self.deferred_attach.borrow_mut().take() else {
            return false;
        };
        *self.adapter.borrow_mut() = Some(adapter);
        self.seen_real_url.set(false);
        debug!("deferred adapter attached");
        true
    }

    fn release_deferred(&self) {
        if let Ok(mut adapter) = self.adapter.try_borrow_mut() {
            adapter.take();
        }
    }
}

impl<A: WebViewAdapter> std::fmt::Debug for WebViewState<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebViewState")
            .field("state", &*self.state.borrow())
            .field("attached", &self.is_attached())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

struct Observed {
    url: String,
    is_loading: bool,
    can_go_back: bool,
    can_go_forward: bool,
}

fn log_failure(op: &str, result: Result<(), WebViewError>) {
    if let Err(e) = result {
        warn!(op, error = %e, "webview call failed");
    }
}
