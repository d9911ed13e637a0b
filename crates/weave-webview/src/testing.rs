//! Recording adapter for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use weave_common::WebViewError;

use crate::adapter::{HtmlContent, LocalFileSource, WebViewAdapter};
use crate::bridge::{BridgeInjection, JsBridge};

#[derive(Debug, Default)]
pub(crate) struct MockEngine {
    pub calls: RefCell<Vec<String>>,
    pub evaluated: RefCell<Vec<String>>,
    pub url: RefCell<String>,
    pub loading: Cell<bool>,
    pub ready: Cell<bool>,
    pub back: Cell<bool>,
    pub forward: Cell<bool>,
    pub finished_loads: Cell<u64>,
    pub fail: Cell<bool>,
    pub inbox: RefCell<VecDeque<String>>,
    pub bridge: RefCell<Option<Rc<JsBridge>>>,
    pub injection: RefCell<BridgeInjection>,
}

/// Cheap to clone; every clone drives the same [`MockEngine`], so a test
/// keeps one after handing another to the state holder.
#[derive(Debug, Clone)]
pub(crate) struct MockAdapter {
    pub engine: Rc<MockEngine>,
}

impl MockAdapter {
    pub fn new() -> Self {
        let engine = MockEngine::default();
        engine.ready.set(true);
        Self {
            engine: Rc::new(engine),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.engine.calls.borrow().clone()
    }

    pub fn evaluated(&self) -> Vec<String> {
        self.engine.evaluated.borrow().clone()
    }

    /// Report `url` as current and still loading.
    pub fn start_load(&self, url: &str) {
        *self.engine.url.borrow_mut() = url.to_string();
        self.engine.loading.set(true);
    }

    /// Report `url` as current and finished.
    pub fn finish_load(&self, url: &str) {
        *self.engine.url.borrow_mut() = url.to_string();
        self.engine.loading.set(false);
        self.engine
            .finished_loads
            .set(self.engine.finished_loads.get() + 1);
    }

    /// Queue a raw message as if page script had posted it.
    pub fn post(&self, raw: &str) {
        self.engine.inbox.borrow_mut().push_back(raw.to_string());
    }

    fn record(&self, call: String) -> Result<(), WebViewError> {
        self.engine.calls.borrow_mut().push(call);
        if self.engine.fail.get() {
            return Err(WebViewError::Engine("mock failure".into()));
        }
        Ok(())
    }
}

impl WebViewAdapter for MockAdapter {
    fn load_url(&self, url: &str, extra_headers: &[(String, String)]) -> Result<(), WebViewError> {
        if extra_headers.is_empty() {
            self.record(format!("load_url {url}"))
        } else {
            self.record(format!("load_url {url} headers={}", extra_headers.len()))
        }
    }

    fn load_html(&self, html: &HtmlContent) -> Result<(), WebViewError> {
        self.record(format!("load_html {}", html.content))
    }

    fn load_local_file(&self, name: &str, source: LocalFileSource) -> Result<(), WebViewError> {
        self.record(format!("load_local_file {}/{name}", source.dir_name()))
    }

    fn go_back(&self) -> Result<(), WebViewError> {
        self.record("go_back".into())
    }

    fn go_forward(&self) -> Result<(), WebViewError> {
        self.record("go_forward".into())
    }

    fn reload(&self) -> Result<(), WebViewError> {
        self.record("reload".into())
    }

    fn stop_loading(&self) -> Result<(), WebViewError> {
        self.record("stop_loading".into())
    }

    fn can_go_back(&self) -> bool {
        self.engine.back.get()
    }

    fn can_go_forward(&self) -> bool {
        self.engine.forward.get()
    }

    fn evaluate_script(&self, js: &str) -> Result<(), WebViewError> {
        self.engine.evaluated.borrow_mut().push(js.to_string());
        self.record("evaluate_script".into())
    }

    fn inject_js_bridge(&self) -> Result<(), WebViewError> {
        let Some(bridge) = self.engine.bridge.borrow().clone() else {
            return Ok(());
        };
        if !self
            .engine
            .injection
            .borrow_mut()
            .claim(self.engine.finished_loads.get())
        {
            return Ok(());
        }
        self.evaluate_script(&bridge.bootstrap_script())
    }

    fn init_js_bridge(&self, bridge: Rc<JsBridge>) {
        *self.engine.bridge.borrow_mut() = Some(bridge);
        self.engine.injection.borrow_mut().reset();
    }

    fn pump_bridge(&self) -> Result<(), WebViewError> {
        let Some(bridge) = self.engine.bridge.borrow().clone() else {
            return Ok(());
        };
        // Popped one at a time so handlers may post while the pump runs.
        let inbox = std::iter::from_fn(|| self.engine.inbox.borrow_mut().pop_front());
        bridge.pump(inbox, |reply| self.evaluate_script(reply))
    }

    fn current_url(&self) -> String {
        self.engine.url.borrow().clone()
    }

    fn is_loading(&self) -> bool {
        self.engine.loading.get()
    }

    fn is_ready(&self) -> bool {
        self.engine.ready.get()
    }
}
