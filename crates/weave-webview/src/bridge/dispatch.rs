//! Host-side bridge: handler table, pending calls, and inbound routing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};
use weave_common::WebViewError;

use super::callbacks::CallbackRegistry;
use super::message::BridgeMessage;
use super::script::BridgeScript;

/// Handles page -> host calls for one method name.
///
/// The return value is sent back to the page when the call carried a
/// callback id; `None` resolves the page's callback with an empty payload.
pub trait BridgeHandler {
    fn method_name(&self) -> &str;
    fn handle(&self, message: &BridgeMessage) -> Option<String>;
}

struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> BridgeHandler for FnHandler<F>
where
    F: Fn(&BridgeMessage) -> Option<String>,
{
    fn method_name(&self) -> &str {
        &self.name
    }

    fn handle(&self, message: &BridgeMessage) -> Option<String> {
        (self.f)(message)
    }
}

/// One bridge per webview. Shared as `Rc<JsBridge>` between the adapter
/// that feeds it raw channel text and the code registering handlers.
pub struct JsBridge {
    script: BridgeScript,
    handlers: RefCell<HashMap<String, Rc<dyn BridgeHandler>>>,
    callbacks: RefCell<CallbackRegistry>,
}

impl JsBridge {
    pub fn new(script: BridgeScript) -> Self {
        Self {
            script,
            handlers: RefCell::new(HashMap::new()),
            callbacks: RefCell::new(CallbackRegistry::new()),
        }
    }

    pub fn script(&self) -> &BridgeScript {
        &self.script
    }

    pub fn bootstrap_script(&self) -> String {
        self.script.bootstrap()
    }

    /// Register `handler`, replacing any handler for the same method.
    pub fn register(&self, handler: impl BridgeHandler + 'static) {
        let name = handler.method_name().to_string();
        if self
            .handlers
            .borrow_mut()
            .insert(name.clone(), Rc::new(handler))
            .is_some()
        {
            debug!(method = %name, "bridge handler replaced");
        }
    }

    pub fn register_fn<F>(&self, method_name: impl Into<String>, f: F)
    where
        F: Fn(&BridgeMessage) -> Option<String> + 'static,
    {
        self.register(FnHandler {
            name: method_name.into(),
            f,
        });
    }

    pub fn unregister(&self, method_name: &str) -> bool {
        self.handlers.borrow_mut().remove(method_name).is_some()
    }

    pub fn has_handler(&self, method_name: &str) -> bool {
        self.handlers.borrow().contains_key(method_name)
    }

    /// Script invoking a page handler without waiting for an answer.
    /// `None` for an empty method name.
    pub fn emit(&self, method_name: &str, payload: &str) -> Option<String> {
        let Some(encoded) = BridgeMessage::new(method_name, payload).encode() else {
            warn!("bridge emit refused: empty method name");
            return None;
        };
        Some(self.script.dispatch(&encoded))
    }

    /// Script invoking a page handler; `on_reply` runs with its result once
    /// the page posts the reply back through [`receive`](Self::receive).
    /// `None` for an empty method name, in which case nothing is registered.
    pub fn call<F>(&self, method_name: &str, payload: &str, on_reply: F) -> Option<String>
    where
        F: FnOnce(String) + 'static,
    {
        if method_name.is_empty() {
            warn!("bridge call refused: empty method name");
            return None;
        }
        let id = self.callbacks.borrow_mut().register(Box::new(on_reply));
        debug!(method = %method_name, callback_id = %id, "bridge call issued");
        let message = BridgeMessage::new(method_name, payload).with_callback(id);
        let encoded = message.encode()?;
        Some(self.script.dispatch(&encoded))
    }

    /// Route one raw message received from the native channel.
    ///
    /// Returns a script to evaluate in the page when the message was a call
    /// expecting an answer. Malformed traffic is logged and dropped.
    pub fn receive(&self, raw: &str) -> Option<String> {
        let Some(message) = BridgeMessage::decode(raw) else {
            warn!(body_len = raw.len(), "bridge message dropped: failed to parse");
            return None;
        };

        if message.is_reply() {
            self.resolve_reply(message);
            return None;
        }

        // Clone out of the table so a handler may register or unregister.
        let handler = self.handlers.borrow().get(&message.method_name).cloned();
        let result = match handler {
            Some(handler) => {
                debug!(method = %message.method_name, "bridge message dispatched");
                handler.handle(&message)
            }
            None => {
                warn!(method = %message.method_name, "bridge message dropped: no handler");
                None
            }
        };

        let callback_id = message.callback_id.as_deref()?;
        Some(
            self.script
                .resolve(callback_id, result.as_deref().unwrap_or_default()),
        )
    }

    /// Route every message in `inbox`, handing each reply script to
    /// `evaluate`. A failed reply is logged and the rest are still routed;
    /// the first failure is returned at the end.
    pub fn pump(
        &self,
        inbox: impl IntoIterator<Item = String>,
        mut evaluate: impl FnMut(&str) -> Result<(), WebViewError>,
    ) -> Result<(), WebViewError> {
        let mut first_error = None;
        for raw in inbox {
            let Some(reply) = self.receive(&raw) else {
                continue;
            };
            if let Err(e) = evaluate(&reply) {
                warn!(error = %e, "bridge reply not delivered");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn resolve_reply(&self, message: BridgeMessage) {
        let Some(id) = message.callback_id else {
            warn!("bridge reply dropped: missing callback id");
            return;
        };
        let callback = self.callbacks.borrow_mut().take(&id);
        match callback {
            Some(callback) => {
                debug!(callback_id = %id, "bridge call resolved");
                callback(message.payload);
            }
            None => warn!(callback_id = %id, "bridge reply dropped: unknown callback"),
        }
    }

    /// Abandon a pending call; its continuation never runs.
    pub fn cancel(&self, callback_id: &str) -> bool {
        self.callbacks.borrow_mut().cancel(callback_id)
    }

    /// Abandon all pending calls, e.g. when the owning view goes away.
    pub fn reset(&self) -> usize {
        let dropped = self.callbacks.borrow_mut().clear();
        if dropped > 0 {
            debug!(dropped, "abandoned pending bridge calls");
        }
        dropped
    }

    pub fn pending_calls(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

impl fmt::Debug for JsBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsBridge")
            .field("script", &self.script)
            .field(
                "handlers",
                &self.handlers.borrow().keys().cloned().collect::<Vec<_>>(),
            )
            .field("pending_calls", &self.pending_calls())
            .finish()
    }
}
