//! Page-side half of the bridge: the bootstrap script and the snippets the
//! host evaluates to talk to it.

use weave_common::TargetPlatform;

use super::message::{js_string_literal, REPLY_METHOD};

/// How page script reaches the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeChannel {
    /// Desktop engines: `window.ipc.postMessage`, backed by a script
    /// message handler (WebKit) or the WebView2 message port.
    MessagePort,
    /// Mobile: a named interface object the OS widget exposes to script.
    NamedInterface(String),
}

impl NativeChannel {
    pub fn for_platform(platform: TargetPlatform, interface_name: &str) -> Self {
        if platform.is_mobile() {
            Self::NamedInterface(interface_name.to_string())
        } else {
            Self::MessagePort
        }
    }

    /// A JS function expression taking the encoded message string.
    pub fn post_function(&self) -> String {
        match self {
            Self::MessagePort => {
                "function (raw) { window.ipc.postMessage(raw); }".to_string()
            }
            Self::NamedInterface(name) => format!(
                "function (raw) {{ window[{name}].postMessage(raw); }}",
                name = js_string_literal(name)
            ),
        }
    }
}

/// Generator for everything the host evaluates inside the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeScript {
    object_name: String,
    channel: NativeChannel,
}

const BOOTSTRAP_TEMPLATE: &str = r#"
(function () {
    var bridge = window[__OBJECT__];
    if (!bridge || !bridge.__weave) {
        bridge = {
            __weave: 1,
            handlers: {},
            pending: {},
            nextId: 1,
            post: function (raw) {},
            register: function (name, handler) {
                this.handlers[name] = handler;
            },
            unregister: function (name) {
                delete this.handlers[name];
            },
            call: function (name, payload, callback) {
                var msg = {
                    methodName: String(name),
                    payload: payload == null ? "" : String(payload)
                };
                if (typeof callback === "function") {
                    var id = "p" + (this.nextId++);
                    this.pending[id] = callback;
                    msg.callbackId = id;
                }
                this.post(JSON.stringify(msg));
            },
            dispatch: function (raw) {
                var self = this;
                var msg;
                try {
                    msg = JSON.parse(raw);
                } catch (e) {
                    return;
                }
                if (!msg || typeof msg.methodName !== "string") {
                    return;
                }
                var handler = this.handlers[msg.methodName];
                var result = null;
                if (handler) {
                    try {
                        result = handler(msg.payload);
                    } catch (e) {
                        result = null;
                    }
                }
                if (msg.callbackId) {
                    Promise.resolve(result).then(function (value) {
                        self.post(JSON.stringify({
                            methodName: __REPLY__,
                            payload: value == null ? "" : String(value),
                            callbackId: msg.callbackId
                        }));
                    });
                }
            },
            resolve: function (id, payload) {
                var callback = this.pending[id];
                if (callback) {
                    delete this.pending[id];
                    callback(payload);
                }
            }
        };
        window[__OBJECT__] = bridge;
    }
    bridge.post = __POST__;
})();
"#;

impl BridgeScript {
    pub fn new(object_name: impl Into<String>, channel: NativeChannel) -> Self {
        Self {
            object_name: object_name.into(),
            channel,
        }
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn channel(&self) -> &NativeChannel {
        &self.channel
    }

    /// Script that defines the page-side bridge object if it is missing and
    /// (re)points its transport at the native channel. Running it again on
    /// the same page keeps registered handlers and pending calls.
    pub fn bootstrap(&self) -> String {
        let object = js_string_literal(&self.object_name);
        let reply = js_string_literal(REPLY_METHOD);
        let post = self.channel.post_function();
        fill_template(
            BOOTSTRAP_TEMPLATE,
            &[
                ("__OBJECT__", object.as_str()),
                ("__REPLY__", reply.as_str()),
                ("__POST__", post.as_str()),
            ],
        )
    }

    /// Hand an encoded message to the page-side dispatcher.
    pub fn dispatch(&self, encoded: &str) -> String {
        format!(
            "(function () {{ var b = window[{object}]; if (b) {{ b.dispatch({message}); }} }})();",
            object = js_string_literal(&self.object_name),
            message = js_string_literal(encoded),
        )
    }

    /// Resolve a page-side pending call with the host's answer.
    pub fn resolve(&self, callback_id: &str, payload: &str) -> String {
        format!(
            "(function () {{ var b = window[{object}]; if (b) {{ b.resolve({id}, {payload}); }} }})();",
            object = js_string_literal(&self.object_name),
            id = js_string_literal(callback_id),
            payload = js_string_literal(payload),
        )
    }
}

/// Substitute every placeholder in one left-to-right pass, so substituted
/// text is never scanned for further placeholders.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|&(key, value)| rest.find(key).map(|at| (at, key, value)))
            .min_by_key(|&(at, _, _)| at);
        let Some((at, key, value)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
}

/// Tracks which page load the bootstrap was last evaluated for.
///
/// Adapters count finished page loads; the bootstrap is due once per count.
/// A count of zero means no page exists yet, so nothing is injected.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BridgeInjection {
    injected_for: Option<u64>,
}

impl BridgeInjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the injection for `finished_loads`. Returns false when there
    /// is no page yet or this load was already handled.
    pub fn claim(&mut self, finished_loads: u64) -> bool {
        if finished_loads == 0 || self.injected_for == Some(finished_loads) {
            return false;
        }
        self.injected_for = Some(finished_loads);
        true
    }

    pub fn injected_for(&self) -> Option<u64> {
        self.injected_for
    }

    /// Forget the last claim; used when the adapter is re-bound to a new bridge.
    pub fn reset(&mut self) {
        self.injected_for = None;
    }
}
