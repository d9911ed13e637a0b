//! Bridge wire format.
//!
//! A message is one JSON object, `{"methodName", "payload", "callbackId"?}`.
//! The same text travels over the native channel (page -> host) and, quoted
//! by [`js_string_literal`], inside evaluated script (host -> page).

use serde::{Deserialize, Serialize};

/// Method name reserved for replies to a pending call.
pub const REPLY_METHOD: &str = "__reply";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeMessage {
    pub method_name: String,
    /// Opaque to the bridge; usually serialized JSON.
    #[serde(default)]
    pub payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,
}

impl BridgeMessage {
    pub fn new(method_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            payload: payload.into(),
            callback_id: None,
        }
    }

    /// An empty id means no reply is expected, as on the wire.
    pub fn with_callback(mut self, callback_id: impl Into<String>) -> Self {
        let callback_id = callback_id.into();
        self.callback_id = (!callback_id.is_empty()).then_some(callback_id);
        self
    }

    /// The answer to a call that carried `callback_id`.
    pub fn reply(callback_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(REPLY_METHOD, payload).with_callback(callback_id)
    }

    pub fn is_reply(&self) -> bool {
        self.method_name == REPLY_METHOD
    }

    /// Wire text for this message, or `None` when [`decode`](Self::decode)
    /// would not give it back: an empty `method_name` or an empty
    /// `callback_id`.
    pub fn encode(&self) -> Option<String> {
        if !self.is_well_formed() {
            return None;
        }
        serde_json::to_string(self).ok()
    }

    fn is_well_formed(&self) -> bool {
        !self.method_name.is_empty() && self.callback_id.as_deref() != Some("")
    }

    /// Parse raw channel text. Anything that is not a message object with a
    /// non-empty `methodName` yields `None`. An empty `callbackId` is
    /// treated as absent.
    pub fn decode(raw: &str) -> Option<Self> {
        let mut message: Self = serde_json::from_str(raw).ok()?;
        if message.callback_id.as_deref() == Some("") {
            message.callback_id = None;
        }
        message.is_well_formed().then_some(message)
    }
}

/// Quote `text` as a JavaScript string literal, quotes included.
///
/// JSON string escaping covers quotes, backslashes and control characters.
/// U+2028/U+2029 are legal in JSON but end a line in older JS parsers, and
/// `</` could close an enclosing `<script>` element, so both are escaped too.
pub fn js_string_literal(text: &str) -> String {
    let json = serde_json::to_string(text).unwrap_or_else(|_| String::from("\"\""));
    json.replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
        .replace("</", "<\\/")
}
