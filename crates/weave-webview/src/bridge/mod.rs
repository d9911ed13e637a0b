//! JavaScript bridge between page script and the host.
//!
//! Messages flow in both directions:
//! - **page -> host**: page script calls `window.weaveBridge.call(name, payload, cb?)`,
//!   which posts an encoded [`BridgeMessage`] to the platform's native channel.
//!   The adapter queues the raw text and feeds it to [`JsBridge::receive`].
//! - **host -> page**: the host evaluates the script returned by
//!   [`JsBridge::call`] or [`JsBridge::emit`]; the page-side dispatcher runs
//!   the registered page handler and, for calls, posts a reply back.

mod callbacks;
mod dispatch;
mod message;
mod script;

#[cfg(test)]
mod tests;

pub use callbacks::{CallbackRegistry, ReplyCallback};
pub use dispatch::{BridgeHandler, JsBridge};
pub use message::{js_string_literal, BridgeMessage, REPLY_METHOD};
pub use script::{BridgeInjection, BridgeScript, NativeChannel};
