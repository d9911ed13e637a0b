//! WebView embedding layer.
//!
//! Provides:
//! - A JS bridge with request/reply correlation (Rust <-> JavaScript)
//! - The [`WebViewAdapter`] capability set and a wry-backed implementation
//! - Custom protocol content for bundled resources and assets
//! - An observable navigation state holder with a polling refresh loop
//! - A toolbar view-model bound to that state

pub mod adapter;
pub mod bridge;
pub mod content;
pub mod controls;
#[cfg(feature = "engine")]
pub mod engine;
pub mod events;
pub mod history;
pub mod state;

#[cfg(test)]
mod testing;

pub use adapter::{asset_url, HtmlContent, LocalFileSource, WebViewAdapter};
pub use bridge::{BridgeHandler, BridgeMessage, BridgeScript, JsBridge, NativeChannel};
pub use content::ContentProvider;
pub use controls::{AddressBar, ControlsBinding, NavigationControls, PrimaryAction};
#[cfg(feature = "engine")]
pub use engine::{EngineConfig, EngineWebView};
pub use events::PageLoadState;
pub use history::{HistoryStep, NavigationHistory};
pub use state::{refresh_loop, spawn_refresh_loop, NavigationState, RefreshTimer, WebViewState};
