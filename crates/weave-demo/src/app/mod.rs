//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the toolbar and content webviews and relays toolbar
//! commands to the content view's state holder.

mod core;
mod event_handler;
mod layout;
mod toolbar;

pub use core::DemoApp;
