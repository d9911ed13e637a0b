//! Toolbar page wiring: the commands it sends over the bridge and the
//! controls pushed back to it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;
use weave_webview::{BridgeMessage, JsBridge};

/// Bundled into the binary and served as `resources/toolbar.html`.
pub(super) const TOOLBAR_HTML: &str = include_str!("../../assets/toolbar.html");
pub(super) const TOOLBAR_PAGE: &str = "toolbar.html";

/// Shown when no initial URL is configured; `resources/welcome.html`.
pub(super) const WELCOME_HTML: &str = include_str!("../../assets/welcome.html");
pub(super) const WELCOME_PAGE: &str = "welcome.html";

/// Page method receiving [`NavigationControls`](weave_webview::NavigationControls) JSON.
pub(super) const CONTROLS_METHOD: &str = "controls";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ToolbarCommand {
    /// Raw address-bar text, normalized by the host.
    Navigate(String),
    Back,
    Forward,
    Reload,
    Stop,
    /// The toolbar (re)loaded and wants the current controls.
    Sync,
}

pub(super) type CommandQueue = Rc<RefCell<VecDeque<ToolbarCommand>>>;

impl ToolbarCommand {
    pub(super) fn from_message(message: &BridgeMessage) -> Option<Self> {
        let command = match message.method_name.as_str() {
            "navigate" => Self::Navigate(message.payload.clone()),
            "back" => Self::Back,
            "forward" => Self::Forward,
            "reload" => Self::Reload,
            "stop" => Self::Stop,
            "ready" => Self::Sync,
            _ => return None,
        };
        Some(command)
    }

    const METHODS: [&'static str; 6] = ["navigate", "back", "forward", "reload", "stop", "ready"];
}

/// Register handlers that queue toolbar commands for the event loop, plus
/// `platform`, answered with the platform descriptor.
pub(super) fn register_handlers(bridge: &JsBridge, queue: &CommandQueue, platform_json: &str) {
    for method in ToolbarCommand::METHODS {
        let queue = Rc::clone(queue);
        bridge.register_fn(method, move |message| {
            if let Some(command) = ToolbarCommand::from_message(message) {
                debug!(?command, "toolbar command");
                queue.borrow_mut().push_back(command);
            }
            None
        });
    }
    register_platform_handler(bridge, platform_json);
}

pub(super) fn register_platform_handler(bridge: &JsBridge, platform_json: &str) {
    let platform_json = platform_json.to_string();
    bridge.register_fn("platform", move |_| Some(platform_json.clone()));
}
