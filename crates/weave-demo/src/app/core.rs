//! DemoApp struct definition, webview setup and the refresh tick.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use weave_common::{is_placeholder_url, PlatformInfo, TargetPlatform, WeaveError, BLANK_URL};
use weave_config::WeaveConfig;
use weave_webview::{
    AddressBar, BridgeScript, ContentProvider, ControlsBinding, EngineConfig, EngineWebView,
    JsBridge, LocalFileSource, NativeChannel, NavigationControls, RefreshTimer, WebViewState,
};
use winit::dpi::LogicalSize;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowAttributes};

use super::layout;
use super::toolbar::{self, CommandQueue, ToolbarCommand};

type View = Rc<WebViewState<EngineWebView>>;

/// Top-level application state.
pub struct DemoApp {
    pub(super) config: WeaveConfig,
    pub(super) platform: TargetPlatform,

    // Windowing
    pub(super) window: Option<Arc<Window>>,

    // Webviews: the toolbar page and the page being browsed
    pub(super) toolbar: View,
    pub(super) content: View,
    pub(super) commands: CommandQueue,
    pub(super) controls: ControlsBinding,
    pub(super) address_bar: AddressBar,

    pub(super) timer: RefreshTimer,
    pub(super) should_exit: bool,
}

impl DemoApp {
    pub fn new(config: WeaveConfig) -> Self {
        let platform = TargetPlatform::current();
        let platform_json = PlatformInfo::current(None).to_json();
        let commands = CommandQueue::default();

        let toolbar_bridge = Rc::new(bridge(&config, platform));
        toolbar::register_handlers(&toolbar_bridge, &commands, &platform_json);
        let toolbar = Rc::new(WebViewState::new(BLANK_URL).with_bridge(toolbar_bridge));

        let content_bridge = Rc::new(bridge(&config, platform));
        toolbar::register_platform_handler(&content_bridge, &platform_json);
        let content = Rc::new(
            WebViewState::new(config.webview.initial_url.clone()).with_bridge(content_bridge),
        );
        let controls = ControlsBinding::new(content.subscribe());

        Self {
            timer: RefreshTimer::new(config.refresh.interval()),
            config,
            platform,
            window: None,
            toolbar,
            content,
            commands,
            controls,
            address_bar: AddressBar::new(),
            should_exit: false,
        }
    }

    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Create the window and both webviews.
    pub(super) fn initialize_window(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> weave_common::Result<()> {
        let attrs = WindowAttributes::default()
            .with_title("Weave")
            .with_inner_size(LogicalSize::new(1280.0, 800.0));

        let window = event_loop
            .create_window(attrs)
            .map(Arc::new)
            .map_err(|e| WeaveError::Other(format!("window: {e}")))?;

        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        let (toolbar_rect, content_rect) = layout::split(size);
        let provider = Arc::new(self.content_provider());

        let toolbar_view = EngineWebView::build_as_child(
            &*window,
            toolbar_rect,
            EngineConfig {
                devtools: false,
                ..self.engine_config(&provider)
            },
        )?;
        let content_view =
            EngineWebView::build_as_child(&*window, content_rect, self.engine_config(&provider))?;

        self.toolbar.attach(toolbar_view);
        self.toolbar
            .load_local_file(toolbar::TOOLBAR_PAGE, LocalFileSource::Resources);

        self.content.attach(content_view);
        if is_placeholder_url(&self.content.snapshot().desired_url) {
            self.content
                .load_local_file(toolbar::WELCOME_PAGE, LocalFileSource::Resources);
        }

        info!(platform = self.platform.name(), "webviews created");
        self.window = Some(window);
        Ok(())
    }

    fn engine_config(&self, provider: &Arc<ContentProvider>) -> EngineConfig {
        let settings = &self.config.webview;
        EngineConfig {
            url: None,
            html: None,
            transparent: settings.transparent,
            devtools: settings.devtools,
            user_agent: settings.user_agent.clone(),
            clipboard: settings.clipboard,
            autoplay: settings.autoplay,
            scheme: self.config.assets.scheme.clone(),
            content: Some(Arc::clone(provider)),
            platform: self.platform,
        }
    }

    /// Disk roots from config, plus the bundled pages.
    fn content_provider(&self) -> ContentProvider {
        let assets = &self.config.assets;
        let mut provider = ContentProvider::new(&assets.resources_dir, &assets.assets_dir);
        let object_name = &self.config.bridge.object_name;
        provider.add_override(
            LocalFileSource::Resources,
            toolbar::TOOLBAR_PAGE,
            "text/html",
            toolbar::TOOLBAR_HTML.replace("weaveBridge", object_name),
        );
        provider.add_override(
            LocalFileSource::Resources,
            toolbar::WELCOME_PAGE,
            "text/html",
            toolbar::WELCOME_HTML.replace("weaveBridge", object_name),
        );
        provider
    }

    // =========================================================================
    // REFRESH TICK
    // =========================================================================

    /// Refresh both webviews when due and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if self.timer.due(now) {
            self.toolbar.refresh();
            self.apply_commands();
            self.content.refresh();
            self.push_controls();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(
            self.timer.next_deadline(Instant::now()),
        ));
    }

    fn apply_commands(&mut self) {
        let commands: Vec<ToolbarCommand> = self.commands.borrow_mut().drain(..).collect();
        for command in commands {
            match command {
                ToolbarCommand::Navigate(input) => {
                    let url = self.address_bar.submit(&input);
                    debug!(url = %url, "navigate from address bar");
                    self.content.load_url(&url);
                    self.focus_content();
                }
                ToolbarCommand::Back => self.content.go_back(),
                ToolbarCommand::Forward => self.content.go_forward(),
                ToolbarCommand::Reload => self.content.reload(),
                ToolbarCommand::Stop => self.content.stop_loading(),
                ToolbarCommand::Sync => {
                    let controls = NavigationControls::from_state(&self.content.snapshot());
                    self.address_bar.sync(&controls);
                    self.send_controls(&controls);
                }
            }
        }
    }

    fn push_controls(&mut self) {
        let Some(controls) = self.controls.poll() else {
            return;
        };
        self.address_bar.sync(&controls);
        self.send_controls(&controls);
        self.update_window_title(&controls);
    }

    fn send_controls(&self, controls: &NavigationControls) {
        self.toolbar
            .emit(toolbar::CONTROLS_METHOD, &controls.to_json());
    }

    fn update_window_title(&self, controls: &NavigationControls) {
        let Some(window) = &self.window else {
            return;
        };
        match &controls.host {
            Some(host) => window.set_title(&format!("{host} - Weave")),
            None => window.set_title("Weave"),
        }
    }

    fn focus_content(&self) {
        if let Some(Err(e)) = self.content.with_adapter(|view| view.focus()) {
            warn!("Failed to focus content: {e}");
        }
    }

    // =========================================================================
    // LAYOUT / SHUTDOWN
    // =========================================================================

    /// Reposition both webviews after the window resized.
    pub(super) fn sync_webview_bounds(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        let (toolbar_rect, content_rect) = layout::split(size);

        for (view, rect) in [(&self.toolbar, toolbar_rect), (&self.content, content_rect)] {
            if let Some(Err(e)) = view.with_adapter(|v| v.set_bounds(rect)) {
                warn!("Failed to set webview bounds: {e}");
            }
        }
    }

    /// Release both webviews before the window goes away.
    pub(super) fn shutdown(&mut self) {
        info!("Initiating graceful shutdown");
        self.content.dispose();
        self.toolbar.dispose();
        self.commands.borrow_mut().clear();
        self.window = None;
        info!("Graceful shutdown complete");
    }
}

fn bridge(config: &WeaveConfig, platform: TargetPlatform) -> JsBridge {
    let channel = NativeChannel::for_platform(platform, &config.bridge.native_interface);
    JsBridge::new(BridgeScript::new(config.bridge.object_name.clone(), channel))
}
