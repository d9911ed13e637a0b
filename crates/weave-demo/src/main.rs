mod app;
mod cli;

use std::path::Path;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;
use weave_common::{normalize_url, WeaveError};
use weave_config::WeaveConfig;
use winit::event_loop::EventLoop;

fn load_config(path: Option<&str>) -> weave_common::Result<WeaveConfig> {
    match path {
        Some(path) => {
            let config = weave_config::load_from_path(Path::new(path))?;
            weave_config::validation::validate(&config)?;
            Ok(config)
        }
        None => Ok(weave_config::load_config()?),
    }
}

fn run(config: WeaveConfig) -> weave_common::Result<()> {
    let event_loop =
        EventLoop::new().map_err(|e| WeaveError::Other(format!("event loop: {e}")))?;
    let mut app = app::DemoApp::new(config);

    tracing::info!("Entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| WeaveError::Other(format!("event loop: {e}")))
}

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Config is read before logging so its level can seed the filter.
    let loaded = load_config(args.config.as_deref());
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => WeaveConfig::default(),
    };

    // Initialize logging
    let log_directive = args
        .log_level
        .as_deref()
        .map(cli::log_directive)
        .unwrap_or_else(|| config.logging.level.directive().to_string());
    let directive = log_directive
        .parse::<Directive>()
        .or_else(|_| "weave=info".parse::<Directive>())
        .map_err(|e| eprintln!("invalid log directive: {e}"));
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Weave v{} starting...", env!("CARGO_PKG_VERSION"));

    match &loaded {
        Ok(_) => {
            if let Some(ref path) = args.config {
                tracing::info!("Using config override: {path}");
            }
        }
        Err(e) => tracing::warn!("Config load failed, using defaults: {e}"),
    }

    // CLI overrides
    if let Some(ref url) = args.url {
        config.webview.initial_url = normalize_url(url);
    }
    if args.devtools {
        config.webview.devtools = true;
    }
    tracing::info!(
        url = %config.webview.initial_url,
        refresh_ms = config.refresh.interval_ms,
        "Config loaded"
    );

    if let Err(e) = run(config) {
        tracing::error!("{e}");
    }
    tracing::info!("Shutdown complete");
}
