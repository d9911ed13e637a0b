use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported synchronously by a webview adapter.
///
/// Navigation itself is fire-and-forget, so these only cover calls the
/// engine rejects up front (a dead widget, a script it refuses to queue).
#[derive(Debug, thiserror::Error)]
pub enum WebViewError {
    #[error("webview engine error: {0}")]
    Engine(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WebView(#[from] WebViewError),

    #[error("{0}")]
    Other(String),
}
