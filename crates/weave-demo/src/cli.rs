use clap::Parser;

/// Weave: a minimal browser built on the weave webview layer.
#[derive(Parser, Debug)]
#[command(name = "weave", version, about)]
pub struct Args {
    /// Page to open instead of the configured initial URL.
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// filter directive such as `weave_webview=debug`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable the engine's developer tools.
    #[arg(long)]
    pub devtools: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Turn a `--log-level` value into a filter directive.
pub fn log_directive(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("weave={level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_weave() {
        assert_eq!(log_directive("debug"), "weave=debug");
    }

    #[test]
    fn full_directive_passes_through() {
        assert_eq!(log_directive("weave_webview=trace"), "weave_webview=trace");
    }

    #[test]
    fn parses_all_flags() {
        let args = Args::parse_from([
            "weave",
            "--url",
            "example.com",
            "--config",
            "/tmp/weave.toml",
            "--log-level",
            "debug",
            "--devtools",
        ]);
        assert_eq!(args.url.as_deref(), Some("example.com"));
        assert_eq!(args.config.as_deref(), Some("/tmp/weave.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.devtools);
    }

    #[test]
    fn flags_default_off() {
        let args = Args::parse_from(["weave"]);
        assert!(args.url.is_none());
        assert!(!args.devtools);
    }
}
