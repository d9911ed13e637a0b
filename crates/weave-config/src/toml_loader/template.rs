//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Weave Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[webview]
# initial_url = "about:blank"
# user_agent = "Weave/0.1"
# devtools = false
# transparent = false
# autoplay = true
# clipboard = true

[bridge]
# object_name = "weaveBridge"   # global defined on window by the bootstrap script
# native_interface = "ipc"      # interface object posted to on mobile

[refresh]
# interval_ms = 250             # 16-5000

[assets]
# scheme = "weave"
# resources_dir = "resources"
# assets_dir = "assets"

[logging]
# level = "INFO"                # TRACE, DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
