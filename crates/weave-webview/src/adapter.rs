//! The navigation capability set every platform webview provides.

use std::borrow::Cow;
use std::rc::Rc;

use weave_common::{TargetPlatform, WebViewError};

use crate::bridge::JsBridge;

/// Where a logical asset name is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalFileSource {
    /// Resource files bundled with the application.
    Resources,
    /// Legacy platform asset packaging.
    Assets,
}

impl LocalFileSource {
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Assets => "assets",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "resources" => Some(Self::Resources),
            "assets" => Some(Self::Assets),
            _ => None,
        }
    }
}

/// Inline document for [`WebViewAdapter::load_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlContent {
    pub content: String,
    /// Relative URLs in the document resolve against this.
    pub base_url: Option<String>,
    pub mime_type: String,
    pub encoding: String,
    /// URL recorded in history for this document, where the engine supports it.
    pub history_url: Option<String>,
}

impl HtmlContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            base_url: None,
            mime_type: "text/html".to_string(),
            encoding: "utf-8".to_string(),
            history_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_history_url(mut self, history_url: impl Into<String>) -> Self {
        self.history_url = Some(history_url.into());
        self
    }

    pub fn is_html(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("text/html")
    }

    /// The document with a `<base href>` for engines that cannot take a
    /// base URL alongside inline content. Documents that already declare a
    /// base are left alone.
    pub fn document(&self) -> Cow<'_, str> {
        let Some(base) = self.base_url.as_deref() else {
            return Cow::Borrowed(&self.content);
        };
        let lower = self.content.to_ascii_lowercase();
        if lower.contains("<base") {
            return Cow::Borrowed(&self.content);
        }

        let tag = format!("<base href=\"{}\">", base.replace('"', "&quot;"));
        let insert_at = head_open_tag_end(&lower);
        match insert_at {
            Some(at) => {
                let mut out = String::with_capacity(self.content.len() + tag.len());
                out.push_str(&self.content[..at]);
                out.push_str(&tag);
                out.push_str(&self.content[at..]);
                Cow::Owned(out)
            }
            None => Cow::Owned(format!("{tag}{}", self.content)),
        }
    }
}

/// Byte offset just past the `<head ...>` open tag, skipping `<header>`.
fn head_open_tag_end(lower: &str) -> Option<usize> {
    lower.match_indices("<head").find_map(|(start, tag)| {
        let after = start + tag.len();
        let next = lower[after..].chars().next()?;
        if next != '>' && !next.is_ascii_whitespace() {
            return None;
        }
        lower[after..].find('>').map(|end| after + end + 1)
    })
}

/// Build the virtual URL a platform serves a local asset under.
///
/// Path segments are percent-encoded; empty, `.` and `..` segments are
/// dropped. Whether the asset exists is only discovered when the engine
/// loads the URL.
pub fn asset_url(
    platform: TargetPlatform,
    scheme: &str,
    name: &str,
    source: LocalFileSource,
) -> String {
    let path = name
        .split(|c: char| c == '/' || c == '\\')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    match (platform, source) {
        (TargetPlatform::Android, LocalFileSource::Resources) => {
            format!("file:///android_asset/resources/{path}")
        }
        (TargetPlatform::Android, LocalFileSource::Assets) => {
            format!("file:///android_asset/{path}")
        }
        (TargetPlatform::DesktopWebView2, _) => {
            format!("http://{scheme}.localhost/{}/{path}", source.dir_name())
        }
        (TargetPlatform::Desktop | TargetPlatform::Ios, _) => {
            format!("{scheme}://localhost/{}/{path}", source.dir_name())
        }
    }
}

/// A platform webview behind the common navigation capability set.
///
/// Mutating calls are fire-and-forget: they queue work on the engine's own
/// event loop and return immediately. An `Err` only means the engine refused
/// the call up front; completion is observed by polling [`current_url`] and
/// [`is_loading`].
///
/// [`current_url`]: Self::current_url
/// [`is_loading`]: Self::is_loading
pub trait WebViewAdapter {
    fn load_url(&self, url: &str, extra_headers: &[(String, String)]) -> Result<(), WebViewError>;

    fn load_html(&self, html: &HtmlContent) -> Result<(), WebViewError>;

    fn load_local_file(&self, name: &str, source: LocalFileSource) -> Result<(), WebViewError>;

    fn go_back(&self) -> Result<(), WebViewError>;

    fn go_forward(&self) -> Result<(), WebViewError>;

    fn reload(&self) -> Result<(), WebViewError>;

    fn stop_loading(&self) -> Result<(), WebViewError>;

    fn can_go_back(&self) -> bool;

    fn can_go_forward(&self) -> bool;

    fn evaluate_script(&self, js: &str) -> Result<(), WebViewError>;

    /// Evaluate the bridge bootstrap for the current page. A no-op before a
    /// page has finished loading and for a page already injected.
    fn inject_js_bridge(&self) -> Result<(), WebViewError>;

    /// Bind `bridge` to this webview's native channel.
    fn init_js_bridge(&self, bridge: Rc<JsBridge>);

    /// Route queued native-channel messages through the bound bridge and
    /// evaluate any replies.
    fn pump_bridge(&self) -> Result<(), WebViewError>;

    fn current_url(&self) -> String;

    fn is_loading(&self) -> bool;

    /// False until the underlying widget can take calls.
    fn is_ready(&self) -> bool;
}
