//! Local content serving for the asset custom protocol.
//!
//! `load_local_file` points the engine at `<scheme>://localhost/<source>/<name>`;
//! the engine's protocol handler hands the request path to
//! [`ContentProvider::resolve_request`], which maps the first segment to a
//! [`LocalFileSource`] root and reads the file beneath it.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::adapter::LocalFileSource;

/// Serves files from the resource and asset roots.
#[derive(Debug, Clone)]
pub struct ContentProvider {
    resources_dir: PathBuf,
    assets_dir: PathBuf,
    /// In-memory files, keyed by `(source, path)`; checked before disk.
    overrides: HashMap<(LocalFileSource, String), (String, Vec<u8>)>,
}

impl ContentProvider {
    pub fn new(resources_dir: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            assets_dir: assets_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Register an in-memory file, e.g. a page compiled into the binary.
    pub fn add_override(
        &mut self,
        source: LocalFileSource,
        path: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        let path = path.into().trim_start_matches('/').to_string();
        self.overrides
            .insert((source, path), (mime.into(), data.into()));
    }

    pub fn root(&self, source: LocalFileSource) -> &Path {
        match source {
            LocalFileSource::Resources => &self.resources_dir,
            LocalFileSource::Assets => &self.assets_dir,
        }
    }

    /// Resolve a protocol request path such as `/resources/index.html`.
    /// The path may still be percent-encoded.
    pub fn resolve_request(&self, request_path: &str) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let decoded = urlencoding::decode(request_path).ok()?;
        let clean = decoded.trim_start_matches('/');
        let (dir, rest) = clean.split_once('/')?;
        let source = LocalFileSource::from_dir_name(dir)?;
        self.resolve(source, rest)
    }

    /// Resolve `path` under the root for `source` to MIME type and bytes.
    pub fn resolve(
        &self,
        source: LocalFileSource,
        path: &str,
    ) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let clean = path.trim_start_matches('/');

        if let Some((mime, data)) = self.overrides.get(&(source, clean.to_string())) {
            return Some((Cow::Borrowed(mime.as_str()), Cow::Borrowed(data.as_slice())));
        }

        let root = self.root(source);
        let file_path = root.join(clean);

        // Canonicalize both sides so `..` and symlinks cannot escape the root.
        let canonical_root = std::fs::canonicalize(root).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_root) || !canonical_file.is_file() {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        let mime = mime_from_extension(&file_path);
        Some((Cow::Borrowed(mime), Cow::Owned(data)))
    }
}

/// Strip `<scheme>://localhost` (or the WebView2 form
/// `http://<scheme>.localhost`) from a request URI, leaving the path.
pub fn request_path<'a>(uri: &'a str, scheme: &str) -> Option<&'a str> {
    let custom = format!("{scheme}://localhost");
    let webview2 = format!("http://{scheme}.localhost");
    let rest = uri
        .strip_prefix(custom.as_str())
        .or_else(|| uri.strip_prefix(webview2.as_str()))
        .or_else(|| uri.strip_prefix(format!("https://{scheme}.localhost").as_str()))?;
    let path = rest
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    Some(if path.is_empty() { "/" } else { path })
}

/// Guess MIME type from file extension.
fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wasm") => "application/wasm",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("mp4") => "video/mp4",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        Some("xml") => "application/xml",
        _ => "application/octet-stream",
    }
}
