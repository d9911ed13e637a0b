//! URL helpers shared by the address bar and the state holder.
//!
//! These are total functions over strings: every input maps to a loadable
//! URL, a host, or an explicit sentinel. Nothing here touches the network.

/// The placeholder page a webview shows before any real navigation.
pub const BLANK_URL: &str = "about:blank";

const LOADABLE_PREFIXES: &[&str] = &["http://", "https://", "file://"];

/// Turn raw address-bar input into something the engine can load.
///
/// Whitespace-only input maps to [`BLANK_URL`]. Input that already carries
/// an `http`, `https` or `file` scheme is returned trimmed; anything else is
/// assumed to be a bare host and gets `https://` prepended.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return BLANK_URL.to_string();
    }
    if LOADABLE_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        return trimmed.to_string();
    }
    format!("https://{trimmed}")
}

/// True for the URLs a webview reports before it has shown a real page.
pub fn is_placeholder_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url == BLANK_URL
}

/// Extract the lowercase host of an `http`/`https` URL.
///
/// Returns `None` for other schemes, a missing or leading `://`, or an
/// empty authority. Bracketed IPv6 literals come back without brackets and
/// unchanged in case; other hosts lose any `user@` prefix and `:port`.
pub fn host_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let sep = url.find("://")?;
    if sep == 0 {
        return None;
    }

    let scheme = &url[..sep];
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }

    let rest = &url[sep + 3..];
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    if authority.is_empty() {
        return None;
    }

    let host_port = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    if let Some(bracketed) = host_port.strip_prefix('[') {
        let close = bracketed.find(']')?;
        let literal = &bracketed[..close];
        return (!literal.is_empty()).then(|| literal.to_string());
    }

    let host = match host_port.find(':') {
        Some(colon) => &host_port[..colon],
        None => host_port,
    };
    (!host.is_empty()).then(|| host.to_ascii_lowercase())
}
