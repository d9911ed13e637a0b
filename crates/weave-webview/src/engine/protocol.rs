use std::borrow::Cow;
use std::sync::Arc;

use tracing::warn;
use wry::http::{header, HeaderValue, Response, StatusCode};
use wry::WebViewBuilder;

use crate::content::{request_path, ContentProvider};

/// Serve `provider` under `<scheme>://localhost/`.
pub(super) fn attach_custom_protocol<'a>(
    builder: WebViewBuilder<'a>,
    scheme: &str,
    provider: Arc<ContentProvider>,
) -> WebViewBuilder<'a> {
    let name = scheme.to_string();
    let origin = HeaderValue::from_str(&format!("{scheme}://localhost")).ok();
    builder.with_custom_protocol(name.clone(), move |_webview_id, request| {
        let uri = request.uri().to_string();
        let path = request_path(&uri, &name).unwrap_or("/");

        match provider.resolve_request(path) {
            Some((mime, data)) => {
                let mut response = Response::new(Cow::Owned(data.into_owned()));
                let content_type = HeaderValue::from_str(&mime)
                    .unwrap_or(HeaderValue::from_static("application/octet-stream"));
                response.headers_mut().insert(header::CONTENT_TYPE, content_type);
                if let Some(origin) = &origin {
                    response
                        .headers_mut()
                        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                }
                response
            }
            None => {
                warn!(path = %path, "custom protocol: asset not found");
                let mut response = Response::new(Cow::Borrowed(&b"Not Found"[..]));
                *response.status_mut() = StatusCode::NOT_FOUND;
                response
            }
        }
    })
}
