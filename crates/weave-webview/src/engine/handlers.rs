use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use weave_common::WebViewError;
use wry::WebViewBuilder;

use crate::events::PageLoadState;
use crate::history::NavigationHistory;

/// State written by wry callbacks and read back by the adapter.
#[derive(Debug, Default)]
pub(super) struct EngineShared {
    pub is_loading: AtomicBool,
    pub current_url: Mutex<String>,
    /// Bumped on every finished page load; the bridge injection generation.
    pub finished_loads: AtomicU64,
    /// Raw messages posted by page script, oldest first.
    pub inbox: Mutex<VecDeque<String>>,
    pub history: Mutex<NavigationHistory>,
}

impl EngineShared {
    pub fn set_url(&self, url: &str) {
        if let Ok(mut current) = self.current_url.lock() {
            url.clone_into(&mut *current);
        }
    }

    pub fn drain_inbox(&self) -> Result<VecDeque<String>, WebViewError> {
        let mut inbox = self.inbox.lock().map_err(poisoned)?;
        Ok(std::mem::take(&mut *inbox))
    }
}

/// A wry callback panicked while holding one of the shared locks.
pub(super) fn poisoned<T>(e: std::sync::PoisonError<T>) -> WebViewError {
    WebViewError::Internal(format!("engine state lock poisoned: {e}"))
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

pub(super) fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    shared: Arc<EngineShared>,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body().to_string();
        if body.is_empty() {
            warn!("native channel message rejected: empty body");
            return;
        }

        debug!(body_len = body.len(), "native channel message from page");
        if let Ok(mut inbox) = shared.inbox.lock() {
            inbox.push_back(body);
        }
    })
}

pub(super) fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    shared: Arc<EngineShared>,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(?state, url = %url, "page load");
        shared.set_url(&url);
        match state {
            PageLoadState::Started => shared.is_loading.store(true, Ordering::SeqCst),
            PageLoadState::Finished => {
                if let Ok(mut history) = shared.history.lock() {
                    history.record_finished(&url);
                }
                shared.is_loading.store(false, Ordering::SeqCst);
                shared.finished_loads.fetch_add(1, Ordering::SeqCst);
            }
        }
    })
}

pub(super) fn attach_navigation_handler<'a>(
    builder: WebViewBuilder<'a>,
    shared: Arc<EngineShared>,
) -> WebViewBuilder<'a> {
    builder.with_navigation_handler(move |url| {
        debug!(url = %url, "navigation started");
        shared.set_url(&url);
        shared.is_loading.store(true, Ordering::SeqCst);
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_takes_messages_in_order() {
        let shared = EngineShared::default();
        shared.inbox.lock().unwrap().extend(["a".to_string(), "b".to_string()]);
        assert_eq!(shared.drain_inbox().unwrap(), ["a", "b"]);
        assert!(shared.drain_inbox().unwrap().is_empty());
    }

    #[test]
    fn poisoned_inbox_is_an_internal_error() {
        let shared = Arc::new(EngineShared::default());
        let holder = Arc::clone(&shared);
        let _ = std::thread::spawn(move || {
            let _guard = holder.inbox.lock().unwrap();
            panic!("handler panicked while queueing");
        })
        .join();
        assert!(matches!(
            shared.drain_inbox(),
            Err(WebViewError::Internal(_))
        ));
    }
}
