//! View-model for a browser toolbar bound to a [`WebViewState`].
//!
//! [`WebViewState`]: crate::state::WebViewState

use serde::Serialize;
use tokio::sync::watch;
use weave_common::{host_from_url, is_placeholder_url, normalize_url};

use crate::state::NavigationState;

/// What the reload button currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryAction {
    Reload,
    Stop,
}

/// Toolbar state derived from one [`NavigationState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationControls {
    /// Text shown in the address field.
    pub address: String,
    pub host: Option<String>,
    pub back_enabled: bool,
    pub forward_enabled: bool,
    /// Drives the spinner.
    pub loading: bool,
    pub action: PrimaryAction,
    pub secure: bool,
}

impl NavigationControls {
    pub fn from_state(state: &NavigationState) -> Self {
        // Show where we are once known, otherwise where we are going.
        let address = [&state.current_url, &state.desired_url]
            .into_iter()
            .find(|url| !is_placeholder_url(url))
            .cloned()
            .unwrap_or_default();
        let host = host_from_url(&address);
        let secure = address
            .get(..8)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"));

        Self {
            host,
            secure,
            back_enabled: state.can_go_back,
            forward_enabled: state.can_go_forward,
            loading: state.is_loading,
            action: if state.is_loading {
                PrimaryAction::Stop
            } else {
                PrimaryAction::Reload
            },
            address,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".into())
    }
}

impl From<&NavigationState> for NavigationControls {
    fn from(state: &NavigationState) -> Self {
        Self::from_state(state)
    }
}

/// Editable address field. While the user is typing, state updates do not
/// overwrite the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBar {
    text: String,
    editing: bool,
}

impl AddressBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.editing = true;
    }

    /// Leave edit mode without navigating.
    pub fn cancel(&mut self, controls: &NavigationControls) {
        self.editing = false;
        self.sync(controls);
    }

    pub fn sync(&mut self, controls: &NavigationControls) {
        if !self.editing {
            self.text.clone_from(&controls.address);
        }
    }

    /// Normalize `input` into the URL to load and leave edit mode.
    pub fn submit(&mut self, input: &str) -> String {
        let url = normalize_url(input);
        self.text.clone_from(&url);
        self.editing = false;
        url
    }
}

/// Yields new [`NavigationControls`] whenever the derived value changes.
#[derive(Debug)]
pub struct ControlsBinding {
    rx: watch::Receiver<NavigationState>,
    last: Option<NavigationControls>,
}

impl ControlsBinding {
    pub fn new(rx: watch::Receiver<NavigationState>) -> Self {
        Self { rx, last: None }
    }

    /// The first call always yields; later calls only when the controls
    /// actually differ from the last ones returned.
    pub fn poll(&mut self) -> Option<NavigationControls> {
        let changed = self.rx.has_changed().unwrap_or(false);
        if !changed && self.last.is_some() {
            return None;
        }
        self.take_current()
    }

    /// Wait for the next change. Returns `None` once the state is dropped.
    pub async fn changed(&mut self) -> Option<NavigationControls> {
        loop {
            self.rx.changed().await.ok()?;
            if let Some(controls) = self.take_current() {
                return Some(controls);
            }
        }
    }

    /// Derive from the latest state, marking it seen.
    fn take_current(&mut self) -> Option<NavigationControls> {
        let controls = NavigationControls::from_state(&self.rx.borrow_and_update());
        if self.last.as_ref() == Some(&controls) {
            return None;
        }
        self.last = Some(controls.clone());
        Some(controls)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    fn nav(desired: &str, current: &str, loading: bool) -> NavigationState {
        NavigationState {
            desired_url: desired.into(),
            current_url: current.into(),
            is_loading: loading,
            ..NavigationState::default()
        }
    }

    #[test]
    fn address_prefers_current_url() {
        let state = nav("https://next.test", "https://Now.test/x", false);
        let controls = NavigationControls::from_state(&state);
        assert_eq!(controls.address, "https://Now.test/x");
        assert_eq!(controls.host.as_deref(), Some("now.test"));
        assert!(controls.secure);
    }

    #[test]
    fn address_falls_back_to_desired_url() {
        let controls = NavigationControls::from_state(&nav("http://next.test", "", true));
        assert_eq!(controls.address, "http://next.test");
        assert!(!controls.secure);
        assert!(controls.loading);
        assert_eq!(controls.action, PrimaryAction::Stop);
    }

    #[test]
    fn placeholder_address_is_empty() {
        let controls = NavigationControls::from_state(&nav("about:blank", "about:blank", false));
        assert_eq!(controls.address, "");
        assert_eq!(controls.host, None);
        assert_eq!(controls.action, PrimaryAction::Reload);
    }

    #[test]
    fn asset_pages_have_no_host() {
        let controls =
            NavigationControls::from_state(&nav("", "weave://localhost/resources/a.html", false));
        assert_eq!(controls.host, None);
        assert!(!controls.secure);
    }

    #[test]
    fn history_buttons_follow_state() {
        let mut state = nav("", "https://a.test", false);
        state.can_go_back = true;
        let controls = NavigationControls::from(&state);
        assert!(controls.back_enabled);
        assert!(!controls.forward_enabled);
    }

    #[test]
    fn controls_json_is_camel_case() {
        let controls = NavigationControls::from_state(&nav("", "https://a.test", true));
        let value: serde_json::Value = serde_json::from_str(&controls.to_json()).unwrap();
        assert_eq!(value["address"], "https://a.test");
        assert_eq!(value["host"], "a.test");
        assert_eq!(value["backEnabled"], false);
        assert_eq!(value["action"], "stop");
    }

    #[test]
    fn address_bar_submit_normalizes() {
        let mut bar = AddressBar::new();
        bar.edit("example.com");
        assert!(bar.is_editing());
        assert_eq!(bar.submit(" example.com "), "https://example.com");
        assert!(!bar.is_editing());
        assert_eq!(bar.text(), "https://example.com");
        assert_eq!(bar.submit("   "), "about:blank");
    }

    #[test]
    fn address_bar_sync_respects_editing() {
        let controls = NavigationControls::from_state(&nav("", "https://a.test", false));
        let mut bar = AddressBar::new();
        bar.sync(&controls);
        assert_eq!(bar.text(), "https://a.test");

        bar.edit("typing");
        bar.sync(&controls);
        assert_eq!(bar.text(), "typing");

        bar.cancel(&controls);
        assert_eq!(bar.text(), "https://a.test");
    }

    #[test]
    fn binding_yields_on_derived_change_only() {
        let (tx, rx) = watch::channel(nav("https://a.test", "", true));
        let mut binding = ControlsBinding::new(rx);

        let first = binding.poll().unwrap();
        assert_eq!(first.address, "https://a.test");
        assert!(binding.poll().is_none());

        // current_url catches up; the displayed address stays the same
        tx.send_modify(|s| s.current_url = "https://a.test".into());
        assert!(binding.poll().is_none());

        tx.send_modify(|s| s.is_loading = false);
        assert_eq!(binding.poll().unwrap().action, PrimaryAction::Reload);
    }

    #[tokio::test]
    async fn binding_changed_ends_with_sender() {
        let (tx, rx) = watch::channel(NavigationState::default());
        let mut binding = ControlsBinding::new(rx);
        binding.poll();

        tx.send_modify(|s| s.can_go_forward = true);
        let controls = timeout(Duration::from_secs(1), binding.changed())
            .await
            .expect("changed() should see the new value")
            .unwrap();
        assert!(controls.forward_enabled);

        drop(tx);
        let end = timeout(Duration::from_secs(1), binding.changed())
            .await
            .expect("changed() should end with the sender");
        assert!(end.is_none());
    }

    #[tokio::test]
    async fn binding_changed_skips_updates_that_look_the_same() {
        let (tx, rx) = watch::channel(nav("https://a.test", "", true));
        let mut binding = ControlsBinding::new(rx);
        binding.poll();

        let waiter = tokio::spawn(async move {
            let controls = binding.changed().await;
            (controls, binding)
        });
        tx.send_modify(|s| s.current_url = "https://a.test".into());
        tokio::task::yield_now().await;
        tx.send_modify(|s| s.is_loading = false);

        let (controls, mut binding) = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("changed() should wake on the derived change")
            .unwrap();
        assert_eq!(controls.unwrap().action, PrimaryAction::Reload);
        assert!(binding.poll().is_none());
    }
}
