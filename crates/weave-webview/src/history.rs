//! Back/forward availability reconstructed from finished page loads.
//!
//! wry exposes no session-history API, so the engine adapter keeps its own
//! list. Each back/forward/reload it issues is recorded as the pending step;
//! the next finished load either moves the cursor (a history step) or
//! truncates forward entries and appends (a fresh navigation).

use weave_common::is_placeholder_url;

/// A history move the adapter has issued but not yet seen complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    Back,
    Forward,
    Reload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationHistory {
    entries: Vec<String>,
    index: usize,
    pending: Option<HistoryStep>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the next finished load as the result of `step`.
    pub fn expect(&mut self, step: HistoryStep) {
        self.pending = Some(step);
    }

    /// Apply a finished load of `url`.
    pub fn record_finished(&mut self, url: &str) {
        let url = url.trim();
        if url.is_empty() || (self.entries.is_empty() && is_placeholder_url(url)) {
            self.pending = None;
            return;
        }

        match self.pending.take() {
            Some(HistoryStep::Back) if self.index > 0 => {
                self.index -= 1;
                self.entries[self.index] = url.to_string();
            }
            Some(HistoryStep::Forward) if self.index + 1 < self.entries.len() => {
                self.index += 1;
                self.entries[self.index] = url.to_string();
            }
            Some(HistoryStep::Reload) if !self.entries.is_empty() => {
                self.entries[self.index] = url.to_string();
            }
            _ => self.push(url),
        }
    }

    fn push(&mut self, url: &str) {
        if self.current() == Some(url) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(url.to_string());
        self.index = self.entries.len() - 1;
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(String::as_str)
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
