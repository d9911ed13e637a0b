use std::collections::HashMap;
use std::fmt;

use weave_common::new_callback_id;

/// Continuation run with the reply payload of a host -> page call.
pub type ReplyCallback = Box<dyn FnOnce(String)>;

/// Pending host -> page calls, keyed by callback id.
///
/// Each entry is touched twice: inserted by [`register`](Self::register),
/// removed by [`take`](Self::take) when the reply arrives or by
/// [`cancel`](Self::cancel)/[`clear`](Self::clear) when the call is abandoned.
#[derive(Default)]
pub struct CallbackRegistry {
    pending: HashMap<String, ReplyCallback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `callback` and return the id the reply must carry.
    pub fn register(&mut self, callback: ReplyCallback) -> String {
        let mut id = new_callback_id();
        while self.pending.contains_key(&id) {
            id = new_callback_id();
        }
        self.pending.insert(id.clone(), callback);
        id
    }

    /// Remove the continuation for `id` so the caller can run it outside
    /// any borrow of the registry.
    pub fn take(&mut self, id: &str) -> Option<ReplyCallback> {
        self.pending.remove(id)
    }

    /// Drop a pending call without running it.
    pub fn cancel(&mut self, id: &str) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Abandon every pending call. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .finish()
    }
}
