//! Refresh cadence: an async loop for tokio hosts and a deadline timer for
//! hosts that own their event loop.

use std::rc::Rc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::WebViewState;
use crate::adapter::WebViewAdapter;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Refresh `state` every `period` until it is disposed or dropped.
///
/// The loop holds only a weak reference between ticks, so it never keeps
/// the state alive. Must run on a `tokio::task::LocalSet`.
pub async fn refresh_loop<A: WebViewAdapter>(state: Rc<WebViewState<A>>, period: Duration) {
    let weak = Rc::downgrade(&state);
    drop(state);
    let mut ticker = interval(period.max(MIN_PERIOD));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let Some(state) = weak.upgrade() else {
            break;
        };
        if !state.is_live() {
            // Let refresh drop a handle dispose could not release.
            state.refresh();
            break;
        }
        state.refresh();
    }
    debug!("refresh loop stopped");
}

/// Spawn [`refresh_loop`] onto the current `LocalSet`.
pub fn spawn_refresh_loop<A>(state: &Rc<WebViewState<A>>, period: Duration) -> JoinHandle<()>
where
    A: WebViewAdapter + 'static,
{
    tokio::task::spawn_local(refresh_loop(Rc::clone(state), period))
}

/// Decides when a host-driven event loop should call
/// [`WebViewState::refresh`].
#[derive(Debug, Clone, Copy)]
pub struct RefreshTimer {
    period: Duration,
    last: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            last: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// True at most once per period; the first call is always due.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.period => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// When the host should wake up next.
    pub fn next_deadline(&self, now: Instant) -> Instant {
        match self.last {
            Some(last) => (last + self.period).max(now),
            None => now,
        }
    }
}
