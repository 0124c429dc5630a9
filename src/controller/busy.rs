//! Busy state and change notification
//!
//! The flag only ever goes up through [`BusyState::try_acquire`] and only
//! ever comes down when the returned [`BusyGuard`] is dropped, so a sync
//! that fails, panics, or is cancelled mid-flight still ends idle.
//!
//! Every flip is broadcast as a payload-free event; subscribers read
//! [`BusyState::is_busy`] to learn the new value.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// Pending change events a slow subscriber may fall behind by
const CHANGE_CHANNEL_CAPACITY: usize = 16;

pub(crate) struct BusyState {
    busy: AtomicBool,
    changes: broadcast::Sender<()>,
}

impl Default for BusyState {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            busy: AtomicBool::new(false),
            changes,
        }
    }
}

impl BusyState {
    pub(crate) fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }

    /// Go busy, unless something else already did
    pub(crate) fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        self.notify();
        Some(BusyGuard { state: self })
    }

    fn notify(&self) {
        // Ignore send errors - there may be no subscribers
        let _ = self.changes.send(());
    }
}

/// Holds the busy flag; dropping it goes idle and notifies
pub(crate) struct BusyGuard<'a> {
    state: &'a BusyState,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.busy.store(false, Ordering::SeqCst);
        self.state.notify();
    }
}
