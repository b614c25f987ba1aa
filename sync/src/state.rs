//! Shared flags coordinating the watcher with the pull and push loops

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// The only mutable state shared between the watcher callback and the
/// three sync loops: a sticky dirty flag and the next-pull deadline.
///
/// Losing one dirty update to a concurrent clear is tolerated; the next
/// push cycle 0.1s later observes the flag again. The deadline sits
/// behind a mutex so a notification and a completed pull never interleave
/// their read-modify-write.
#[derive(Debug)]
pub struct SyncState {
    dirty: AtomicBool,
    next_pull_at: Mutex<Instant>,
}

impl SyncState {
    /// Fresh state: dirty (so the first push cycle reconciles whatever is
    /// already on disk) and with a pull due immediately.
    pub fn new() -> Self {
        Self {
            dirty: AtomicBool::new(true),
            next_pull_at: Mutex::new(Instant::now()),
        }
    }

    /// Record that the local directory has unpushed changes. Called from
    /// the watcher's event thread.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Cleared by the push engine once a push cycle completes.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// A remote change notification arrived: make the very next pull
    /// cycle execute a real pull instead of waiting out the interval.
    pub fn request_pull_now(&self) {
        *self.next_pull_at.lock() = Instant::now();
    }

    /// A pull succeeded: no further pull before `interval` elapses,
    /// unless a notification resets the deadline.
    pub fn schedule_next_pull(&self, interval: Duration) {
        *self.next_pull_at.lock() = Instant::now() + interval;
    }

    pub fn pull_due(&self) -> bool {
        *self.next_pull_at.lock() <= Instant::now()
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}
