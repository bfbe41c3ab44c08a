use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicBool};
use std::task::Waker;
use std::time::Instant;

/// A wake-up registered by a [`Sleep`](crate::time::Sleep).
///
/// Heap order is earliest deadline first; timers sharing a deadline fire in
/// registration order.
pub(crate) struct TimerEntry {
    deadline: Instant,
    waker: Waker,

    /// Set when the owning `Sleep` is dropped.
    cancelled: Arc<AtomicBool>,

    /// Registration order, assigned by the reactor.
    seq: u64,
}

impl TimerEntry {
    pub(crate) fn new(deadline: Instant, waker: Waker, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            deadline,
            waker,
            cancelled,
            seq: 0,
        }
    }

    pub(crate) fn deadline(&self) -> Instant {
        self.deadline
    }

    pub(crate) fn with_seq(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }

    pub(crate) fn is_due(&self, now: Instant) -> bool {
        self.deadline <= now
    }

    /// Wakes the sleeping task unless its `Sleep` is gone. Returns whether
    /// anything was woken.
    pub(crate) fn fire(self) -> bool {
        if self.cancelled.load(atomic::Ordering::Acquire) {
            return false;
        }

        self.waker.wake();
        true
    }

    fn key(&self) -> (Instant, u64) {
        (self.deadline, self.seq)
    }
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TimerEntry {}

impl Ord for TimerEntry {
    // `BinaryHeap` is a max-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
