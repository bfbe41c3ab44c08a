use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// A claim-once flag deciding which receiver gets to settle.
///
/// A plain receive owns a private gate. Every arm of one
/// [`select`](crate::select::select) call shares a single gate, so at most
/// one arm can ever accept a value, even when several channels become
/// ready at the same instant.
#[derive(Debug, Default)]
pub struct SelectGate {
    /// `true` once some receiver guarded by this gate has been settled.
    claimed: AtomicBool,
}

impl SelectGate {
    /// Creates an unclaimed gate.
    pub fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
        }
    }

    /// Attempts to claim the gate.
    ///
    /// Returns `true` for exactly one caller over the lifetime of the gate.
    pub fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Returns `true` if the gate has already been claimed.
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

/// State of the value slot.
enum Slot<T> {
    /// Nothing delivered yet; holds the waker of the task waiting on it.
    Empty(Option<Waker>),

    /// Settled. `None` means the channel was closed with nothing to give.
    Filled(Option<T>),

    /// The settled value has been handed to the waiting task.
    Taken,
}

/// A single-assignment slot for one receive attempt.
///
/// A `Receiver` is created when a receive begins, parked in the channel's
/// receiver queue, and settled by whichever sender (or `close`) reaches it
/// first. [`try_receive`](Self::try_receive) succeeds **at most once**;
/// every later or concurrent attempt fails and gets its value back, leaving
/// the slot untouched.
pub struct Receiver<T> {
    /// Gate claimed by the successful `try_receive`.
    gate: Arc<SelectGate>,

    /// The delivered value and the waker of the waiting task.
    slot: Mutex<Slot<T>>,
}

impl<T> Receiver<T> {
    /// Creates a receiver with its own private gate.
    pub fn new() -> Self {
        Self::with_gate(Arc::new(SelectGate::new()))
    }

    /// Creates a receiver guarded by a shared gate.
    ///
    /// All receivers built from the same gate race each other: only the
    /// first one to be offered a value accepts it.
    pub fn with_gate(gate: Arc<SelectGate>) -> Self {
        Self {
            gate,
            slot: Mutex::new(Slot::Empty(None)),
        }
    }

    /// Offers a value (or the closed signal, `None`) to this receiver.
    ///
    /// Returns `Err` with the offered value if the receiver, or another
    /// receiver sharing its gate, was already settled.
    pub fn try_receive(&self, value: Option<T>) -> Result<(), Option<T>> {
        let mut slot = self.slot.lock().unwrap();

        if !self.gate.claim() {
            return Err(value);
        }

        let waker = match std::mem::replace(&mut *slot, Slot::Filled(value)) {
            Slot::Empty(waker) => waker,
            Slot::Filled(_) | Slot::Taken => unreachable!("receiver settled twice"),
        };
        drop(slot);

        if let Some(waker) = waker {
            waker.wake();
        }

        Ok(())
    }

    /// Offers a real value, handing it back if the receiver is settled.
    pub(crate) fn deliver(&self, value: T) -> Result<(), T> {
        self.try_receive(Some(value)).map_err(|rejected| match rejected {
            Some(value) => value,
            None => unreachable!("offered value lost"),
        })
    }

    /// Returns `true` once this receiver can no longer accept a value.
    pub fn is_settled(&self) -> bool {
        self.gate.is_claimed()
    }

    /// Withdraws the receiver so no sender will pick it.
    ///
    /// If it was already settled with a value that nobody consumed, that
    /// value is returned.
    pub(crate) fn withdraw(&self) -> Option<T> {
        let mut slot = self.slot.lock().unwrap();

        if self.gate.claim() {
            *slot = Slot::Taken;
            return None;
        }

        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Filled(value) => value,
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Polls for the settled value.
    ///
    /// Resolves to `Some(value)` for a delivered value and `None` when the
    /// channel was closed. The waker is refreshed on every poll so the
    /// latest task context is the one woken.
    pub(crate) fn poll_take(&self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut slot = self.slot.lock().unwrap();

        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Filled(value) => Poll::Ready(value),
            Slot::Empty(waker) => {
                let waker = match waker {
                    Some(w) if w.will_wake(cx.waker()) => w,
                    _ => cx.waker().clone(),
                };
                *slot = Slot::Empty(Some(waker));
                Poll::Pending
            }
            Slot::Taken => panic!("receiver polled after completion"),
        }
    }
}

impl<T> Default for Receiver<T> {
    fn default() -> Self {
        Self::new()
    }
}
