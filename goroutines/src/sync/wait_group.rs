use crate::error::Error;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// Waits for a collection of tasks to finish.
///
/// The counter is raised with [`add`](Self::add) before starting work and
/// lowered with [`done`](Self::done) when each piece finishes.
/// [`wait`](Self::wait) suspends until the counter is back to zero.
///
/// `WaitGroup` is a handle: clones share the same counter.
///
/// # Examples
///
/// ```rust,ignore
/// let wg = WaitGroup::new();
///
/// for i in 0..3 {
///     wg.add(1);
///     let wg = wg.clone();
///     go(async move {
///         work(i).await;
///         wg.done();
///     });
/// }
///
/// wg.wait().await;
/// ```
#[derive(Clone, Default)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    counter: AtomicIsize,

    /// Tasks suspended in `wait`.
    ///
    /// Only touched with this lock held, and the transition to zero takes
    /// the lock before draining it, so a waiter cannot miss the wake-up.
    waiters: Mutex<Vec<Waker>>,
}

impl WaitGroup {
    /// Creates a wait group with a zero counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta`, which may be negative, to the counter.
    ///
    /// When the counter reaches zero every task blocked in
    /// [`wait`](Self::wait) is released.
    ///
    /// # Panics
    ///
    /// Panics if the counter would become negative or overflow.
    pub fn add(&self, delta: isize) {
        if let Err(err) = self.try_add(delta) {
            tracing::error!(%err, "wait group misuse");
            panic!("{err}");
        }
    }

    /// Like [`add`](Self::add), but reports an underflow or overflow
    /// instead of panicking. The counter is left untouched on error.
    pub fn try_add(&self, delta: isize) -> Result<(), Error> {
        let mut current = self.inner.counter.load(Ordering::Acquire);

        let next = loop {
            let Some(next) = current.checked_add(delta) else {
                return Err(Error::WaitGroupOverflow { counter: current, delta });
            };
            if next < 0 {
                return Err(Error::WaitGroupUnderflow { counter: next });
            }

            match self.inner.counter.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break next,
                Err(actual) => current = actual,
            }
        };

        if next == 0 && delta != 0 {
            self.release();
        }

        Ok(())
    }

    /// Decrements the counter by one.
    ///
    /// # Panics
    ///
    /// Panics if the counter is already zero.
    pub fn done(&self) {
        self.add(-1);
    }

    /// Current counter value.
    pub fn count(&self) -> isize {
        self.inner.counter.load(Ordering::Acquire)
    }

    /// Waits until the counter is zero.
    ///
    /// Ready immediately if it already is.
    pub fn wait(&self) -> Wait<'_> {
        Wait { group: self }
    }

    fn release(&self) {
        let waiters = std::mem::take(&mut *self.inner.waiters.lock().unwrap());

        tracing::trace!(waiters = waiters.len(), "wait group released");
        for waker in waiters {
            waker.wake();
        }
    }
}

impl std::fmt::Debug for WaitGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitGroup")
            .field("count", &self.count())
            .finish()
    }
}

/// Future returned by [`WaitGroup::wait`].
#[must_use = "futures do nothing unless awaited"]
pub struct Wait<'a> {
    group: &'a WaitGroup,
}

impl Future for Wait<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.group.count() == 0 {
            return Poll::Ready(());
        }

        let mut waiters = self.group.inner.waiters.lock().unwrap();

        // Re-check under the lock: `release` drains the list only after the
        // counter has hit zero.
        if self.group.count() == 0 {
            return Poll::Ready(());
        }

        if !waiters.iter().any(|w| w.will_wake(cx.waker())) {
            waiters.push(cx.waker().clone());
        }

        Poll::Pending
    }
}
