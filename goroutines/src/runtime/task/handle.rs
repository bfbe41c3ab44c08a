use super::state::{CANCELLED, COMPLETED};
use crate::task::Task;

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll};

/// A handle to a spawned task.
///
/// Awaiting a `JoinHandle` yields the task's output. If the task panicked,
/// the panic is resumed in the awaiting task.
///
/// Dropping the handle does **not** cancel the task; it only discards the
/// ability to observe its result. [`go`](crate::go) relies on this.
pub struct JoinHandle<T> {
    pub(crate) task: Arc<Task<T>>,
}

impl<T: Send + 'static> JoinHandle<T> {
    /// Cancels the task.
    ///
    /// Its future is dropped without being polled again. Has no effect on a
    /// task that already finished.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Returns `true` once the task has completed or been aborted.
    pub fn is_finished(&self) -> bool {
        matches!(self.task.state.load(Ordering::Acquire), COMPLETED | CANCELLED)
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.task.state.load(Ordering::Acquire) == CANCELLED
    }

    /// Registers `cx` and resolves once the task is finished, either way.
    ///
    /// The waker is registered before the state is checked a second time,
    /// so a completion racing with the registration is not missed.
    pub(crate) fn poll_settled(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.is_finished() {
            return Poll::Ready(());
        }

        {
            let mut waiters = self.task.waiters.lock().unwrap();
            if !waiters.iter().any(|w| w.will_wake(cx.waker())) {
                waiters.push(cx.waker().clone());
            }
        }

        if self.is_finished() {
            return Poll::Ready(());
        }

        Poll::Pending
    }
}

impl<T: Send + 'static> Future for JoinHandle<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if the task was aborted, or re-raises the task's own panic.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        std::task::ready!(self.as_mut().poll_settled(cx));

        if self.is_aborted() {
            panic!("awaited a task that was aborted");
        }

        // Safety: the task is COMPLETED and no longer touches these.
        if let Some(payload) = unsafe { (*self.task.panic.get()).take() } {
            std::panic::resume_unwind(payload);
        }

        let value = unsafe {
            (*self.task.result.get())
                .take()
                .expect("result already taken")
        };
        Poll::Ready(value)
    }
}
