use super::JoinHandle;
use super::state::{CANCELLED, COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use crate::runtime::context::{CURRENT_INJECTOR, CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::runtime::task::waker::make_waker;
use crate::runtime::work_stealing::injector::Injector;

use std::any::Any;
use std::cell::UnsafeCell;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// A unit of work the scheduler can run without knowing its output type.
pub(crate) trait Runnable: Send + Sync {
    /// Polls the task once. Called by a worker thread.
    fn run(self: Arc<Self>);
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A spawned task.
///
/// Owns the future and coordinates its lifecycle: scheduling state, the
/// output once ready, and the wakers of the `JoinHandle`s waiting for it.
///
/// The `state` atomic guards the `UnsafeCell`s: only the thread that moved
/// the task to `RUNNING` (or that cancelled it from `IDLE`/`QUEUED`)
/// touches the future, and `result`/`panic` are only read after the task
/// is `COMPLETED`.
pub(crate) struct Task<T> {
    future: UnsafeCell<BoxFuture<T>>,

    pub(crate) result: UnsafeCell<Option<T>>,

    /// Payload of a panic raised while polling the future.
    pub(crate) panic: UnsafeCell<Option<Box<dyn Any + Send>>>,

    /// One of the constants in [`state`](super::state).
    pub(crate) state: AtomicUsize,

    /// Where the task is pushed when it is woken.
    injector: Arc<Injector>,

    /// Wakers of the `JoinHandle`s awaiting this task.
    pub(crate) waiters: Mutex<Vec<Waker>>,
}

unsafe impl<T> Send for Task<T> {}
unsafe impl<T> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a task in the `QUEUED` state. The caller must push it.
    pub(crate) fn new<F>(future: F, injector: Arc<Injector>) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: UnsafeCell::new(Box::pin(future)),
            result: UnsafeCell::new(None),
            panic: UnsafeCell::new(None),
            state: AtomicUsize::new(QUEUED),
            injector,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Polls the future once.
    ///
    /// A panic inside the future completes the task instead of unwinding
    /// through the worker thread; the payload is re-raised in whoever
    /// awaits the `JoinHandle`.
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: RUNNING gives this thread exclusive access to the future.
        let poll = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
            (&mut *self.future.get()).as_mut().poll(&mut cx)
        }));

        match poll {
            Ok(Poll::Pending) => self.park(),
            Ok(Poll::Ready(value)) => {
                unsafe {
                    *self.result.get() = Some(value);
                }
                self.complete();
            }
            Err(payload) => {
                tracing::error!(panic = panic_message(&*payload), "task panicked");
                unsafe {
                    *self.panic.get() = Some(payload);
                }
                self.complete();
            }
        }
    }

    /// Leaves `RUNNING` after a pending poll.
    fn park(self: &Arc<Self>) {
        if self
            .state
            .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            return;
        }

        // Woken while running: go straight back into the queue.
        if self
            .state
            .compare_exchange(NOTIFIED, QUEUED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.injector.push(self.clone());
            return;
        }

        // Aborted while running; the abort left the future to us.
        unsafe { self.release_future() };
    }

    fn complete(&self) {
        unsafe { self.release_future() };
        self.state.store(COMPLETED, Ordering::Release);
        self.notify_waiters();
    }

    /// Drops the future and everything it captured.
    ///
    /// # Safety
    ///
    /// The caller must have exclusive access to the future.
    unsafe fn release_future(&self) {
        unsafe {
            *self.future.get() = Box::pin(std::future::pending());
        }
    }

    fn notify_waiters(&self) {
        let waiters = std::mem::take(&mut *self.waiters.lock().unwrap());
        for w in waiters {
            w.wake();
        }
    }

    /// Schedules the task.
    ///
    /// An `IDLE` task is queued; a `RUNNING` one is marked `NOTIFIED` so it is
    /// re-queued as soon as its current poll returns.
    pub(crate) fn wake(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.injector.push(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Cancels the task.
    ///
    /// A task that is not currently being polled has its future dropped
    /// right away; a running one drops it when its poll returns. Waiting
    /// `JoinHandle`s are woken. Completed tasks are left alone.
    pub(crate) fn abort(&self) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            if state == COMPLETED || state == CANCELLED {
                return;
            }

            if self
                .state
                .compare_exchange(state, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                if state == IDLE || state == QUEUED {
                    unsafe { self.release_future() };
                }

                tracing::trace!("task aborted");
                self.notify_waiters();
                return;
            }
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Spawns a future onto the current runtime.
///
/// From a worker thread the task goes to that worker's local queue; from
/// anywhere else it goes to the global injector.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let injector = CURRENT_INJECTOR.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a runtime")
            .clone()
    });

    let task = Arc::new(Task::new(future, injector.clone()));

    let pushed_locally = CURRENT_WORKER_ID.with(|id_cell| {
        let Some(id) = *id_cell.borrow() else {
            return false;
        };

        CURRENT_LOCALS.with(|locals_cell| match locals_cell.borrow().as_ref() {
            Some(locals) => {
                locals[id].push(task.clone());
                true
            }
            None => false,
        })
    });

    if !pushed_locally {
        injector.push(task.clone());
    }

    JoinHandle { task }
}
