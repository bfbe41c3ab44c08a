use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Shared handle to the global injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// How long an idle worker sleeps before looking for work again.
///
/// Tasks pushed to another worker's local queue do not notify the
/// condvar, so parking is always bounded.
const PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Global FIFO of runnable tasks.
///
/// Tasks spawned from outside a worker and tasks rescheduled by a waker land
/// here. Idle workers park on the condvar until something is pushed.
pub(crate) struct Injector {
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Paired with `condvar`; guards nothing but the wait itself.
    parked: Mutex<()>,

    condvar: Condvar,

    shutdown: AtomicBool,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            parked: Mutex::new(()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Marks the injector as shut down and wakes every parked worker.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.condvar.notify_all();
    }

    /// Queues a task and wakes one parked worker.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.queue.lock().unwrap().push_back(task);
        self.condvar.notify_one();
    }

    /// Parks the calling worker for at most [`PARK_TIMEOUT`], unless there
    /// is already work or shutdown has begun.
    pub(crate) fn park(&self) {
        if self.shutdown.load(Ordering::Acquire) {
            return;
        }

        let parked = self.parked.lock().unwrap();

        if !self.queue.lock().unwrap().is_empty() {
            return;
        }

        let _ = self.condvar.wait_timeout(parked, PARK_TIMEOUT).unwrap();
    }

    /// Takes the oldest queued task.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.queue.lock().unwrap().pop_front()
    }

    /// Drops every queued task, returning how many there were.
    pub(crate) fn clear(&self) -> usize {
        let tasks = std::mem::take(&mut *self.queue.lock().unwrap());
        tasks.len()
    }
}
