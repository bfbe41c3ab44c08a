use crate::runtime::context::{CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;
use crate::task::Runnable;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One executor thread.
///
/// Looks for work in this order:
/// 1. its own local queue,
/// 2. the global injector,
/// 3. the other workers' local queues,
///
/// and parks briefly when all of them are empty.
pub(crate) struct Worker {
    id: usize,

    /// Every worker's local queue, indexed by worker id.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    injector: InjectorHandle,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        locals: Arc<Vec<Arc<LocalQueue>>>,
        injector: InjectorHandle,
    ) -> Self {
        Self {
            id,
            locals,
            injector,
        }
    }

    /// Runs tasks until `shutdown` is set.
    ///
    /// Must be called with the runtime context already entered; the worker
    /// adds its own id and the local queues so that `spawn` from a task
    /// lands on this worker's queue.
    pub(crate) fn run(&self, shutdown: Arc<AtomicBool>) {
        CURRENT_WORKER_ID.with(|id| *id.borrow_mut() = Some(self.id));
        CURRENT_LOCALS.with(|locals| *locals.borrow_mut() = Some(self.locals.clone()));

        tracing::trace!(worker = self.id, "worker started");

        while !shutdown.load(Ordering::Acquire) {
            match self.next_task() {
                Some(task) => task.run(),
                None => self.injector.park(),
            }
        }

        // Queued tasks hold the injector alive; drop them with the worker.
        while self.locals[self.id].pop().is_some() {}

        CURRENT_LOCALS.with(|locals| *locals.borrow_mut() = None);
        CURRENT_WORKER_ID.with(|id| *id.borrow_mut() = None);

        tracing::trace!(worker = self.id, "worker stopped");
    }

    fn next_task(&self) -> Option<Arc<dyn Runnable>> {
        self.locals[self.id]
            .pop()
            .or_else(|| self.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// Steals from the other workers, starting with the next one in line.
    fn try_steal(&self) -> Option<Arc<dyn Runnable>> {
        let len = self.locals.len();

        (1..len)
            .map(|offset| (self.id + offset) % len)
            .find_map(|victim| self.locals[victim].steal())
    }
}
