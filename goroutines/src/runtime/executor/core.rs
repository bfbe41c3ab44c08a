use crate::reactor::ReactorHandle;
use crate::runtime::context::enter_context;
use crate::runtime::executor::worker::Worker;
use crate::runtime::task::Task;
use crate::runtime::work_stealing::injector::Injector;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Multi-threaded work-stealing executor.
///
/// Owns the global injector and the worker threads. Each worker runs with
/// the runtime context installed, so tasks can spawn further tasks and
/// register timers.
pub(crate) struct Executor {
    injector: Arc<Injector>,

    handles: Vec<JoinHandle<()>>,

    /// Shared with every worker; set once on shutdown.
    shutdown: Arc<AtomicBool>,
}

impl Executor {
    /// Spawns `threads` workers named `{thread_name}-{index}`.
    ///
    /// # Panics
    ///
    /// Panics if a worker thread cannot be spawned.
    pub(crate) fn new(reactor_handle: ReactorHandle, threads: usize, thread_name: &str) -> Self {
        let injector = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let locals: Arc<Vec<Arc<LocalQueue>>> =
            Arc::new((0..threads).map(|_| Arc::new(LocalQueue::new())).collect());

        let mut handles = Vec::with_capacity(threads);

        for id in 0..threads {
            let worker = Worker::new(id, locals.clone(), injector.clone());

            let reactor = reactor_handle.clone();
            let sd = shutdown.clone();
            let injector = injector.clone();

            let spawned = thread::Builder::new()
                .name(format!("{thread_name}-{id}"))
                .spawn(move || {
                    enter_context(reactor, injector, || worker.run(sd));
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => panic!("failed to spawn worker thread {id}: {err}"),
            }
        }

        Self {
            injector,
            handles,
            shutdown,
        }
    }

    /// Tells every worker to stop and wakes the parked ones.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.injector.shutdown();
    }

    /// Queues a detached task. Ignored once shutdown has begun.
    pub(crate) fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("spawn after runtime shutdown ignored");
            return;
        }

        let task = Arc::new(Task::new(future, self.injector.clone()));
        self.injector.push(task);
    }

    /// Waits for every worker thread to exit.
    pub(crate) fn join(&mut self) {
        for h in self.handles.drain(..) {
            if h.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }

        let dropped = self.injector.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "unfinished tasks dropped at shutdown");
        }
    }
}
