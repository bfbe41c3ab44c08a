use super::executor::core::Executor;
use crate::reactor::command::Command;
use crate::reactor::{Reactor, ReactorHandle};

use futures::FutureExt;

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

/// A running scheduler: worker threads plus the timer reactor.
///
/// Build one with [`RuntimeBuilder`](crate::RuntimeBuilder), or let
/// `#[goroutines::main]` do it. Dropping the runtime stops the workers and
/// the reactor and joins the worker threads; tasks that have not finished
/// are dropped.
pub struct Runtime {
    executor: Executor,
    reactor_handle: ReactorHandle,
}

impl Runtime {
    pub(crate) fn new(worker_threads: usize, thread_name: &str) -> Self {
        let reactor_handle = match Reactor::start(format!("{thread_name}-timer")) {
            Ok(handle) => handle,
            Err(err) => panic!("failed to start the timer reactor: {err}"),
        };

        let executor = Executor::new(reactor_handle.clone(), worker_threads, thread_name);

        tracing::debug!(worker_threads, thread_name, "runtime started");

        Self {
            executor,
            reactor_handle,
        }
    }

    /// Spawns a detached future onto the runtime.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.executor.spawn(future);
    }

    /// Runs a future to completion on the runtime, blocking the current
    /// thread until it is done.
    ///
    /// The future is spawned onto the workers and its output sent back over
    /// a channel. A panic inside the future is resumed on the calling
    /// thread.
    ///
    /// ```rust,ignore
    /// let runtime = RuntimeBuilder::new().build();
    /// assert_eq!(runtime.block_on(async { 42 }), 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (transmitter, receiver) = mpsc::channel();

        self.spawn(async move {
            let result = AssertUnwindSafe(future).catch_unwind().await;
            let _ = transmitter.send(result);
        });

        match receiver.recv() {
            Ok(Ok(output)) => output,
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) => panic!("runtime shut down before block_on completed"),
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.executor.shutdown();

        let _ = self.reactor_handle.send(Command::Shutdown);

        self.executor.join();
        tracing::debug!("runtime stopped");
    }
}
