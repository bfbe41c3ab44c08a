use super::Runtime;

use std::thread;

const DEFAULT_THREAD_NAME: &str = "goroutines-worker";

/// Configures and creates a [`Runtime`].
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .worker_threads(4)
///     .thread_name("pipeline")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    /// Number of worker threads in the executor.
    worker_threads: usize,

    /// Prefix of the worker thread names; workers are `{name}-{index}`.
    thread_name: String,
}

impl RuntimeBuilder {
    /// Creates a builder with one worker per available CPU (falling back to
    /// `1`) and threads named `goroutines-worker-{index}`.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }

    /// Sets the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Sets the prefix used to name the runtime's threads.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Starts the reactor and the worker threads.
    ///
    /// # Panics
    ///
    /// Panics if the operating system refuses to spawn a thread.
    pub fn build(self) -> Runtime {
        Runtime::new(self.worker_threads, &self.thread_name)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
