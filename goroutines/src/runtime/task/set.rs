use super::{JoinHandle, spawn};

use std::future::poll_fn;
use std::pin::Pin;
use std::task::Poll;

/// A group of spawned tasks with the same output type.
///
/// Outputs are collected in completion order. Dropping the set aborts every
/// task still in it.
///
/// ```rust,ignore
/// let mut set = JoinSet::new();
/// for i in 0..4 {
///     set.spawn(async move { i * 2 });
/// }
///
/// let mut total = 0;
/// while let Some(value) = set.join_next().await {
///     total += value;
/// }
/// ```
pub struct JoinSet<T: Send + 'static> {
    handles: Vec<JoinHandle<T>>,
}

impl<T: Send + 'static> JoinSet<T> {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawns `fut` on the current runtime and adds it to the set.
    ///
    /// # Panics
    ///
    /// Panics if called outside the context of a runtime.
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.handles.push(spawn(fut));
    }

    /// Number of tasks not yet joined.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for any task in the set to finish and returns its output.
    ///
    /// Returns `None` once the set is empty. Aborted tasks are removed
    /// silently.
    ///
    /// # Panics
    ///
    /// Re-raises the panic of a task that panicked.
    pub async fn join_next(&mut self) -> Option<T> {
        loop {
            if self.handles.is_empty() {
                return None;
            }

            let finished = poll_fn(|cx| {
                for (index, handle) in self.handles.iter_mut().enumerate() {
                    if Pin::new(&mut *handle).poll_settled(cx).is_ready() {
                        return Poll::Ready(index);
                    }
                }
                Poll::Pending
            })
            .await;

            let handle = self.handles.swap_remove(finished);
            if !handle.is_aborted() {
                return Some(handle.await);
            }
        }
    }

    /// Waits for every task and returns their outputs in completion order.
    pub async fn join_all(&mut self) -> Vec<T> {
        let mut outputs = Vec::with_capacity(self.handles.len());
        while let Some(output) = self.join_next().await {
            outputs.push(output);
        }
        outputs
    }

    /// Aborts every task in the set and empties it.
    pub fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl<T: Send + 'static> Default for JoinSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Drop for JoinSet<T> {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}
