use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A worker's own run queue.
///
/// The owning worker pushes and pops at the back (LIFO, so a freshly
/// spawned task runs while its data is still hot). Other workers steal from
/// the front.
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.inner.lock().unwrap().push_back(task);
    }

    /// Owner side: newest task first.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().unwrap().pop_back()
    }

    /// Thief side: oldest task first.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().unwrap().pop_front()
    }
}
