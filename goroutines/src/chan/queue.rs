use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// A FIFO queue whose `dequeue` can wait for a value.
///
/// When values outnumber consumers they are buffered. When consumers
/// outnumber values, each [`dequeue`](Self::dequeue) registers a pending
/// request (a *promise*), and later [`enqueue`](Self::enqueue) calls fulfil
/// those promises in registration order instead of buffering.
///
/// The queue can be [closed](Self::close): buffered values are handed back
/// to the caller, every pending request resolves to `None`, and further
/// enqueues are rejected. Channels use this as their open/closed state.
///
/// # Examples
///
/// ```rust,ignore
/// let queue = AwaitableQueue::new();
/// let pending = queue.dequeue();
///
/// queue.enqueue(1).unwrap();
/// assert_eq!(pending.await, Some(1));
/// ```
pub struct AwaitableQueue<T> {
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    /// Values waiting for a consumer.
    values: VecDeque<T>,

    /// Consumers waiting for a value, oldest first.
    promises: VecDeque<Arc<Promise<T>>>,

    closed: bool,

    /// Receives values given back after the queue was closed.
    orphans: Option<fn(T)>,
}

/// A pending dequeue request.
///
/// Only mutated while the owning queue's lock is held, except for the
/// consumer taking a fulfilled value out.
struct Promise<T> {
    state: Mutex<PromiseState<T>>,
}

enum PromiseState<T> {
    Waiting(Option<Waker>),
    Fulfilled(T),
    Closed,
    Done,
}

impl<T> Promise<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(PromiseState::Waiting(None)),
        }
    }

    /// Settles the promise and wakes its consumer.
    fn settle(&self, outcome: PromiseState<T>) {
        let previous = std::mem::replace(&mut *self.state.lock().unwrap(), outcome);

        if let PromiseState::Waiting(Some(waker)) = previous {
            waker.wake();
        }
    }
}

impl<T> AwaitableQueue<T> {
    /// Creates an empty, open queue.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Creates a queue that passes values given back after `close` to
    /// `orphans` instead of dropping them.
    ///
    /// A consumer that abandons its request after a value was handed to it
    /// returns that value to the queue; once the queue is closed nobody can
    /// dequeue it again.
    pub(crate) fn with_orphan_handler(orphans: fn(T)) -> Self {
        Self::build(Some(orphans))
    }

    fn build(orphans: Option<fn(T)>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                values: VecDeque::new(),
                promises: VecDeque::new(),
                closed: false,
                orphans,
            }),
        }
    }

    /// Adds a value to the queue.
    ///
    /// The value goes straight to the oldest pending [`dequeue`](Self::dequeue)
    /// if there is one; otherwise it is appended to the buffered values.
    ///
    /// Returns the value back as `Err` if the queue is closed.
    pub fn enqueue(&self, value: T) -> Result<(), T> {
        let mut inner = self.inner.lock().unwrap();

        if inner.closed {
            return Err(value);
        }

        inner.give(value);
        Ok(())
    }

    /// Takes the oldest value, waiting for one if the queue is empty.
    ///
    /// The request is registered when this method is **called**, not when
    /// the returned future is first polled. Callers can therefore register
    /// while holding another lock and await after releasing it without
    /// losing their place in line.
    ///
    /// Resolves to `None` once the queue is closed and no value was handed
    /// to this request.
    pub fn dequeue(&self) -> Dequeue<'_, T> {
        self.dequeue_at(false)
    }

    /// Like [`dequeue`](Self::dequeue), but a newly registered request goes
    /// to the **front** of the pending requests.
    ///
    /// Used by senders retrying after losing a race, so they keep their
    /// original position.
    pub(crate) fn dequeue_front(&self) -> Dequeue<'_, T> {
        self.dequeue_at(true)
    }

    fn dequeue_at(&self, front: bool) -> Dequeue<'_, T> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(value) = inner.values.pop_front() {
            return Dequeue {
                queue: self,
                state: DequeueState::Ready(Some(value)),
            };
        }

        if inner.closed {
            return Dequeue {
                queue: self,
                state: DequeueState::Ready(None),
            };
        }

        let promise = Arc::new(Promise::new());
        if front {
            inner.promises.push_front(promise.clone());
        } else {
            inner.promises.push_back(promise.clone());
        }

        Dequeue {
            queue: self,
            state: DequeueState::Pending(promise),
        }
    }

    /// Takes the oldest buffered value without ever registering a request.
    pub fn try_dequeue(&self) -> Option<T> {
        self.inner.lock().unwrap().values.pop_front()
    }

    /// Number of buffered values.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().values.len()
    }

    /// Returns `true` if no value is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pending dequeue requests.
    pub fn promised_len(&self) -> usize {
        self.inner.lock().unwrap().promises.len()
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Closes the queue.
    ///
    /// Every pending request resolves to `None` and later enqueues are
    /// rejected. Returns the values that were still buffered, in FIFO order,
    /// or `None` if the queue was already closed.
    pub fn close(&self) -> Option<Vec<T>> {
        let (values, promises) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.closed {
                return None;
            }
            inner.closed = true;

            (
                inner.values.drain(..).collect::<Vec<_>>(),
                inner.promises.drain(..).collect::<Vec<_>>(),
            )
        };

        for promise in promises {
            promise.settle(PromiseState::Closed);
        }

        Some(values)
    }

    /// Puts a value back after its consumer walked away.
    ///
    /// The value keeps its place at the head of the line.
    fn restore(&self, value: T) {
        let mut inner = self.inner.lock().unwrap();

        if inner.closed {
            let orphans = inner.orphans;
            drop(inner);

            if let Some(orphans) = orphans {
                orphans(value);
            }
            return;
        }

        match inner.promises.pop_front() {
            Some(promise) => promise.settle(PromiseState::Fulfilled(value)),
            None => inner.values.push_front(value),
        }
    }

    /// Drops a pending request, restoring any value it was handed.
    fn withdraw(&self, promise: &Arc<Promise<T>>) {
        {
            let mut inner = self.inner.lock().unwrap();

            if let Some(index) = inner.promises.iter().position(|p| Arc::ptr_eq(p, promise)) {
                inner.promises.remove(index);
                return;
            }
        }

        let state = std::mem::replace(&mut *promise.state.lock().unwrap(), PromiseState::Done);
        if let PromiseState::Fulfilled(value) = state {
            self.restore(value);
        }
    }
}

impl<T> Inner<T> {
    /// Hands `value` to the oldest pending request or buffers it.
    fn give(&mut self, value: T) {
        match self.promises.pop_front() {
            Some(promise) => promise.settle(PromiseState::Fulfilled(value)),
            None => self.values.push_back(value),
        }
    }
}

impl<T> Default for AwaitableQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

enum DequeueState<T> {
    Ready(Option<T>),
    Pending(Arc<Promise<T>>),
    Done,
}

/// Future returned by [`AwaitableQueue::dequeue`].
///
/// Dropping it before completion withdraws the request. A value that was
/// already handed to it is put back at the head of the queue, so nothing is
/// lost.
#[must_use = "a dequeue request does nothing unless awaited"]
pub struct Dequeue<'a, T> {
    queue: &'a AwaitableQueue<T>,
    state: DequeueState<T>,
}

impl<T> Unpin for Dequeue<'_, T> {}

impl<T> Future for Dequeue<'_, T> {
    type Output = Option<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let promise = match std::mem::replace(&mut this.state, DequeueState::Done) {
            DequeueState::Ready(value) => return Poll::Ready(value),
            DequeueState::Pending(promise) => promise,
            DequeueState::Done => panic!("Dequeue polled after completion"),
        };

        let mut state = promise.state.lock().unwrap();
        match std::mem::replace(&mut *state, PromiseState::Done) {
            PromiseState::Fulfilled(value) => Poll::Ready(Some(value)),
            PromiseState::Closed => Poll::Ready(None),
            PromiseState::Waiting(_) => {
                *state = PromiseState::Waiting(Some(cx.waker().clone()));
                drop(state);

                this.state = DequeueState::Pending(promise);
                Poll::Pending
            }
            PromiseState::Done => unreachable!("promise consumed twice"),
        }
    }
}

impl<T> Drop for Dequeue<'_, T> {
    fn drop(&mut self) {
        match std::mem::replace(&mut self.state, DequeueState::Done) {
            DequeueState::Pending(promise) => self.queue.withdraw(&promise),
            DequeueState::Ready(Some(value)) => self.queue.restore(value),
            DequeueState::Ready(None) | DequeueState::Done => {}
        }
    }
}
