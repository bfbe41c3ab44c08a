use super::buffer::{Buffer, Served, Ticket};
use super::queue::{AwaitableQueue, Dequeue};
use super::receiver::Receiver;
use crate::error::{Error, SendError};

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

/// A typed channel between concurrent tasks.
///
/// `Channel` is a handle: clones refer to the same channel, so one clone can
/// be moved into a producer task and another into a consumer.
///
/// An unbuffered channel ([`Channel::new`]) is a pure rendezvous: a
/// [`send`](Self::send) completes only once a receiver has taken the value.
/// A buffered channel ([`Channel::buffered`]) accepts up to `capacity`
/// values without a waiting receiver.
///
/// Values are delivered in FIFO order. Closing a channel is final: pending
/// receivers are released with `None`, buffered values can still be drained,
/// and every later `send` fails.
///
/// # Examples
///
/// ```rust,ignore
/// let channel = Channel::new();
///
/// go({
///     let channel = channel.clone();
///     async move { channel.send(10 * 20).await.unwrap() }
/// });
///
/// assert_eq!(channel.receive_ex().await, Some(200));
/// ```
pub struct Channel<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    /// Receive attempts waiting for a value. Pending dequeue requests on
    /// this queue are the senders waiting for a receiver.
    receivers: AwaitableQueue<Arc<Receiver<T>>>,

    /// Values held by the channel: the bounded buffer (capacity `0` when
    /// unbuffered), values evicted by blocked senders, and values given back
    /// by dropped receives.
    ///
    /// Lock order: buffer, then the receiver queue, then a receiver slot.
    buffer: Mutex<Buffer<T>>,
}

/// Outcome of the non-blocking part of a send.
enum Offer<'a, T> {
    Accepted,
    Closed(T),
    /// Unbuffered: wait for a receiver with the value in hand.
    Rendezvous(T, Dequeue<'a, Arc<Receiver<T>>>),
    /// Buffered: the value is in; wait until the value it evicted leaves.
    Parked(Arc<Ticket>),
}

/// Releases a receiver that can no longer be reached through the queue.
fn release<T>(receiver: Arc<Receiver<T>>) {
    let _ = receiver.try_receive(None);
}

impl<T> Channel<T> {
    /// Creates an unbuffered channel.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a channel that buffers up to `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`. Use [`Channel::new`] for an unbuffered
    /// channel, or [`Channel::try_buffered`] to get the error instead.
    pub fn buffered(capacity: usize) -> Self {
        match Self::try_buffered(capacity) {
            Ok(channel) => channel,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a buffered channel, rejecting a zero capacity.
    pub fn try_buffered(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidBufferCapacity(capacity));
        }

        Ok(Self::with_capacity(capacity))
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                receivers: AwaitableQueue::with_orphan_handler(release::<T>),
                buffer: Mutex::new(Buffer::new(capacity)),
            }),
        }
    }

    /// Sends a value, waiting until a receiver accepts it or it fits in
    /// the buffer.
    ///
    /// # Errors
    ///
    /// Fails with [`SendError`] (carrying the value back) if the channel is
    /// closed when `send` is called, without suspending. An unbuffered send
    /// also fails if the channel gets closed while it waits for a receiver.
    ///
    /// A send that finds the buffer full appends its value and evicts the
    /// oldest buffered one, then waits until that evicted value has been
    /// received. The channel keeps the evicted value, so closing the channel
    /// lets such a send complete with `Ok`: its value is still drained by
    /// later receives.
    pub async fn send(&self, value: T) -> Result<(), SendError<T>> {
        match self.offer(value) {
            Offer::Accepted => Ok(()),
            Offer::Closed(value) => {
                tracing::debug!("send on closed channel");
                Err(SendError(value))
            }
            Offer::Rendezvous(value, pending) => self.rendezvous(value, pending).await,
            Offer::Parked(ticket) => {
                std::future::poll_fn(|cx| ticket.poll_accepted(cx)).await;
                Ok(())
            }
        }
    }

    /// Attempts to place `value` without waiting.
    ///
    /// For a buffered channel this hands the value to a waiting receiver,
    /// or buffers it. Receivers only queue up while the channel holds no
    /// value, so delivering straight to them keeps FIFO order.
    fn offer(&self, value: T) -> Offer<'_, T> {
        let receivers = &self.shared.receivers;
        let mut buffer = self.shared.buffer.lock().unwrap();

        if receivers.is_closed() {
            return Offer::Closed(value);
        }

        if buffer.capacity() == 0 {
            drop(buffer);
            return Offer::Rendezvous(value, receivers.dequeue());
        }

        let mut value = value;
        while let Some(receiver) = receivers.try_dequeue() {
            match receiver.deliver(value) {
                Ok(()) => return Offer::Accepted,
                Err(rejected) => value = rejected,
            }
        }

        match buffer.push(value) {
            None => Offer::Accepted,
            Some(ticket) => Offer::Parked(ticket),
        }
    }

    /// Blocking half of an unbuffered send: waits for receivers until one
    /// accepts.
    ///
    /// A receiver that was already settled elsewhere (a losing `select`
    /// arm) rejects the value; the sender then waits again at the front of
    /// the line.
    async fn rendezvous(
        &self,
        mut value: T,
        mut pending: Dequeue<'_, Arc<Receiver<T>>>,
    ) -> Result<(), SendError<T>> {
        loop {
            let Some(receiver) = pending.await else {
                tracing::debug!("channel closed while a send was waiting");
                return Err(SendError(value));
            };

            match receiver.deliver(value) {
                Ok(()) => return Ok(()),
                Err(rejected) => {
                    value = rejected;
                    pending = self.shared.receivers.dequeue_front();
                }
            }
        }
    }

    /// Registers `receiver` with the channel and returns a future resolving
    /// to whatever settles it.
    ///
    /// If the channel is closed with nothing buffered, the receiver is
    /// settled with `None` at once and the returned future is ready.
    pub fn receive_into(&self, receiver: Arc<Receiver<T>>) -> Receive<T> {
        self.arm(&receiver, false);

        Receive {
            shared: self.shared.clone(),
            receiver: Some(receiver),
        }
    }

    /// Like [`receive_into`](Self::receive_into), but leaves `receiver`
    /// untouched and returns `None` when the channel is closed with nothing
    /// buffered.
    pub(crate) fn receive_armed(&self, receiver: Arc<Receiver<T>>) -> Option<Receive<T>> {
        if !self.arm(&receiver, true) {
            return None;
        }

        Some(Receive {
            shared: self.shared.clone(),
            receiver: Some(receiver),
        })
    }

    /// Receives a value, keeping track of whether one was available.
    ///
    /// Resolves to `Some(value)`, or to `None` once the channel is closed and
    /// drained.
    pub fn receive_ex(&self) -> Receive<T> {
        self.receive_into(Arc::new(Receiver::new()))
    }

    /// Receives a value, or the zero value once the channel is closed and
    /// drained.
    pub async fn receive(&self) -> T
    where
        T: Default,
    {
        self.receive_ex().await.unwrap_or_default()
    }

    /// Hooks `receiver` up to the channel.
    ///
    /// Returns `false` only when `skip_closed` is set and the channel is
    /// closed with nothing buffered; the receiver is then left untouched.
    pub(crate) fn arm(&self, receiver: &Arc<Receiver<T>>, skip_closed: bool) -> bool {
        let mut buffer = self.shared.buffer.lock().unwrap();

        match buffer.serve(receiver) {
            Served::Delivered | Served::Refused => return true,
            Served::Empty => {}
        }

        match self.shared.receivers.enqueue(receiver.clone()) {
            Ok(()) => true,
            Err(_) if skip_closed => false,
            Err(receiver) => {
                release(receiver);
                true
            }
        }
    }

    /// Closes the channel.
    ///
    /// The first call releases every waiting receiver with `None`, fails
    /// every sender waiting for a receiver, and returns `true`. Later calls
    /// do nothing and return `false`.
    ///
    /// Every value a send was told is in stays receivable: buffered values,
    /// and values evicted by sends blocked on a full buffer. Those sends
    /// complete with `Ok`.
    pub fn close(&self) -> bool {
        let mut buffer = self.shared.buffer.lock().unwrap();

        let Some(waiting) = self.shared.receivers.close() else {
            return false;
        };

        let released = waiting.len();
        for receiver in waiting {
            release(receiver);
        }
        let parked = buffer.release_senders();

        tracing::trace!(released, parked, "channel closed");
        true
    }

    /// Returns `true` until the channel is closed.
    pub fn is_open(&self) -> bool {
        !self.shared.receivers.is_closed()
    }

    /// Returns a guard that closes the channel when dropped.
    ///
    /// Useful for producers that must close their output however they exit.
    pub fn close_on_drop(&self) -> CloseGuard<T> {
        CloseGuard {
            channel: self.clone(),
        }
    }

    /// Buffer capacity; `0` for an unbuffered channel.
    pub fn capacity(&self) -> usize {
        self.shared.buffer.lock().unwrap().capacity()
    }

    /// Number of values in the buffer, at most [`capacity`](Self::capacity).
    ///
    /// Values evicted by sends waiting on a full buffer are not counted.
    pub fn len(&self) -> usize {
        self.shared.buffer.lock().unwrap().len()
    }

    /// Returns `true` if no value is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both handles refer to the same channel.
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T> Shared<T> {
    /// Takes back a value whose receive was dropped unconsumed.
    ///
    /// The value goes to the next waiting receiver, or is held for the next
    /// receive. It was acknowledged to its sender, so it is never dropped.
    fn reclaim(&self, value: T) {
        let mut buffer = self.buffer.lock().unwrap();

        let mut value = value;
        while let Some(receiver) = self.receivers.try_dequeue() {
            match receiver.deliver(value) {
                Ok(()) => return,
                Err(rejected) => value = rejected,
            }
        }

        tracing::trace!("value of a dropped receive held for the next one");
        buffer.reclaim(value);
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("open", &self.is_open())
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}

/// Future returned by [`Channel::receive_ex`] and [`Channel::receive_into`].
///
/// Dropping it before completion withdraws the receive, so no sender will
/// hand it a value.
#[must_use = "a receive does nothing unless awaited"]
pub struct Receive<T> {
    shared: Arc<Shared<T>>,
    receiver: Option<Arc<Receiver<T>>>,
}

impl<T> Future for Receive<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let receiver = self
            .receiver
            .as_ref()
            .expect("Receive polled after completion");

        let value = std::task::ready!(receiver.poll_take(cx));
        self.receiver = None;

        Poll::Ready(value)
    }
}

impl<T> Drop for Receive<T> {
    fn drop(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            if let Some(value) = receiver.withdraw() {
                self.shared.reclaim(value);
            }
        }
    }
}

/// Closes a channel when dropped. Returned by [`Channel::close_on_drop`].
pub struct CloseGuard<T> {
    channel: Channel<T>,
}

impl<T> CloseGuard<T> {
    /// The guarded channel.
    pub fn channel(&self) -> &Channel<T> {
        &self.channel
    }
}

impl<T> Drop for CloseGuard<T> {
    fn drop(&mut self) {
        self.channel.close();
    }
}
