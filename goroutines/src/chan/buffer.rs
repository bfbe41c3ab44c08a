use super::receiver::Receiver;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// Values a channel holds on behalf of senders that were already told their
/// value is in.
///
/// Three queues, served oldest first:
///
/// - `reclaimed`: values delivered to a receive that was dropped before it
///   consumed them;
/// - `overflow`: values evicted from a full buffer, each parked with the
///   [`Ticket`] of the send that evicted it;
/// - `values`: the bounded buffer proper, `len() <= capacity()`.
///
/// An unbuffered channel has capacity `0` and only ever uses `reclaimed`.
pub(crate) struct Buffer<T> {
    values: VecDeque<T>,
    overflow: VecDeque<Parked<T>>,
    reclaimed: VecDeque<T>,
    capacity: usize,
}

/// An evicted value and the send waiting for it to leave.
struct Parked<T> {
    value: T,
    ticket: Arc<Ticket>,
}

/// Outcome of [`Buffer::serve`].
pub(crate) enum Served {
    /// Nothing is held; the receiver was left untouched.
    Empty,
    /// The receiver took the oldest held value.
    Delivered,
    /// The receiver was already settled elsewhere; the value stayed put.
    Refused,
}

impl<T> Buffer<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            overflow: VecDeque::new(),
            reclaimed: VecDeque::new(),
            capacity,
        }
    }

    /// Appends a value to the bounded buffer.
    ///
    /// On overflow the oldest buffered value moves to the overflow queue and
    /// a ticket is returned; the sender waits on it until that value leaves
    /// the channel.
    pub(crate) fn push(&mut self, value: T) -> Option<Arc<Ticket>> {
        self.values.push_back(value);

        if self.values.len() <= self.capacity {
            return None;
        }

        let oldest = self.values.pop_front()?;
        let ticket = Arc::new(Ticket::new());
        self.overflow.push_back(Parked {
            value: oldest,
            ticket: ticket.clone(),
        });

        Some(ticket)
    }

    /// Keeps a value whose receive was dropped unconsumed.
    pub(crate) fn reclaim(&mut self, value: T) {
        self.reclaimed.push_back(value);
    }

    /// Offers the oldest held value to `receiver`.
    pub(crate) fn serve(&mut self, receiver: &Receiver<T>) -> Served {
        if let Some(value) = self.reclaimed.pop_front() {
            return match receiver.deliver(value) {
                Ok(()) => Served::Delivered,
                Err(value) => {
                    self.reclaimed.push_front(value);
                    Served::Refused
                }
            };
        }

        if let Some(Parked { value, ticket }) = self.overflow.pop_front() {
            return match receiver.deliver(value) {
                Ok(()) => {
                    ticket.accept();
                    Served::Delivered
                }
                Err(value) => {
                    self.overflow.push_front(Parked { value, ticket });
                    Served::Refused
                }
            };
        }

        match self.values.pop_front() {
            None => Served::Empty,
            Some(value) => match receiver.deliver(value) {
                Ok(()) => Served::Delivered,
                Err(value) => {
                    self.values.push_front(value);
                    Served::Refused
                }
            },
        }
    }

    /// Releases every parked sender. Their values stay receivable.
    pub(crate) fn release_senders(&mut self) -> usize {
        for parked in &self.overflow {
            parked.ticket.accept();
        }
        self.overflow.len()
    }

    /// Number of values in the bounded buffer.
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Wakes a send parked behind an evicted value.
pub(crate) struct Ticket {
    state: Mutex<TicketState>,
}

enum TicketState {
    Waiting(Option<Waker>),
    Accepted,
}

impl Ticket {
    fn new() -> Self {
        Self {
            state: Mutex::new(TicketState::Waiting(None)),
        }
    }

    fn accept(&self) {
        let previous = std::mem::replace(&mut *self.state.lock().unwrap(), TicketState::Accepted);

        if let TicketState::Waiting(Some(waker)) = previous {
            waker.wake();
        }
    }

    pub(crate) fn poll_accepted(&self, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.state.lock().unwrap();

        match &mut *state {
            TicketState::Accepted => Poll::Ready(()),
            TicketState::Waiting(waker) => {
                match waker {
                    Some(w) if w.will_wake(cx.waker()) => {}
                    _ => *waker = Some(cx.waker().clone()),
                }
                Poll::Pending
            }
        }
    }
}
