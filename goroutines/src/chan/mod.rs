//! Channels and the queue they are built on.
//!
//! - [`AwaitableQueue`] is a FIFO whose consumers can wait for values.
//! - [`Receiver`] is a single-assignment slot for one receive attempt.
//! - [`Channel`] connects senders and receivers, unbuffered or buffered.
//!
//! A channel keeps its waiting receivers in an [`AwaitableQueue`]. A sender
//! dequeues a receiver and offers it the value; when no receiver is
//! waiting, the sender's pending dequeue is what blocks it. Closing the
//! channel closes that queue.

mod buffer;
mod channel;
mod queue;
mod receiver;
mod stream;

pub use channel::{Channel, CloseGuard, Receive};
pub use queue::{AwaitableQueue, Dequeue};
pub use receiver::{Receiver, SelectGate};
pub use stream::ChannelStream;
