//! Error types.
//!
//! Most failures in this crate are programmer misuse rather than transient
//! conditions: sending on a closed channel, driving a [`WaitGroup`] below
//! zero or past `isize::MAX`, or building a buffered channel without room.
//! The panicking entry points ([`WaitGroup::add`], [`Channel::buffered`])
//! report these through [`Error`]'s `Display`; the `try_*` variants hand
//! the same value back.
//!
//! A receiver woken by [`Channel::close`] is **not** an error: it observes
//! `None` (or the zero value) instead.
//!
//! [`WaitGroup`]: crate::sync::WaitGroup
//! [`WaitGroup::add`]: crate::sync::WaitGroup::add
//! [`Channel::buffered`]: crate::chan::Channel::buffered
//! [`Channel::close`]: crate::chan::Channel::close

use std::fmt;

/// Errors reported by channels and wait groups.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value was sent on a channel that is already closed.
    #[error("send on closed channel")]
    ClosedChannelSend,

    /// `add` would have taken a wait group counter below zero.
    #[error("negative wait group counter ({counter})")]
    WaitGroupUnderflow {
        /// The counter value the rejected `add` would have produced.
        counter: isize,
    },

    /// `add` would have taken a wait group counter past `isize::MAX`.
    #[error("wait group counter overflow ({counter} + {delta})")]
    WaitGroupOverflow {
        /// The counter value before the rejected `add`.
        counter: isize,
        /// The rejected delta.
        delta: isize,
    },

    /// A buffered channel was requested with no buffer space.
    #[error("buffer capacity must be > 0, got {0}")]
    InvalidBufferCapacity(usize),
}

/// Convenience alias for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Returned by [`Channel::send`] when the channel is closed.
///
/// The rejected value is handed back so the caller can recover it.
///
/// [`Channel::send`]: crate::chan::Channel::send
#[derive(thiserror::Error, PartialEq, Eq, Clone, Copy)]
#[error("send on closed channel")]
pub struct SendError<T>(pub T);

impl<T> SendError<T> {
    /// Consumes the error, returning the value that could not be sent.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SendError(..)")
    }
}

impl<T> From<SendError<T>> for Error {
    fn from(_: SendError<T>) -> Self {
        Error::ClosedChannelSend
    }
}

/// Returned by [`timeout`](crate::time::timeout) when the deadline passes
/// before the wrapped future completes.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("deadline has elapsed")]
pub struct Elapsed(pub(crate) ());
