//! Waiting on several channels at once.
//!
//! A [`Select`] is built from cases, each pairing a channel with a callback.
//! Awaiting it waits until one of the channels delivers, runs that case's
//! callback exactly once, and resolves with its result.
//!
//! ```rust,ignore
//! let numbers = Channel::<i32>::new();
//! let words = Channel::<String>::new();
//!
//! let picked = Select::new()
//!     .case(&numbers, |n| format!("number {n}"))
//!     .case(&words, |w| format!("word {w}"))
//!     .await;
//! ```
//!
//! All arms of one select share a single [`SelectGate`]: whichever arm is
//! settled first claims it, and every other arm refuses values from then
//! on. A sender that reaches a refused arm moves on to the next receiver,
//! so no value is ever lost to a losing arm.
//!
//! Arms are registered in the order the cases were added and registration
//! stops as soon as one arm fires, so an earlier case with a value already
//! available always wins over a later one.
//!
//! A case whose channel is closed with nothing buffered is skipped. If every
//! case is skipped the select resolves to `None` without running any
//! callback. A channel closed *while* the select waits settles its arm with
//! the closed signal, which does run the callback.
//!
//! For a timeout arm, select on [`after`](crate::time::after).

mod case;

pub use case::SelectCase;

use crate::chan::{Channel, SelectGate};
use case::{ChannelCase, SharedCallback};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A pending choice between channel receives.
///
/// `Select` is a builder and a future: add cases, then `.await` it. It
/// resolves to `Some(result)` of the winning callback, or `None` when no
/// case could ever fire.
///
/// Dropping a `Select` before it resolves withdraws every arm.
#[must_use = "a select does nothing unless awaited"]
pub struct Select<'a, R> {
    cases: Vec<Box<dyn SelectCase<R> + 'a>>,

    /// Indices of the armed cases, filled in on first poll.
    armed: Option<Vec<usize>>,
}

impl<'a, R> Select<'a, R> {
    /// Creates a select with no cases.
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            armed: None,
        }
    }

    /// Adds a case receiving from `channel`.
    ///
    /// `callback` receives the value, or `T::default()` if the channel gets
    /// closed while the select is waiting.
    pub fn case<T, F>(self, channel: &Channel<T>, callback: F) -> Self
    where
        T: Default + Send + 'a,
        F: FnOnce(T) -> R + Send + 'a,
    {
        self.case_ex(channel, move |value: Option<T>| {
            callback(value.unwrap_or_default())
        })
    }

    /// Adds a case receiving from `channel`, telling values from the closed
    /// signal.
    ///
    /// `callback` receives `Some(value)`, or `None` if the channel gets
    /// closed while the select is waiting.
    pub fn case_ex<T, F>(self, channel: &Channel<T>, callback: F) -> Self
    where
        T: Send + 'a,
        F: FnOnce(Option<T>) -> R + Send + 'a,
    {
        self.with_case(case_ex(channel, callback))
    }

    /// Adds one case per channel in `channels`, all sharing `callback`.
    ///
    /// Whichever of the channels delivers first wins; the others are
    /// withdrawn like any losing arm.
    pub fn case_any<T, F>(mut self, channels: &[&Channel<T>], callback: F) -> Self
    where
        T: Default + Send + 'a,
        F: FnOnce(T) -> R + Send + 'a,
    {
        let shared = SharedCallback::new(callback);

        for channel in channels {
            let shared = shared.clone();
            self = self.case_ex(*channel, move |value: Option<T>| {
                let callback = shared.take().expect("select case fired twice");
                callback(value.unwrap_or_default())
            });
        }

        self
    }

    /// Adds a prebuilt case.
    pub fn with_case(mut self, case: Box<dyn SelectCase<R> + 'a>) -> Self {
        self.cases.push(case);
        self
    }

    /// Number of cases added so far.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if no case was added.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Arms the cases in order until one of them fires.
    fn arm(&mut self) -> Vec<usize> {
        let gate = Arc::new(SelectGate::new());
        let mut armed = Vec::with_capacity(self.cases.len());

        for (index, case) in self.cases.iter_mut().enumerate() {
            if gate.is_claimed() {
                break;
            }

            if case.arm(&gate) {
                armed.push(index);
            }
        }

        tracing::trace!(
            cases = self.cases.len(),
            armed = armed.len(),
            "select armed"
        );
        armed
    }
}

impl<R> Default for Select<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Future for Select<'_, R> {
    type Output = Option<R>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let armed = match this.armed.take() {
            Some(armed) => armed,
            None => this.arm(),
        };

        if armed.is_empty() {
            tracing::trace!("no select case can fire");
            this.armed = Some(armed);
            return Poll::Ready(None);
        }

        for &index in &armed {
            if let Poll::Ready(result) = this.cases[index].poll_case(cx) {
                this.armed = Some(armed);
                return Poll::Ready(Some(result));
            }
        }

        this.armed = Some(armed);
        Poll::Pending
    }
}

/// Waits on a list of prebuilt cases, in order.
///
/// Equivalent to adding each case to a [`Select`] and awaiting it.
pub async fn select<'a, R>(cases: Vec<Box<dyn SelectCase<R> + 'a>>) -> Option<R> {
    let mut select = Select::new();
    for case in cases {
        select = select.with_case(case);
    }

    select.await
}

/// Builds a boxed case for [`select`], receiving from `channel`.
pub fn case<'a, T, F, R>(channel: &Channel<T>, callback: F) -> Box<dyn SelectCase<R> + 'a>
where
    T: Default + Send + 'a,
    F: FnOnce(T) -> R + Send + 'a,
{
    case_ex(channel, move |value: Option<T>| {
        callback(value.unwrap_or_default())
    })
}

/// Builds a boxed case for [`select`], telling values from the closed
/// signal.
pub fn case_ex<'a, T, F, R>(channel: &Channel<T>, callback: F) -> Box<dyn SelectCase<R> + 'a>
where
    T: Send + 'a,
    F: FnOnce(Option<T>) -> R + Send + 'a,
{
    Box::new(ChannelCase::new(channel.clone(), callback))
}
