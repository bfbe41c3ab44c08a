use crate::chan::{Channel, Receive, Receiver, SelectGate};

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

/// One arm of a [`Select`](super::Select).
///
/// An arm is *armed* once against the gate shared by every arm of the same
/// select, then polled until some arm fires. Dropping an armed case must
/// withdraw whatever it registered.
pub trait SelectCase<R>: Send {
    /// Registers this arm with its channel under `gate`.
    ///
    /// Returns `false` if the arm can never fire (its channel is closed with
    /// nothing buffered); the arm is then skipped for the rest of the
    /// select.
    fn arm(&mut self, gate: &Arc<SelectGate>) -> bool;

    /// Polls an armed case. Resolves with the callback's result once this
    /// arm has been settled.
    fn poll_case(&mut self, cx: &mut Context<'_>) -> Poll<R>;
}

/// A case receiving from one channel, calling `callback` with the
/// `Option<T>` that settled it.
pub(crate) struct ChannelCase<T, F> {
    channel: Channel<T>,
    callback: Option<F>,
    receive: Option<Receive<T>>,
}

impl<T, F> ChannelCase<T, F> {
    pub(crate) fn new(channel: Channel<T>, callback: F) -> Self {
        Self {
            channel,
            callback: Some(callback),
            receive: None,
        }
    }
}

impl<T, F, R> SelectCase<R> for ChannelCase<T, F>
where
    T: Send,
    F: FnOnce(Option<T>) -> R + Send,
{
    fn arm(&mut self, gate: &Arc<SelectGate>) -> bool {
        let receiver = Arc::new(Receiver::with_gate(gate.clone()));
        self.receive = self.channel.receive_armed(receiver);
        self.receive.is_some()
    }

    fn poll_case(&mut self, cx: &mut Context<'_>) -> Poll<R> {
        let Some(receive) = self.receive.as_mut() else {
            return Poll::Pending;
        };

        let value = std::task::ready!(Pin::new(receive).poll(cx));
        self.receive = None;

        let callback = self.callback.take().expect("select case fired twice");
        Poll::Ready(callback(value))
    }
}

/// A callback shared by the arms built from one
/// [`case_any`](super::Select::case_any). Only the winning arm takes it.
pub(crate) struct SharedCallback<F>(Arc<Mutex<Option<F>>>);

impl<F> SharedCallback<F> {
    pub(crate) fn new(callback: F) -> Self {
        Self(Arc::new(Mutex::new(Some(callback))))
    }

    pub(crate) fn take(&self) -> Option<F> {
        self.0.lock().unwrap().take()
    }
}

impl<F> Clone for SharedCallback<F> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
