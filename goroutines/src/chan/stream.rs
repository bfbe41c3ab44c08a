use super::channel::{Channel, Receive};

use futures::Stream;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A [`Stream`] over the values received from a channel.
///
/// Each item is one receive; the stream ends once the channel is closed and
/// drained. Created by [`Channel::into_stream`].
pub struct ChannelStream<T> {
    channel: Channel<T>,
    pending: Option<Receive<T>>,
}

impl<T> Channel<T> {
    /// Turns this handle into a [`Stream`] of received values.
    pub fn into_stream(self) -> ChannelStream<T> {
        ChannelStream {
            channel: self,
            pending: None,
        }
    }

    /// Receives values until the channel is closed and drained, calling `f`
    /// on each.
    pub async fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(T),
    {
        while let Some(value) = self.receive_ex().await {
            f(value);
        }
    }
}

impl<T> ChannelStream<T> {
    /// The channel this stream reads from.
    pub fn channel(&self) -> &Channel<T> {
        &self.channel
    }
}

impl<T> Stream for ChannelStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = &mut *self;
        let receive = this
            .pending
            .get_or_insert_with(|| this.channel.receive_ex());

        let item = std::task::ready!(Pin::new(receive).poll(cx));
        this.pending = None;

        Poll::Ready(item)
    }
}
