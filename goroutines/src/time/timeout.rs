use super::sleep::{Sleep, sleep};
use crate::error::Elapsed;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// Runs `future` with a time limit.
///
/// Resolves to `Ok(output)` if the future completes within `duration`, or
/// to `Err(Elapsed)` otherwise, in which case the future is dropped.
///
/// ```rust,ignore
/// match timeout(Duration::from_millis(50), channel.receive_ex()).await {
///     Ok(value) => println!("got {value:?}"),
///     Err(_) => println!("nothing within 50ms"),
/// }
/// ```
pub fn timeout<F>(duration: Duration, future: F) -> Timeout<F>
where
    F: Future,
{
    Timeout {
        future,
        sleep: sleep(duration),
    }
}

/// Future returned by [`timeout`].
#[must_use = "futures do nothing unless awaited"]
pub struct Timeout<F> {
    future: F,
    sleep: Sleep,
}

impl<F> Future for Timeout<F>
where
    F: Future,
{
    type Output = Result<F::Output, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Safety: `future` is never moved out of the pinned `Timeout`, and
        // `sleep` is `Unpin`.
        let this = unsafe { self.get_unchecked_mut() };

        let future = unsafe { Pin::new_unchecked(&mut this.future) };
        if let Poll::Ready(val) = future.poll(cx) {
            return Poll::Ready(Ok(val));
        }

        if Pin::new(&mut this.sleep).poll(cx).is_ready() {
            return Poll::Ready(Err(Elapsed(())));
        }

        Poll::Pending
    }
}
