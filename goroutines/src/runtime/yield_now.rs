use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Gives other tasks a chance to run before the current one continues.
///
/// The task is rescheduled immediately; it yields exactly once.
///
/// ```rust,ignore
/// while !done.load(Ordering::Acquire) {
///     yield_now().await;
/// }
/// ```
pub async fn yield_now() {
    YieldNow { yielded: false }.await
}

struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
