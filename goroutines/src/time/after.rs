use super::sleep::sleep;
use crate::chan::Channel;

use std::time::{Duration, Instant};

/// Returns a channel that receives the current time once `duration` has
/// elapsed, and is closed right after.
///
/// Meant as a timeout arm of a [`Select`](crate::select::Select):
///
/// ```rust,ignore
/// let timed_out = Select::new()
///     .case(&results, |r| Some(r))
///     .case_ex(&after(Duration::from_secs(1)), |_| None)
///     .await;
/// ```
///
/// The channel has room for the one value, so the timer task never blocks
/// even if nobody receives.
///
/// # Panics
///
/// Panics if called outside of a runtime.
pub fn after(duration: Duration) -> Channel<Instant> {
    let channel = Channel::buffered(1);

    let tick = channel.clone();
    crate::go(async move {
        sleep(duration).await;

        let _close = tick.close_on_drop();
        if tick.send(Instant::now()).await.is_err() {
            tracing::trace!("timer channel closed before it fired");
        }
    });

    channel
}
