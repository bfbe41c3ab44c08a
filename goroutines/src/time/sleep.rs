use crate::reactor::command::Command;
use crate::reactor::timer::TimerEntry;
use crate::runtime::context::CURRENT_REACTOR;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Waits until `duration` has elapsed.
///
/// # Panics
///
/// The returned future panics if polled outside of a runtime.
///
/// ```rust,ignore
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(Instant::now() + duration)
}

/// Waits until `deadline`.
pub fn sleep_until(deadline: Instant) -> Sleep {
    Sleep::new(deadline)
}

/// Future returned by [`sleep`] and [`sleep_until`].
///
/// The timer is registered with the reactor on first poll and cancelled
/// when the future is dropped.
#[must_use = "futures do nothing unless awaited"]
pub struct Sleep {
    deadline: Instant,

    registered: bool,

    /// Shared with the reactor's timer entry.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    fn new(deadline: Instant) -> Self {
        Self {
            deadline,
            registered: false,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The instant this sleep completes at.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        if Instant::now() >= this.deadline {
            return Poll::Ready(());
        }

        if !this.registered {
            this.registered = true;

            CURRENT_REACTOR.with(|cell| {
                let binding = cell.borrow();
                let reactor = binding.as_ref().expect("Sleep polled outside of runtime");

                if reactor
                    .send(Command::SetTimer(TimerEntry::new(
                        this.deadline,
                        cx.waker().clone(),
                        this.cancelled.clone(),
                    )))
                    .is_err()
                {
                    tracing::warn!("timer registered after the reactor stopped");
                }
            });
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
