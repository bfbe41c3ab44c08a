//! Time utilities driven by the runtime's timer reactor.
//!
//! - [`sleep`] and [`sleep_until`] suspend the current task.
//! - [`timeout`] bounds how long a future may take.
//! - [`after`] delivers a single tick on a channel, for use in a
//!   [`Select`](crate::select::Select).

mod after;
mod sleep;
mod timeout;

#[doc(inline)]
pub use after::after;

#[doc(inline)]
pub use sleep::{Sleep, sleep, sleep_until};

#[doc(inline)]
pub use timeout::{Timeout, timeout};
