//! Spawning and joining tasks.
//!
//! [`spawn`] schedules a future on the current runtime and returns a
//! [`JoinHandle`] for its output. [`JoinSet`] manages a group of tasks that
//! should be joined or aborted together.
//!
//! The remaining pieces (task state machine, waker vtable) are internal to
//! the executor.

pub(crate) mod state;
pub(crate) mod waker;

mod core;
mod handle;
mod set;

pub(crate) use self::core::{Runnable, Task};

pub use self::core::spawn;
pub use handle::JoinHandle;
pub use set::JoinSet;
