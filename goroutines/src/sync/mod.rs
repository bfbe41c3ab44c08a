//! Synchronization primitives.
//!
//! - [`WaitGroup`] waits for a set of tasks to finish.
//!
//! Blocked callers are suspended, not parked: waiting on a primitive never
//! holds up a worker thread.

mod wait_group;

pub use wait_group::{Wait, WaitGroup};
