//! Run queues of the work-stealing scheduler.
//!
//! - [`injector`]: the global queue, fed by wakers and by spawns from
//!   outside the workers.
//! - [`queue`]: one local queue per worker; idle workers steal from the
//!   others.

pub(crate) mod injector;
pub(crate) mod queue;
