//! Task lifecycle states, stored in `Task::state`.
//!
//! ```text
//!            wake                 worker picks it up
//!   IDLE ──────────▶ QUEUED ─────────────────────────▶ RUNNING
//!    ▲                                                 │  │  │
//!    └──────────── poll returned Pending ──────────────┘  │  │
//!                                                         │  │ woken mid-poll
//!   COMPLETED ◀──────── poll returned Ready / panicked ───┘  ▼
//!                                                        NOTIFIED ──▶ QUEUED
//! ```
//!
//! Any non-terminal state may move to `CANCELLED` through `abort`.

/// Parked; nobody holds the task in a queue.
pub(crate) const IDLE: usize = 0;

/// Sitting in a run queue.
pub(crate) const QUEUED: usize = 1;

/// Being polled. Only the worker that set it touches the future.
pub(crate) const RUNNING: usize = 2;

/// Finished, either with an output or with a panic payload. Terminal.
pub(crate) const COMPLETED: usize = 3;

/// Woken while `RUNNING`; goes back to `QUEUED` once the poll returns.
pub(crate) const NOTIFIED: usize = 4;

/// Aborted before completing. Terminal; the future is or will be dropped
/// without another poll.
pub(crate) const CANCELLED: usize = 5;
