//! The scheduler that goroutines run on.
//!
//! A runtime is a pool of worker threads sharing a global injector queue,
//! each with its own local queue, plus one timer thread (the reactor).
//! Idle workers steal from each other.
//!
//! Most programs only touch it through `#[goroutines::main]`,
//! [`go`](crate::go) and [`task::spawn`].

mod core;
mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub mod task;

pub use self::core::Runtime;
