//! The timer reactor.
//!
//! A single background thread owns every pending timer of a runtime and
//! wakes the corresponding tasks when their deadlines pass. Runtime threads
//! reach it through a [`ReactorHandle`] stored in the thread-local runtime
//! context.
//!
//! Users never touch the reactor directly; [`sleep`](crate::time::sleep)
//! and the other time utilities are built on it.

mod core;
pub(crate) mod timer;

pub(crate) mod command;

pub(crate) use self::core::{Reactor, ReactorHandle};
