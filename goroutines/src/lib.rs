//! # goroutines
//!
//! Go-style concurrency for Rust: lightweight tasks started with [`go`],
//! typed [channels](chan::Channel) to pass values between them, [`select`]
//! to wait on several channels at once and a [`WaitGroup`](sync::WaitGroup)
//! to wait for a batch of tasks to finish.
//!
//! Tasks run on a small work-stealing runtime with a timer thread, entered
//! through `#[goroutines::main]` or [`RuntimeBuilder`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use goroutines::chan::Channel;
//! use goroutines::go;
//!
//! async fn multiply(a: i32, b: i32, out: Channel<i32>) {
//!     out.send(a * b).await.unwrap();
//! }
//!
//! #[goroutines::main]
//! async fn main() {
//!     let results = Channel::new();
//!
//!     goroutines::go!(multiply, 10, 20, results.clone());
//!
//!     println!("{}", results.receive().await);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`chan`]: channels and the awaitable queue under them
//! - [`select`]: waiting on the first of several channels
//! - [`sync`]: wait groups
//! - [`time`]: sleep, timeout and timer channels
//! - [`task`]: spawning with a join handle, join sets
//!
//! ## Semantics in short
//!
//! - An unbuffered send completes only once a receiver took the value; a
//!   buffered send completes as soon as the value fits.
//! - Values are received in the order they were sent.
//! - Closing a channel releases waiting receivers with `None` and fails
//!   waiting and later senders; buffered values stay receivable.
//! - Exactly one arm of a select fires, and a losing arm never swallows a
//!   value.
//!
//! Logging goes through [`tracing`]; install any subscriber to see it.

mod go;
mod reactor;
mod runtime;

pub mod chan;
pub mod error;
pub mod select;
pub mod sync;
pub mod time;

pub use error::{Error, Result};
pub use go::go;
pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;

pub use goroutines_macros::*;
