use crate::runtime::context;
use crate::task;

use std::future::Future;

/// Starts a goroutine: runs `future` concurrently on the current runtime.
///
/// Fire-and-forget: the output is discarded and there is no handle to wait
/// on. Coordinate with channels or a [`WaitGroup`](crate::sync::WaitGroup),
/// or use [`task::spawn`] to get a [`JoinHandle`](crate::task::JoinHandle).
///
/// The `go!` macro is shorthand for calling an async function with
/// arguments: `go!(worker, id, jobs.clone())` is `go(worker(id, jobs.clone()))`.
///
/// # Panics
///
/// Panics if called outside of a runtime.
///
/// ```rust,ignore
/// let results = Channel::new();
///
/// go({
///     let results = results.clone();
///     async move { results.send(6 * 7).await.unwrap() }
/// });
///
/// assert_eq!(results.receive().await, 42);
/// ```
pub fn go<F>(future: F)
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    if !context::in_runtime() {
        tracing::error!("go called outside of a runtime");
    }

    drop(task::spawn(future));
}
