use crate::reactor::ReactorHandle;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

// Per-thread runtime state. Worker threads have all four set; a thread that
// only entered the context (see `enter_context`) has the reactor and
// injector.
thread_local! {
    /// Timer reactor of the current runtime.
    pub(crate) static CURRENT_REACTOR: RefCell<Option<ReactorHandle>> =
        const { RefCell::new(None) };

    /// Global queue of the current runtime.
    pub(crate) static CURRENT_INJECTOR: RefCell<Option<InjectorHandle>> =
        const { RefCell::new(None) };

    /// Index of the current worker thread.
    pub(crate) static CURRENT_WORKER_ID: RefCell<Option<usize>> =
        const { RefCell::new(None) };

    /// Local queues of every worker, indexed by worker id.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<Arc<Vec<Arc<LocalQueue>>>>> =
        const { RefCell::new(None) };
}

/// Runs `f` with `reactor` and `injector` installed as the current
/// runtime, restoring whatever was installed before afterwards.
pub(crate) fn enter_context<R>(
    reactor: ReactorHandle,
    injector: InjectorHandle,
    f: impl FnOnce() -> R,
) -> R {
    let prev_r = CURRENT_REACTOR.with(|r| r.replace(Some(reactor)));
    let prev_i = CURRENT_INJECTOR.with(|i| i.replace(Some(injector)));

    let out = f();

    CURRENT_INJECTOR.with(|i| i.replace(prev_i));
    CURRENT_REACTOR.with(|r| r.replace(prev_r));

    out
}

/// Returns `true` when called from inside a runtime.
pub(crate) fn in_runtime() -> bool {
    CURRENT_INJECTOR.with(|i| i.borrow().is_some())
}
