use super::timer::TimerEntry;

/// Requests sent from runtime threads to the reactor thread.
pub(crate) enum Command {
    /// Fire the entry once its deadline passes.
    SetTimer(TimerEntry),

    /// Stop the reactor. Pending timers are dropped without firing.
    Shutdown,
}
