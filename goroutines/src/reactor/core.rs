use super::command::Command;
use super::timer::TimerEntry;

use std::collections::BinaryHeap;
use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError, SendError, Sender, channel};
use std::thread;
use std::time::Instant;

/// The timer reactor.
///
/// Runs on a dedicated thread, keeps pending timers in a min-heap and wakes
/// their tasks when the deadlines pass. Between deadlines the thread blocks
/// on its command channel, so it is idle when no timer is pending.
pub(crate) struct Reactor {
    /// Commands from runtime threads.
    receiver: Receiver<Command>,

    /// Pending timers, earliest deadline on top.
    timers: BinaryHeap<TimerEntry>,

    /// Sequence number handed to the next registered timer.
    next_seq: u64,
}

/// A handle used to talk to the reactor thread.
#[derive(Clone)]
pub(crate) struct ReactorHandle {
    sender: Sender<Command>,
}

impl ReactorHandle {
    /// Sends a command to the reactor.
    ///
    /// Fails only if the reactor thread has already stopped.
    pub(crate) fn send(&self, cmd: Command) -> Result<(), SendError<Command>> {
        self.sender.send(cmd)
    }
}

impl Reactor {
    /// Spawns the reactor thread and returns a handle to it.
    pub(crate) fn start(thread_name: String) -> io::Result<ReactorHandle> {
        let (sender, receiver) = channel();

        thread::Builder::new().name(thread_name).spawn(move || {
            let mut reactor = Reactor {
                receiver,
                timers: BinaryHeap::new(),
                next_seq: 0,
            };
            reactor.run();
        })?;

        Ok(ReactorHandle { sender })
    }

    /// Main loop: wait for the next command or the next deadline, whichever
    /// comes first, then fire every expired timer.
    fn run(&mut self) {
        loop {
            let next = match self.timers.peek() {
                Some(timer) => {
                    let wait = timer.deadline().saturating_duration_since(Instant::now());
                    match self.receiver.recv_timeout(wait) {
                        Ok(cmd) => Some(cmd),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.receiver.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => break,
                },
            };

            match next {
                Some(Command::SetTimer(entry)) => {
                    self.timers.push(entry.with_seq(self.next_seq));
                    self.next_seq += 1;
                }
                Some(Command::Shutdown) => break,
                None => {}
            }

            self.fire_expired();
        }

        tracing::debug!(pending = self.timers.len(), "reactor stopped");
    }

    fn fire_expired(&mut self) {
        let now = Instant::now();
        let mut woken = 0usize;

        while self.timers.peek().is_some_and(|t| t.is_due(now)) {
            let Some(timer) = self.timers.pop() else {
                break;
            };

            if timer.fire() {
                woken += 1;
            }
        }

        if woken > 0 {
            tracing::trace!(woken, pending = self.timers.len(), "timers fired");
        }
    }
}
