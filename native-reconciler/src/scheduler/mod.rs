mod timer;

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

pub use timer::TimerQueue;

pub type TaskId = usize;

/// Work waiting in the scheduler.
pub enum Deferred {
    /// The execution loop's own continuation.
    Tick,
    Call(Box<dyn FnOnce()>),
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Tick => f.write_str("Tick"),
            Deferred::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// Deadline-ordered queue of deferred work. Single-threaded.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: TimerQueue,
    pending: HashMap<TaskId, Deferred>,
    next_id: TaskId,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Deferred, wake_time: Instant) -> TaskId {
        self.next_id += 1;
        let id = self.next_id;
        self.timers.schedule(id, wake_time);
        self.pending.insert(id, task);
        id
    }

    /// Drop a task before it runs. Its timer stays queued and is skipped.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// IDs of tasks due at `now`, in run order.
    pub fn tick(&mut self, now: Instant) -> Vec<TaskId> {
        self.timers.pop_ready(now)
    }

    /// `None` when the task was cancelled or already taken.
    pub fn take_pending(&mut self, id: TaskId) -> Option<Deferred> {
        self.pending.remove(&id)
    }

    pub fn next_wake_time(&self) -> Option<Instant> {
        self.timers.peek_wake_time()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
