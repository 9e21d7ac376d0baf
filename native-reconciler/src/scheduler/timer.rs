use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

/// Deadline for one deferred task. `seq` breaks ties so equally-due tasks
/// leave the queue in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct Timer {
    pub wake_time: Instant,
    pub seq: u64,
    pub task_id: usize,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.wake_time == other.wake_time && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, the earliest deadline must win.
        other
            .wake_time
            .cmp(&self.wake_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task_id: usize, wake_time: Instant) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer {
            wake_time,
            seq,
            task_id,
        });
    }

    pub fn peek_wake_time(&self) -> Option<Instant> {
        self.heap.peek().map(|timer| timer.wake_time)
    }

    /// Pop every timer with `wake_time <= now`, earliest first, FIFO on ties.
    pub fn pop_ready(&mut self, now: Instant) -> Vec<usize> {
        let mut ready = Vec::new();
        while self.heap.peek().is_some_and(|timer| timer.wake_time <= now) {
            if let Some(timer) = self.heap.pop() {
                ready.push(timer.task_id);
            }
        }
        ready
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
