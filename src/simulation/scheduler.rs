use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use super::Vehicle;

/// Fires on the first check and then whenever `period` has elapsed since
/// it last fired.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicTimer {
    period: Duration,
    last_fired: Option<Duration>,
}

impl PeriodicTimer {
    pub fn new(period: Duration) -> Self {
        Self { period, last_fired: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true and resets the timer if it is due at `now`.
    pub fn fire(&mut self, now: Duration) -> bool {
        let due = match self.last_fired {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.period,
        };
        if due {
            self.last_fired = Some(now);
        }
        due
    }
}

/// Deferred work resumed by a later tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// Send a released vehicle on its way; `index` is its former queue slot.
    Drive { vehicle: Vehicle, index: usize },
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Duration,
    seq: u64,
    continuation: Continuation,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Timed continuations, resumed in due order (ties in scheduling order).
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, continuation: Continuation) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Reverse(Scheduled { due, seq, continuation }));
    }

    /// Remove and return every continuation due at or before `now`.
    pub fn drain_due(&mut self, now: Duration) -> Vec<(Duration, Continuation)> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.pending.peek() {
            if next.due > now {
                break;
            }
            if let Some(Reverse(entry)) = self.pending.pop() {
                due.push((entry.due, entry.continuation));
            }
        }
        due
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.peek().map(|Reverse(entry)| entry.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
