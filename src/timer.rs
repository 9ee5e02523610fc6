// ⏱️ Scheduler - Cancelable delayed callbacks on a simulated clock
//
// Every timed behavior of the gate (debounced auto-submit, error auto-clear,
// transition phases) is a pending entry here. Nothing reads the wall clock:
// the owner advances time explicitly, which keeps sequencing deterministic
// in tests and lets a terminal loop feed in real elapsed time.

use std::collections::BTreeMap;
use std::time::Duration;

// ============================================================================
// TIMER ID
// ============================================================================

/// Handle returned by [`Scheduler::schedule`], used to cancel a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

// ============================================================================
// SCHEDULER
// ============================================================================

/// Ordered queue of delayed events
///
/// Entries are keyed by (deadline, sequence), so events sharing a deadline
/// fire in the order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), T>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Scheduler {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Current simulated time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` after the current time
    pub fn schedule(&mut self, delay: Duration, event: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((self.now.saturating_add(delay), seq), event);
        TimerId(seq)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, seq)| *seq == id.0).copied();

        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancel everything still pending. Returns how many timers were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.keys().any(|(_, seq)| *seq == id.0)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest timer whose deadline is at or before `until`
    ///
    /// The clock moves forward to that timer's deadline, so anything the
    /// caller schedules while handling it is relative to the moment it fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let key = *self.pending.keys().next()?;
        if key.0 > until {
            return None;
        }

        self.now = self.now.max(key.0);
        self.pending.remove(&key)
    }

    /// Move the clock to `until` once all due timers have been popped
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
