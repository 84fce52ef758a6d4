//! Virtual clock for the controller's timers.
//!
//! Nothing here sleeps. The host advances time and the controller fires
//! whatever came due, in deadline order with ties broken by scheduling order.
use std::{collections::BTreeMap, time::Duration};

/// Cancellation token for a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    FingerprintScan,
    /// `camera` is set when a preview stream is being shown.
    FaceScan { camera: bool },
    SearchDebounce,
    TelemetryTick,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, u64), Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;

        self.pending.insert((self.now + delay, id), timer);

        TimerHandle(id)
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|&(_, id), _| id != handle.0);

        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.keys().any(|&(_, id)| id == handle.0)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, Timer)> {
        let (&(deadline, id), _) = self.pending.first_key_value()?;
        if deadline > until {
            return None;
        }

        let timer = self.pending.remove(&(deadline, id))?;
        self.now = self.now.max(deadline);

        Some((TimerHandle(id), timer))
    }

    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
