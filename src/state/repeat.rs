//! Key repeat timer - a repeating deadline owned by the touch handler.
//!
//! There is no background thread. The owner asks for due ticks with
//! [`KeyRepeatTimer::take_due`] (or routes a tick id from its own scheduler
//! through [`KeyRepeatTimer::is_current`]). Every arming issues a new
//! [`TimerId`], so ticks belonging to a superseded arming can be recognised
//! and dropped.

use std::time::{Duration, Instant};

/// Identity of one arming of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct KeyRepeatTimer {
    interval: Duration,
    armed: Option<(TimerId, Instant)>,
    next_id: u64,
}

impl KeyRepeatTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: None,
            next_id: 0,
        }
    }

    /// Start a new repeating period at `now`, superseding any previous arming.
    pub fn arm(&mut self, now: Instant) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.armed = Some((id, now + self.interval));
        id
    }

    /// Stop the timer. No tick fires afterwards.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// The id of the live arming, if any.
    pub fn current(&self) -> Option<TimerId> {
        self.armed.map(|(id, _)| id)
    }

    /// Whether a tick with this id belongs to the live arming.
    pub fn is_current(&self, id: TimerId) -> bool {
        self.current() == Some(id)
    }

    /// When the next tick is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.map(|(_, deadline)| deadline)
    }

    /// Pop one due tick, moving the deadline forward one period.
    ///
    /// Call in a loop to catch up on several elapsed periods.
    pub fn take_due(&mut self, now: Instant) -> Option<TimerId> {
        let (id, deadline) = self.armed?;
        if deadline > now {
            return None;
        }
        self.armed = Some((id, deadline + self.interval));
        Some(id)
    }
}
