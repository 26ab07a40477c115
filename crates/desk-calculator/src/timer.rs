//! Deferred auto-clear after an error
//!
//! Every fault schedules its own clear; deadlines fire in order. Whether new
//! input cancels them is decided by the owner, not here.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Queue of pending auto-clear deadlines
#[derive(Debug, Clone)]
pub struct AutoClearTimer {
    delay: Duration,
    deadlines: VecDeque<Instant>,
}

impl AutoClearTimer {
    /// Delay used when none is configured
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Longest delay honoured; longer ones are clamped
    pub const MAX_DELAY: Duration = Duration::from_secs(365 * 24 * 60 * 60);

    /// Creates an idle timer
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.min(Self::MAX_DELAY),
            deadlines: VecDeque::new(),
        }
    }

    /// Configured delay
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a clear `delay` after `now`
    pub fn arm(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadlines.push_back(deadline);
        deadline
    }

    /// Drops every pending clear; returns how many were dropped
    pub fn cancel(&mut self) -> usize {
        let dropped = self.deadlines.len();
        self.deadlines.clear();
        dropped
    }

    /// Earliest pending deadline
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.front().copied()
    }

    /// Number of pending clears
    #[must_use]
    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }

    /// True when nothing is scheduled
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Removes every deadline at or before `now`; returns how many fired
    pub fn take_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while self.deadlines.front().is_some_and(|deadline| *deadline <= now) {
            self.deadlines.pop_front();
            fired += 1;
        }
        fired
    }
}

impl Default for AutoClearTimer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}
