// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interval timers driven by the host clock.

/// A repeating deadline in host milliseconds.
///
/// A fresh timer is due immediately. An interval of `0` makes it due on
/// every check.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RefreshTimer {
    interval_ms: u64,
    next: Option<u64>,
}

impl RefreshTimer {
    pub(crate) const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            next: None,
        }
    }

    pub(crate) fn is_due(&self, now: u64) -> bool {
        self.next.is_none_or(|next| now >= next)
    }

    /// Pushes the deadline one interval past `now`.
    pub(crate) fn schedule(&mut self, now: u64) {
        self.next = Some(now.saturating_add(self.interval_ms));
    }

    pub(crate) fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_timer_is_due_and_rearms() {
        let mut timer = RefreshTimer::new(100);
        assert!(timer.is_due(0));
        timer.schedule(0);
        assert!(!timer.is_due(99));
        assert!(timer.is_due(100));
    }

    #[test]
    fn zero_interval_fires_every_check() {
        let mut timer = RefreshTimer::new(0);
        timer.schedule(5);
        assert!(timer.is_due(5));
    }
}
