//! Timer handles driven by the engine's clock
//!
//! A timer never fires by itself: the engine asks each running timer when it
//! is due and fires the earliest one. Cancelling a handle is all it takes to
//! make sure its task never runs again.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_PERIOD_MS;

/// Recurring timer (the `setInterval` of the simulation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    period_ms: f64,
    next_due: Option<f64>,
}

impl Interval {
    /// Create a stopped interval
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(MIN_PERIOD_MS),
            next_due: None,
        }
    }

    /// Create an interval already running from `now`
    pub fn started(period_ms: f64, now: f64) -> Self {
        let mut interval = Self::new(period_ms);
        interval.start(now);
        interval
    }

    /// (Re)start so the first firing is one period after `now`
    pub fn start(&mut self, now: f64) {
        self.next_due = Some(now + self.period_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Absolute time of the next firing, if running
    pub fn due_at(&self) -> Option<f64> {
        self.next_due
    }

    /// Move to the next period. Called just before the task body runs so a
    /// body that cancels the timer wins.
    pub fn reschedule(&mut self) {
        if let Some(due) = self.next_due {
            self.next_due = Some(due + self.period_ms);
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }
}

/// One-shot timer (the `setTimeout` of the simulation)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeout {
    due: Option<f64>,
}

impl Timeout {
    /// Arm (or re-arm) to fire `delay_ms` after `now`
    pub fn arm(&mut self, now: f64, delay_ms: f64) {
        self.due = Some(now + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    pub fn due_at(&self) -> Option<f64> {
        self.due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_lifecycle() {
        let mut interval = Interval::new(20.0);
        assert!(!interval.is_running());
        assert_eq!(interval.due_at(), None);

        interval.start(100.0);
        assert_eq!(interval.due_at(), Some(120.0));

        interval.reschedule();
        assert_eq!(interval.due_at(), Some(140.0));

        interval.cancel();
        interval.reschedule();
        assert!(!interval.is_running());
    }

    #[test]
    fn test_interval_period_floor() {
        let interval = Interval::started(0.0, 0.0);
        assert_eq!(interval.period_ms(), MIN_PERIOD_MS);
        assert_eq!(interval.due_at(), Some(MIN_PERIOD_MS));
    }

    #[test]
    fn test_timeout_rearm() {
        let mut timeout = Timeout::default();
        assert!(!timeout.is_armed());
        timeout.arm(10.0, 3000.0);
        timeout.arm(500.0, 3000.0);
        assert_eq!(timeout.due_at(), Some(3500.0));
        timeout.cancel();
        assert!(!timeout.is_armed());
    }
}
