//! Gravity timer
//!
//! A single cancellable deadline. Restarting replaces whatever was pending,
//! so at most one automatic drop is ever scheduled.

use std::time::{Duration, Instant};

/// Reference gravity interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct GravityTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl GravityTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Schedule the next drop one interval after `now`, dropping any pending one
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the pending deadline if it has passed.
    ///
    /// Returns true at most once per scheduled deadline; the caller is
    /// expected to restart the timer after acting on it.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for GravityTimer {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_interval() {
        let start = Instant::now();
        let mut timer = GravityTimer::default();
        timer.restart(start);
        assert!(!timer.take_due(start + Duration::from_millis(999)));
        assert!(timer.take_due(start + DEFAULT_INTERVAL));
        assert!(!timer.take_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_restart_replaces_pending_deadline() {
        let start = Instant::now();
        let mut timer = GravityTimer::new(Duration::from_millis(100));
        timer.restart(start);
        timer.restart(start + Duration::from_millis(80));
        assert!(!timer.take_due(start + Duration::from_millis(100)));
        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(180)));
        assert!(timer.take_due(start + Duration::from_millis(180)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timer = GravityTimer::default();
        timer.restart(start);
        timer.cancel();
        assert_eq!(timer.deadline(), None);
        assert!(!timer.take_due(start + Duration::from_secs(10)));
    }
}
