//! Countdown ticker and deferred actions.
//!
//! Both are driven by `Instant`s handed in by the event loop, so nothing
//! here reads the clock on its own.

use std::time::{Duration, Instant};

/// Emits one tick per elapsed interval while armed
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Start counting; the first tick is due one interval after `now`
    pub fn arm(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next = None;
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Number of ticks that came due by `now`
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut ticks = 0;
        while now >= next {
            ticks += 1;
            next += self.interval;
        }
        self.next = Some(next);
        ticks
    }

    /// Fraction of the current interval already elapsed (0.0 when disarmed)
    pub fn progress(&self, now: Instant) -> f64 {
        match self.next {
            Some(next) => {
                let left = next.saturating_duration_since(now).as_secs_f64();
                (1.0 - left / self.interval.as_secs_f64()).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }
}

/// Items waiting for their due time
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<(Instant, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn schedule(&mut self, now: Instant, delay: Duration, item: T) {
        self.pending.push((now + delay, item));
    }

    /// Remove and return every item due by `now`, earliest first
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for (at, item) in self.pending.drain(..) {
            if at <= now {
                due.push((at, item));
            } else {
                waiting.push((at, item));
            }
        }
        self.pending = waiting;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, item)| item).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
