//! Timestamp sources for caller contexts

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Supplies the timestamp stamped onto each call, in seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Wall-clock time in UTC seconds
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        Utc::now().timestamp().max(0) as u64
    }
}

/// Wraps a clock so that readings never go backwards
#[derive(Debug)]
pub struct MonotonicClock<C> {
    inner: C,
    last: AtomicU64,
}

impl<C: Clock> MonotonicClock<C> {
    pub fn new(inner: C) -> Self {
        Self::starting_at(inner, 0)
    }

    /// Never report a time earlier than `floor`
    pub fn starting_at(inner: C, floor: u64) -> Self {
        Self {
            inner,
            last: AtomicU64::new(floor),
        }
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now(&self) -> u64 {
        let reading = self.inner.now();
        let previous = self.last.fetch_max(reading, Ordering::SeqCst);
        previous.max(reading)
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        // 2021-01-01T00:00:00Z
        assert!(SystemClock.now() > 1609459200);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1617984000);
        assert_eq!(clock.now(), 1617984000);
        clock.advance(30);
        assert_eq!(clock.now(), 1617984030);
        clock.set(5);
        assert_eq!(clock.now(), 5);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let manual = Arc::new(ManualClock::new(100));
        let clock = MonotonicClock::new(manual.clone());

        assert_eq!(clock.now(), 100);
        manual.set(90);
        assert_eq!(clock.now(), 100);
        manual.set(120);
        assert_eq!(clock.now(), 120);
    }

    #[test]
    fn test_monotonic_clock_floor() {
        let clock = MonotonicClock::starting_at(ManualClock::new(50), 200);
        assert_eq!(clock.now(), 200);
    }
}
