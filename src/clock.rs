//! Time sources for the render loop.
//!
//! The loop never reads the wall clock directly: it asks a [`Clock`] for the
//! current [`Instant`] and to sleep until the next frame deadline. Animation
//! time handed to patterns is measured by a [`Stopwatch`] in 32-bit
//! milliseconds, which wraps back to zero after ~49.7 days.

use std::{cell::Cell, rc::Rc, time::Instant as StdInstant};

use embassy_time::{Duration, Instant};

/// Source of monotonic time the render loop is driven by
pub trait Clock {
    /// Current instant, never earlier than a previously returned one
    fn now(&self) -> Instant;

    /// Suspend the calling thread until `deadline`
    ///
    /// Returns immediately if the deadline has already passed.
    fn sleep_until(&mut self, deadline: Instant);
}

/// Clock backed by the operating system's monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: StdInstant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: StdInstant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> Instant {
        Instant::from_micros(self.origin.elapsed().as_micros() as u64)
    }

    fn sleep_until(&mut self, deadline: Instant) {
        let now = self.now();
        if deadline > now {
            let wait = deadline - now;
            std::thread::sleep(core::time::Duration::from_micros(wait.as_micros()));
        }
    }
}

/// Manually driven clock
///
/// Clones share the same time, so a test double can advance the clock
/// while the loop holds another handle. Sleeping jumps straight to the
/// deadline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_us: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock positioned at `start`
    pub fn starting_at(start: Instant) -> Self {
        let clock = Self::new();
        clock.now_us.set(start.as_micros());
        clock
    }

    /// Move time forward by `by`
    pub fn advance(&self, by: Duration) {
        self.now_us.set(self.now_us.get().saturating_add(by.as_micros()));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.now_us.get())
    }

    fn sleep_until(&mut self, deadline: Instant) {
        if deadline.as_micros() > self.now_us.get() {
            self.now_us.set(deadline.as_micros());
        }
    }
}

/// Measures animation time since a fixed epoch
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    epoch: Instant,
}

impl Stopwatch {
    /// Start measuring from `epoch`
    pub const fn started_at(epoch: Instant) -> Self {
        Self { epoch }
    }

    /// Time elapsed since the epoch
    ///
    /// Saturates at zero if `now` precedes the epoch.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.checked_duration_since(self.epoch)
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Elapsed milliseconds truncated to 32 bits
    ///
    /// Wraps to zero every 2^32 ms.
    #[allow(clippy::cast_possible_truncation)]
    pub fn elapsed_millis(&self, now: Instant) -> u32 {
        self.elapsed(now).as_millis() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Instant::from_millis(250));
    }

    #[test]
    fn manual_clock_sleep_never_goes_backward() {
        let mut clock = ManualClock::starting_at(Instant::from_millis(100));
        clock.sleep_until(Instant::from_millis(50));
        assert_eq!(clock.now(), Instant::from_millis(100));
        clock.sleep_until(Instant::from_millis(180));
        assert_eq!(clock.now(), Instant::from_millis(180));
    }

    #[test]
    fn stopwatch_wraps_after_u32_millis() {
        let watch = Stopwatch::started_at(Instant::from_millis(0));
        let last = Instant::from_millis(u64::from(u32::MAX));
        assert_eq!(watch.elapsed_millis(last), u32::MAX);
        assert_eq!(watch.elapsed_millis(Instant::from_millis(1 << 32)), 0);
        assert_eq!(watch.elapsed_millis(Instant::from_millis((1 << 32) + 1500)), 1500);
    }

    #[test]
    fn stopwatch_saturates_before_epoch() {
        let watch = Stopwatch::started_at(Instant::from_millis(10));
        assert_eq!(watch.elapsed(Instant::from_millis(5)), Duration::from_ticks(0));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
