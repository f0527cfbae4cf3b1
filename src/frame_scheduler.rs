//! Frame pacing.
//!
//! Ticks are due on a fixed grid `start + k * interval`. The scheduler only
//! computes deadlines; the caller does the sleeping. When a tick overruns
//! one or more grid points, exactly one tick is due immediately and the
//! rest of the backlog is dropped, so the loop never renders in bursts to
//! catch up.

use embassy_time::{Duration, Instant};

/// Default target frame rate
pub const DEFAULT_FPS: u32 = 30;

/// Timing of the next tick, returned by [`FrameScheduler::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// When the next tick is due
    pub next_deadline: Instant,
    /// How long to wait until then, zero when behind schedule
    pub sleep_duration: Duration,
    /// Grid points skipped since the previous tick
    pub missed: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameScheduler {
    interval: Duration,
    next_frame: Instant,
}

impl FrameScheduler {
    /// Create a scheduler ticking every `interval`
    ///
    /// A zero interval is raised to one tick of the time base.
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.as_ticks() == 0 {
            Duration::from_ticks(1)
        } else {
            interval
        };
        Self {
            interval,
            next_frame: Instant::from_ticks(0),
        }
    }

    /// Create a scheduler ticking `fps` times per second
    pub fn with_fps(fps: u32) -> Self {
        Self::new(Duration::from_hz(u64::from(fps.max(1))))
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Anchor the grid at `now`, the first tick is due immediately
    pub fn start(&mut self, now: Instant) {
        self.next_frame = now;
    }

    /// Schedule the tick following the last one that was due, given the time
    /// `now` at which that tick's work finished
    pub fn advance(&mut self, now: Instant) -> FrameResult {
        let candidate = self.next_frame + self.interval;
        if candidate > now {
            self.next_frame = candidate;
            return FrameResult {
                next_deadline: candidate,
                sleep_duration: candidate - now,
                missed: 0,
            };
        }

        // Snap to the latest grid point that is not in the future.
        let behind = (now - self.next_frame).as_ticks();
        let steps = behind / self.interval.as_ticks();
        self.next_frame += Duration::from_ticks(steps * self.interval.as_ticks());
        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration: Duration::from_ticks(0),
            missed: steps - 1,
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::with_fps(DEFAULT_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Instant {
        Instant::from_millis(value)
    }

    #[test]
    fn sleeps_until_the_next_grid_point() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(10));
        scheduler.start(ms(100));
        let result = scheduler.advance(ms(104));
        assert_eq!(result.next_deadline, ms(110));
        assert_eq!(result.sleep_duration, Duration::from_millis(6));
        assert_eq!(result.missed, 0);
    }

    #[test]
    fn stays_on_the_grid_despite_jitter() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(10));
        scheduler.start(ms(0));
        scheduler.advance(ms(3));
        let result = scheduler.advance(ms(17));
        assert_eq!(result.next_deadline, ms(20));
    }

    #[test]
    fn overrun_delivers_one_tick_and_drops_the_rest() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(10));
        scheduler.start(ms(0));
        let result = scheduler.advance(ms(35));
        assert_eq!(result.next_deadline, ms(30));
        assert_eq!(result.sleep_duration, Duration::from_ticks(0));
        assert_eq!(result.missed, 2);

        let result = scheduler.advance(ms(36));
        assert_eq!(result.next_deadline, ms(40));
        assert_eq!(result.missed, 0);
    }

    #[test]
    fn exact_boundary_counts_as_due() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(10));
        scheduler.start(ms(0));
        let result = scheduler.advance(ms(10));
        assert_eq!(result.next_deadline, ms(10));
        assert_eq!(result.sleep_duration, Duration::from_ticks(0));
        assert_eq!(result.missed, 0);
    }

    #[test]
    fn fps_sets_the_interval() {
        assert_eq!(
            FrameScheduler::with_fps(50).interval(),
            Duration::from_millis(20)
        );
        assert_eq!(FrameScheduler::default().interval(), Duration::from_hz(30));
    }
}
