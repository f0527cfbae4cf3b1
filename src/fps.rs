use embassy_time::{Duration, Instant};
use log::debug;

const REPORT_PERIOD: Duration = Duration::from_secs(1);

/// Counts delivered frames and logs the rate once per second
pub struct FpsCounter {
    last: Instant,
    count: u32,
}

impl FpsCounter {
    pub const fn new(now: Instant) -> Self {
        Self {
            last: now,
            count: 0,
        }
    }

    /// Record one delivered frame
    ///
    /// Returns the measured rate when a reporting period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        self.count += 1;
        let elapsed = now.checked_duration_since(self.last)?;
        if elapsed < REPORT_PERIOD {
            return None;
        }

        #[allow(clippy::cast_possible_truncation)]
        let fps = (u64::from(self.count) * 1000 / elapsed.as_millis().max(1)) as u32;
        self.count = 0;
        self.last = now;
        debug!("FPS: {}", fps);
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let mut counter = FpsCounter::new(Instant::from_millis(0));
        for frame in 1..30 {
            assert_eq!(counter.tick(Instant::from_millis(frame * 33)), None);
        }
        assert_eq!(counter.tick(Instant::from_millis(1000)), Some(30));
        assert_eq!(counter.tick(Instant::from_millis(1033)), None);
    }
}
