// Turns frame-to-frame elapsed time into whole simulator ticks. The main loop
// redraws much faster than once a second, so elapsed time piles up here until
// a full tick is due.

use std::time::Duration;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct TickClock {
    interval: Duration,
    accumulated: Duration,
}

impl TickClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `elapsed` and returns how many ticks became due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.accumulated += elapsed;
        let mut due = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            due += 1;
        }
        due
    }

    // drops any partial tick, like clearing and re-arming an interval timer
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    pub fn pending(&self) -> Duration {
        self.accumulated
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}
