//! Tick-rate reporting.

use std::time::Duration;

use crate::game_loop::DeltaTime;

/// Accumulates per-tick deltas and, once a full second of loop time has
/// elapsed, logs the tick count and mean tick duration, then starts the
/// next window (carrying any overshoot forward).
#[derive(Debug, Default)]
pub struct UpdateProfiler {
    delta_total: Duration,
    tick_count: u32,
}

impl UpdateProfiler {
    /// A profiler with an empty measurement window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tick.
    pub fn update(&mut self, delta_time: DeltaTime) {
        self.delta_total += delta_time;
        self.tick_count += 1;

        self.report();
    }

    fn report(&mut self) {
        if self.delta_total >= Duration::from_secs(1) {
            let average = self.delta_total / self.tick_count;

            log::debug!(
                "[Profiler] {} fps (~{:.3}ms)",
                self.tick_count,
                average.as_secs_f64() * 1000.0
            );

            self.delta_total -= Duration::from_secs(1);
            self.tick_count = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_resets_after_one_second() {
        let mut profiler = UpdateProfiler::new();
        for _ in 0..3 {
            profiler.update(Duration::from_millis(300));
        }
        assert_eq!(profiler.tick_count, 3);
        assert_eq!(profiler.delta_total, Duration::from_millis(900));

        profiler.update(Duration::from_millis(300));
        assert_eq!(profiler.tick_count, 0);
        // The overshoot carries into the next window.
        assert_eq!(profiler.delta_total, Duration::from_millis(200));
    }

    #[test]
    fn test_sub_second_window_accumulates() {
        let mut profiler = UpdateProfiler::new();
        profiler.update(Duration::from_millis(16));
        profiler.update(Duration::from_millis(17));
        assert_eq!(profiler.tick_count, 2);
        assert_eq!(profiler.delta_total, Duration::from_millis(33));
    }
}
