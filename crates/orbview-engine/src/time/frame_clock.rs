use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Camera motion is scaled by `dt`, so the clock clamps it: a stall (debugger,
/// minimized window, slow surface reacquire) must not fling the camera.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock clamping `dt` to `[0.1ms, 250ms]`.
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min: Duration::from_micros(100),  // 0.0001s
            dt_max: Duration::from_millis(250),  // 0.25s
        }
    }

    /// Creates a clock with custom delta-time clamps. Inverted bounds are swapped.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        let (dt_min, dt_max) = if dt_min <= dt_max {
            (dt_min, dt_max)
        } else {
            log::warn!("frame clock clamps {dt_min:?} > {dt_max:?}; swapping");
            (dt_max, dt_min)
        };
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_to_minimum() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(50));
        let ft = clock.tick();
        assert!(ft.dt >= 0.005 - 1e-6);
    }

    #[test]
    fn dt_is_clamped_to_maximum() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        let ft = clock.tick();
        assert!(ft.dt <= 0.001 + 1e-6);
    }

    #[test]
    fn inverted_clamps_are_swapped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(50), Duration::from_millis(5));
        let ft = clock.tick();
        assert!(ft.dt >= 0.005 - 1e-6 && ft.dt <= 0.05 + 1e-6);
    }

    #[test]
    fn reset_keeps_frame_index() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.reset();
        assert_eq!(clock.tick().frame_index, 1);
    }
}
