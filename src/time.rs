use std::time::{Duration, Instant};

/// Frame time source.
///
/// `total_time` drives animation (the sandbox rotates objects by absolute time),
/// `tick` produces a clamped per-frame delta so a stalled frame (debugger,
/// minimized window) does not produce a huge step.
#[derive(Debug, Clone)]
pub struct Time {
    start: Instant,
    last: Instant,
    delta: Duration,
    frame_index: u64,
    dt_max: Duration,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            delta: Duration::ZERO,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    /// Seconds elapsed since creation.
    pub fn total_time(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Advances the frame counter and returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now.saturating_duration_since(self.last).min(self.dt_max);
        self.last = now;
        self.frame_index += 1;
        self.delta.as_secs_f32()
    }

    /// Delta measured by the last [`tick`](Self::tick), in seconds.
    pub fn delta(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_counts_frames_and_clamps_delta() {
        let mut time = Time::new();
        assert_eq!(time.frame_index(), 0);
        assert_eq!(time.delta(), 0.0);

        let dt = time.tick();
        assert_eq!(time.frame_index(), 1);
        assert!(dt >= 0.0 && dt <= 0.25);
        assert!(time.total_time() >= 0.0);
    }
}
