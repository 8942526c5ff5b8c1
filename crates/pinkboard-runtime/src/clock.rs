//! Millisecond time sources

use std::time::Instant;

/// Source of frame timestamps in milliseconds
pub trait TimeSource {
    fn now_ms(&mut self) -> f64;
}

/// Wall-clock milliseconds since the clock was created
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemClock {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Deterministic clock: every read returns the next multiple of `step_ms`
pub struct SteppedClock {
    next_ms: f64,
    step_ms: f64,
}

impl SteppedClock {
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        Self {
            next_ms: start_ms,
            step_ms,
        }
    }

    /// Clock advancing one frame at `fps` per read
    pub fn with_fps(fps: f64) -> Self {
        Self::new(0.0, 1000.0 / fps)
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}

impl TimeSource for SteppedClock {
    fn now_ms(&mut self) -> f64 {
        let now = self.next_ms;
        self.next_ms += self.step_ms;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_clock_advances_per_read() {
        let mut clock = SteppedClock::new(100.0, 16.0);
        assert_eq!(clock.now_ms(), 100.0);
        assert_eq!(clock.now_ms(), 116.0);
        assert_eq!(clock.now_ms(), 132.0);
    }

    #[test]
    fn test_stepped_clock_fps() {
        let clock = SteppedClock::with_fps(60.0);
        assert!((clock.step_ms() - 1000.0 / 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
